use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour scale for correlation values
// ---------------------------------------------------------------------------

/// Reversed red/blue diverging stops, from -1 (blue) through 0 (near white)
/// to +1 (red).
const RDBU_R: [(u8, u8, u8); 11] = [
    (5, 48, 97),
    (33, 102, 172),
    (67, 147, 195),
    (146, 197, 222),
    (209, 229, 240),
    (247, 247, 247),
    (253, 219, 199),
    (244, 165, 130),
    (214, 96, 77),
    (178, 24, 43),
    (103, 0, 31),
];

/// Colour for a correlation coefficient. Values are clamped to `[-1, 1]`
/// and interpolated in linear RGB between neighbouring stops.
pub fn correlation_color(value: f64) -> Color32 {
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let scaled = t * (RDBU_R.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(RDBU_R.len() - 2);
    let factor = scaled - lower as f32;

    let a = stop(RDBU_R[lower]);
    let b = stop(RDBU_R[lower + 1]);
    let mixed: Srgb<u8> = Srgb::from_linear(a.mix(b, factor));
    Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
}

/// Text colour that stays readable on top of `correlation_color(value)`.
pub fn label_color(value: f64) -> Color32 {
    if value.abs() > 0.6 {
        Color32::WHITE
    } else {
        Color32::from_gray(30)
    }
}

/// Fill for cells without a defined coefficient.
pub const UNDEFINED_COLOR: Color32 = Color32::from_gray(140);

fn stop((r, g, b): (u8, u8, u8)) -> LinSrgb<f32> {
    Srgb::new(r, g, b).into_linear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(correlation_color(-1.0), Color32::from_rgb(5, 48, 97));
        assert_eq!(correlation_color(0.0), Color32::from_rgb(247, 247, 247));
        assert_eq!(correlation_color(1.0), Color32::from_rgb(103, 0, 31));
        assert_eq!(correlation_color(3.0), correlation_color(1.0));
    }

    #[test]
    fn test_positive_is_red_negative_is_blue() {
        let pos = correlation_color(0.7);
        let neg = correlation_color(-0.7);
        assert!(pos.r() > pos.b());
        assert!(neg.b() > neg.r());
    }
}
