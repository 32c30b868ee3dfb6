use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};

use crate::color::{UNDEFINED_COLOR, correlation_color, label_color};
use crate::data::correlation::CorrelationMatrix;
use crate::data::distribution::Distribution;

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Paint the matrix as a grid of coloured cells, each annotated with its
/// coefficient.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let cell_size = 56.0;
    let label_width = 140.0;
    let header_height = 28.0;

    egui::ScrollArea::horizontal()
        .id_salt("correlation_heatmap_scroll")
        .show(ui, |ui: &mut Ui| {
            let (rect, _response) = ui.allocate_exact_size(
                egui::vec2(
                    label_width + n as f32 * cell_size,
                    header_height + n as f32 * cell_size,
                ),
                egui::Sense::hover(),
            );
            let painter = ui.painter();
            let text_color = ui.visuals().text_color();

            // Column labels
            for (j, name) in matrix.columns.iter().enumerate() {
                painter.text(
                    rect.min + egui::vec2(label_width + (j as f32 + 0.5) * cell_size, header_height - 6.0),
                    egui::Align2::CENTER_BOTTOM,
                    truncate(name, 10),
                    egui::FontId::proportional(11.0),
                    text_color,
                );
            }

            for (i, row_name) in matrix.columns.iter().enumerate() {
                // Row label
                painter.text(
                    rect.min + egui::vec2(label_width - 8.0, header_height + (i as f32 + 0.5) * cell_size),
                    egui::Align2::RIGHT_CENTER,
                    truncate(row_name, 20),
                    egui::FontId::proportional(11.0),
                    text_color,
                );

                for j in 0..n {
                    let cell_rect = egui::Rect::from_min_size(
                        rect.min
                            + egui::vec2(
                                label_width + j as f32 * cell_size,
                                header_height + i as f32 * cell_size,
                            ),
                        egui::vec2(cell_size, cell_size),
                    );

                    let (fill, label, label_col) = match matrix.get(i, j) {
                        Some(r) => (correlation_color(r), format!("{r:.2}"), label_color(r)),
                        None => (UNDEFINED_COLOR, "NaN".to_string(), Color32::WHITE),
                    };
                    painter.rect_filled(cell_rect.shrink(1.0), 2.0, fill);
                    painter.text(
                        cell_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        label,
                        egui::FontId::proportional(12.0),
                        label_col,
                    );
                }
            }
        });
}

fn truncate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let mut s: String = name.chars().take(max_chars - 1).collect();
        s.push('…');
        s
    }
}

// ---------------------------------------------------------------------------
// Histogram with marginal box
// ---------------------------------------------------------------------------

/// Box summary on top, histogram below, sharing the x axis.
pub fn distribution_plot(ui: &mut Ui, dist: &Distribution) {
    let x_link = egui::Id::new("distribution_x_axis");

    if let Some(b) = &dist.box_summary {
        let elem = BoxElem::new(
            0.0,
            BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
        )
        .name(&dist.column)
        .box_width(0.6)
        .whisker_width(0.4)
        .fill(BAR_COLOR.linear_multiply(0.3))
        .stroke(Stroke::new(1.5, BAR_COLOR));

        let outliers: PlotPoints = b.outliers.iter().map(|&v| [v, 0.0]).collect();

        Plot::new(("distribution_box", &dist.column))
            .height(70.0)
            .show_axes([false, false])
            .show_grid([false, false])
            .link_axis(x_link, [true, false])
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_y(-0.6)
            .include_y(0.6)
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal().name("box"));
                plot_ui.points(Points::new(outliers).radius(2.5).color(BAR_COLOR).name("outliers"));
            });
    }

    let bars: Vec<Bar> = dist
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.3} – {:.3}", bin.start, bin.end))
        })
        .collect();

    Plot::new(("distribution_histogram", &dist.column))
        .height(280.0)
        .x_axis_label(dist.column.as_str())
        .y_axis_label("count")
        .link_axis(x_link, [true, false])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(BAR_COLOR)
                    .name("count")
                    .element_formatter(Box::new(|bar, _| {
                        format!("{}\ncount: {}", bar.name, bar.value)
                    })),
            );
        });
}
