use polars::prelude::*;

use super::model::Dataset;
use super::summary::numeric_stats;

/// Histogram plus marginal box summary of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    /// `None` when the column has no values at all.
    pub box_summary: Option<BoxSummary>,
}

/// Half-open `[start, end)` bin; the last bin also holds `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Tukey box: whiskers reach the furthest values within 1.5·IQR of the
/// quartiles, anything beyond is an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

/// `None` unless `column` names a numeric column of the dataset.
pub fn distribution(dataset: &Dataset, column: &str, bin_count: usize) -> Option<Distribution> {
    let col = dataset.column(column)?;
    let values = col.float_values()?.drop_nulls();

    Some(Distribution {
        column: col.name().to_string(),
        bins: histogram(&values, bin_count.max(1)),
        box_summary: box_summary(&values),
    })
}

/// Equal-width bins over `[min, max]`. Offsets and widths are taken on
/// halved values so the span of extreme finite values cannot overflow.
fn histogram(values: &Float64Chunked, bin_count: usize) -> Vec<HistogramBin> {
    let n = bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    let (lo, hi) = match (values.min(), values.max()) {
        (Some(min), Some(max)) if max > min => {
            let half_span = max / 2.0 - min / 2.0;
            for v in values.into_no_null_iter() {
                let idx = ((v / 2.0 - min / 2.0) / half_span * n).floor();
                counts[(idx.max(0.0) as usize).min(bin_count - 1)] += 1;
            }
            (min, max)
        }
        (Some(v), Some(_)) => {
            counts[bin_count / 2] = values.len();
            (v - 0.5, v + 0.5)
        }
        _ => (0.0, 1.0),
    };
    let width = hi / n - lo / n;

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bin_count { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

fn box_summary(values: &Float64Chunked) -> Option<BoxSummary> {
    let stats = numeric_stats(values);
    let (q1, median, q3, mean) = (stats.q1?, stats.median?, stats.q3?, stats.mean?);
    let iqr = q3 - q1;
    let (fence_lo, fence_hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let sorted = values.sort(false);
    let lower_whisker = sorted.into_no_null_iter().find(|v| *v >= fence_lo).unwrap_or(q1);
    let upper_whisker = sorted
        .into_no_null_iter()
        .rev()
        .find(|v| *v <= fence_hi)
        .unwrap_or(q3);
    let outliers = sorted
        .into_no_null_iter()
        .filter(|v| *v < fence_lo || *v > fence_hi)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        mean,
        outliers,
    })
}
