use polars::prelude::cov::pearson_corr;
use polars::prelude::*;

use super::model::Dataset;

/// Pearson correlation between every pair of numeric columns.
///
/// Missing values are handled by pairwise deletion: each pair only uses the
/// rows where both columns are present. Pairs that end up with fewer than
/// two rows, a constant column, or a non-finite coefficient are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// Numeric column names, in dataset order.
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// `None` when the dataset has no numeric column.
pub fn correlation_matrix(dataset: &Dataset) -> Option<CorrelationMatrix> {
    let numeric = dataset.numeric_columns();
    if numeric.is_empty() {
        return None;
    }

    let series: Vec<Float64Chunked> = numeric.iter().filter_map(|c| c.float_values()).collect();

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let r = pairwise_pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}

/// Pearson coefficient over the rows where both columns are present.
fn pairwise_pearson(x: &Float64Chunked, y: &Float64Chunked) -> Option<f64> {
    let both = &x.is_not_null() & &y.is_not_null();
    let x = x.filter(&both).ok()?;
    let y = y.filter(&both).ok()?;
    if x.len() < 2 {
        return None;
    }
    pearson_corr(&x, &y)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}
