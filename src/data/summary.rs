use std::collections::HashMap;

use polars::prelude::*;

use super::model::{CellValue, ColumnType, DataColumn, Dataset};

/// Everything the "Basic Info" and "Summary Statistics" sections show.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// (rows, columns)
    pub shape: (usize, usize),
    /// Missing cells over the whole table.
    pub total_missing: usize,
    /// Column name → dtype label, in column order.
    pub dtypes: Vec<(String, ColumnType)>,
    /// One descriptive-statistics entry per column.
    pub describe: Vec<ColumnSummary>,
    /// Only columns with at least one missing cell.
    pub missing: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    /// Non-null cells.
    pub count: usize,
    pub missing: usize,
    pub stats: ColumnStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStats {
    Numeric(NumericStats),
    /// Booleans, categoricals and text.
    Frequency(FrequencyStats),
}

/// Moments and quartiles. `None` where undefined (no values, or fewer than
/// two values for `std`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyStats {
    pub unique: usize,
    pub top: Option<String>,
    pub freq: Option<usize>,
}

/// Row labels of the describe table, in display order.
pub const DESCRIBE_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

pub fn summarize(dataset: &Dataset) -> Summary {
    let describe: Vec<ColumnSummary> = dataset.columns().iter().map(describe_column).collect();
    let missing: Vec<(String, usize)> = describe
        .iter()
        .filter(|s| s.missing > 0)
        .map(|s| (s.name.clone(), s.missing))
        .collect();

    Summary {
        shape: dataset.shape(),
        total_missing: describe.iter().map(|s| s.missing).sum(),
        dtypes: dataset
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.dtype))
            .collect(),
        describe,
        missing,
    }
}

impl Summary {
    /// Describe rows that apply to at least one column: the frequency rows
    /// need a non-numeric column, the moment rows a numeric one.
    pub fn describe_rows(&self) -> Vec<&'static str> {
        let any_numeric = self.describe.iter().any(|s| s.dtype.is_numeric());
        let any_other = self.describe.iter().any(|s| !s.dtype.is_numeric());
        DESCRIBE_ROWS
            .into_iter()
            .filter(|row| match *row {
                "count" => true,
                "unique" | "top" | "freq" => any_other,
                _ => any_numeric,
            })
            .collect()
    }
}

impl ColumnSummary {
    /// Text of one describe-table cell; `NaN` when the statistic does not
    /// apply to this column or is undefined.
    pub fn describe_cell(&self, row: &str) -> String {
        const NAN: &str = "NaN";
        let num = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_else(|| NAN.to_string());

        match (&self.stats, row) {
            (_, "count") => self.count.to_string(),
            (ColumnStats::Frequency(f), "unique") => f.unique.to_string(),
            (ColumnStats::Frequency(f), "top") => f.top.clone().unwrap_or_else(|| NAN.to_string()),
            (ColumnStats::Frequency(f), "freq") => {
                f.freq.map(|n| n.to_string()).unwrap_or_else(|| NAN.to_string())
            }
            (ColumnStats::Numeric(n), "mean") => num(n.mean),
            (ColumnStats::Numeric(n), "std") => num(n.std),
            (ColumnStats::Numeric(n), "min") => num(n.min),
            (ColumnStats::Numeric(n), "25%") => num(n.q1),
            (ColumnStats::Numeric(n), "50%") => num(n.median),
            (ColumnStats::Numeric(n), "75%") => num(n.q3),
            (ColumnStats::Numeric(n), "max") => num(n.max),
            _ => NAN.to_string(),
        }
    }
}

fn describe_column(column: &DataColumn<'_>) -> ColumnSummary {
    let missing = column.missing_count();
    let stats = match column.float_values() {
        Some(values) => ColumnStats::Numeric(numeric_stats(&values)),
        None => ColumnStats::Frequency(frequency_stats(column)),
    };
    ColumnSummary {
        name: column.name().to_string(),
        dtype: column.dtype,
        count: column.len() - missing,
        missing,
        stats,
    }
}

/// Moments and linear-interpolation quartiles over the non-null values.
pub fn numeric_stats(values: &Float64Chunked) -> NumericStats {
    let count = values.len() - values.null_count();
    if count == 0 {
        return NumericStats::default();
    }
    let quantile = |q: f64| values.quantile(q, QuantileMethod::Linear).unwrap_or(None);

    NumericStats {
        mean: values.mean(),
        std: if count > 1 { values.std(1) } else { None },
        min: values.min(),
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: values.max(),
    }
}

/// Distinct count and most frequent value; ties go to the value seen first.
fn frequency_stats(column: &DataColumn<'_>) -> FrequencyStats {
    let unique = column.series().drop_nulls().n_unique().unwrap_or(0);

    // value → (count, first row)
    let mut counts: HashMap<CellValue, (usize, usize)> = HashMap::new();
    for (row, v) in column.cells().enumerate().filter(|(_, v)| !v.is_null()) {
        counts.entry(v).or_insert((0, row)).0 += 1;
    }

    let top = counts
        .iter()
        .max_by(|(_, (ca, ra)), (_, (cb, rb))| ca.cmp(cb).then(rb.cmp(ra)))
        .map(|(v, (c, _))| (v.to_string(), *c));

    FrequencyStats {
        unique,
        top: top.as_ref().map(|(v, _)| v.clone()),
        freq: top.map(|(_, c)| c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::sample::load_sample;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_shape_and_missing_report() {
        let ds = parse_csv(b"a,b,c\n1,,x\n2,3,\n,4,z\n").unwrap();
        let summary = summarize(&ds);
        assert_eq!(summary.shape, (3, 3));
        assert_eq!(summary.total_missing, 3);
        assert_eq!(
            summary.missing,
            vec![("a".to_string(), 1), ("b".to_string(), 1), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_missing_report_omits_complete_columns() {
        let ds = parse_csv(b"full,gappy\n1,\n2,5\n3,6\n").unwrap();
        let summary = summarize(&ds);
        assert_eq!(summary.missing, vec![("gappy".to_string(), 1)]);
        assert!(summary.missing.iter().all(|(_, n)| *n > 0));
    }

    #[test]
    fn test_empty_rows_shape() {
        let ds = parse_csv(b"a,b\n").unwrap();
        let summary = summarize(&ds);
        assert_eq!(summary.shape, (0, 2));
        assert_eq!(summary.total_missing, 0);
        assert!(summary.missing.is_empty());
        assert_eq!(summary.describe[0].describe_cell("mean"), "NaN");
    }

    #[test]
    fn test_numeric_stats() {
        let stats = numeric_stats(&Float64Chunked::from_slice("v".into(), &[4.0, 1.0, 3.0, 2.0]));
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.std, (5.0f64 / 3.0).sqrt()));
        assert!(close(stats.min, 1.0));
        assert!(close(stats.q1, 1.75));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.q3, 3.25));
        assert!(close(stats.max, 4.0));

        let single = numeric_stats(&Float64Chunked::from_slice("v".into(), &[7.0]));
        assert!(single.std.is_none());
        assert!(close(single.median, 7.0));

        let gappy = numeric_stats(&Float64Chunked::new("v".into(), &[Some(1.0), None, Some(3.0)]));
        assert!(close(gappy.mean, 2.0));
        assert!(close(gappy.median, 2.0));

        let empty = numeric_stats(&Float64Chunked::new("v".into(), &[None::<f64>, None]));
        assert_eq!(empty, NumericStats::default());
    }

    #[test]
    fn test_frequency_stats_tie_goes_to_first_seen() {
        let ds = parse_csv(b"c\nb\na\na\nb\n").unwrap();
        let summary = summarize(&ds);
        let ColumnStats::Frequency(f) = &summary.describe[0].stats else {
            panic!("expected frequency stats");
        };
        assert_eq!(f.unique, 2);
        assert_eq!(f.top.as_deref(), Some("b"));
        assert_eq!(f.freq, Some(2));
        assert_eq!(summary.describe[0].count, 4);
    }

    #[test]
    fn test_describe_rows_and_cells() {
        let summary = summarize(&load_sample("Iris").unwrap());
        assert_eq!(summary.describe_rows(), DESCRIBE_ROWS.to_vec());

        let sepal = &summary.describe[0];
        assert_eq!(sepal.describe_cell("count"), "150");
        assert_eq!(sepal.describe_cell("top"), "NaN");
        assert_eq!(sepal.describe_cell("min"), "4.300000");

        let species = &summary.describe[4];
        assert_eq!(species.describe_cell("unique"), "3");
        assert_eq!(species.describe_cell("top"), "setosa");
        assert_eq!(species.describe_cell("freq"), "50");
        assert_eq!(species.describe_cell("mean"), "NaN");

        let numeric_only = summarize(&parse_csv(b"x\n1\n2\n").unwrap());
        assert_eq!(
            numeric_only.describe_rows(),
            vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        );
    }

    #[test]
    fn test_iris_means() {
        let summary = summarize(&load_sample("Iris").unwrap());
        let ColumnStats::Numeric(n) = &summary.describe[0].stats else {
            panic!("expected numeric stats");
        };
        assert!((n.mean.unwrap() - 5.843333).abs() < 1e-5);
        assert!((n.std.unwrap() - 0.828066).abs() < 1e-5);
        assert_eq!(summary.total_missing, 0);
    }

    #[test]
    fn test_titanic_describe() {
        let summary = summarize(&load_sample("Titanic").unwrap());
        assert_eq!(summary.shape, (891, 15));

        let age = summary.describe.iter().find(|s| s.name == "age").unwrap();
        assert_eq!(age.missing, 177);
        assert_eq!(age.describe_cell("count"), "714");
        assert_eq!(age.describe_cell("mean"), "29.699118");
        assert_eq!(age.describe_cell("min"), "0.420000");
        assert_eq!(age.describe_cell("max"), "80.000000");

        let who = summary.describe.iter().find(|s| s.name == "who").unwrap();
        assert_eq!(who.describe_cell("unique"), "3");
        assert_eq!(who.describe_cell("top"), "man");
        assert_eq!(who.describe_cell("freq"), "537");
        assert!(summary.missing.contains(&("deck".to_string(), 688)));
    }
}
