use std::fmt;

use polars::prelude::*;

// ---------------------------------------------------------------------------
// CellValue – a single cell, as read out of a frame
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Loaders build columns from these, and the
/// preview, export and frequency counts read them back out of the frame.
/// Used as a hash key when counting frequencies, so `CellValue` is `Eq + Hash`.
///
/// `Float` never holds NaN: missing floats are stored as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// -- Manual Eq/Hash: floats hash by bit pattern --

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl From<AnyValue<'_>> for CellValue {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => CellValue::Null,
            AnyValue::Boolean(b) => CellValue::Bool(b),
            AnyValue::String(s) => CellValue::String(s.to_string()),
            AnyValue::StringOwned(s) => CellValue::String(s.to_string()),
            v if v.is_integer() => v.extract::<i64>().map_or(CellValue::Null, CellValue::Integer),
            v if v.is_float() => match v.extract::<f64>() {
                Some(x) if !x.is_nan() => CellValue::Float(x),
                _ => CellValue::Null,
            },
            other => CellValue::String(other.to_string()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Shortest round-trip form that still reads back as a float: integral
/// values keep a trailing `.0`, or switch to exponent form once they are too
/// large for that.
pub fn format_float(v: f64) -> String {
    if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if v.is_finite() && v.fract() == 0.0 {
        if v.abs() < 1e16 {
            format!("{v:.1}")
        } else {
            format!("{v:e}")
        }
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// ColumnType – semantic type decided once at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Categorical,
    Text,
}

impl ColumnType {
    /// Label shown in the dtype listing.
    pub fn label(self) -> &'static str {
        match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Categorical => "category",
            ColumnType::Text => "object",
        }
    }

    /// Integer and float columns form the numeric subset.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Build a typed `Series` from loader cells.
///
/// Over the non-null cells: all bool → `Boolean`, all integer → `Int64`,
/// integer/float mix → `Float64`, nothing at all → `Float64`. Anything else
/// becomes a string column; its non-string cells are rendered to text.
pub fn series_from_cells(name: &str, cells: &[CellValue]) -> Series {
    let non_null: Vec<&CellValue> = cells.iter().filter(|c| !c.is_null()).collect();
    let name = PlSmallStr::from(name);

    if non_null.iter().all(|c| matches!(c, CellValue::Bool(_))) && !non_null.is_empty() {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Series::new(name, values);
    }
    if non_null.iter().all(|c| matches!(c, CellValue::Integer(_))) && !non_null.is_empty() {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            })
            .collect();
        return Series::new(name, values);
    }
    if non_null
        .iter()
        .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)))
    {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Integer(i) => Some(*i as f64),
                CellValue::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Series::new(name, values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|c| match c {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    Series::new(name, values)
}

// ---------------------------------------------------------------------------
// DataColumn – one column of a dataset, with its semantic type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct DataColumn<'a> {
    series: &'a Series,
    pub dtype: ColumnType,
}

impl<'a> DataColumn<'a> {
    pub fn name(&self) -> &'a str {
        self.series.name().as_str()
    }

    pub fn series(&self) -> &'a Series {
        self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn missing_count(&self) -> usize {
        self.series.null_count()
    }

    /// The column as `Float64`, nulls kept in place. `None` for non-numeric
    /// columns.
    pub fn float_values(&self) -> Option<Float64Chunked> {
        if !self.dtype.is_numeric() {
            return None;
        }
        let cast = self.series.cast(&DataType::Float64).ok()?;
        cast.f64().ok().cloned()
    }

    pub fn cell(&self, row: usize) -> CellValue {
        self.series.get(row).map(CellValue::from).unwrap_or(CellValue::Null)
    }

    pub fn cells(&self) -> impl Iterator<Item = CellValue> + 'a {
        let series = self.series;
        (0..series.len()).map(move |row| series.get(row).map(CellValue::from).unwrap_or(CellValue::Null))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An immutable polars frame plus the semantic type of each column. Column
/// names are unique and every column is one of `Int64`, `Float64`,
/// `Boolean` or `String`.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    dtypes: Vec<ColumnType>,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.dtypes == other.dtypes && self.frame.equals_missing(&other.frame)
    }
}

impl Dataset {
    /// Normalise a loaded frame and resolve each column's semantic type.
    ///
    /// All-null columns become `Float64`; other integer and float widths are
    /// widened to 64 bits; any remaining dtype is rendered to `String`. A
    /// string column is categorical when it has at most
    /// `categorical_max_unique` distinct values and those values repeat on
    /// average at least twice.
    pub fn from_frame(frame: DataFrame, categorical_max_unique: usize) -> PolarsResult<Self> {
        let mut columns = Vec::with_capacity(frame.width());
        let mut dtypes = Vec::with_capacity(frame.width());

        for column in frame.get_columns() {
            let series = column.as_materialized_series();
            let (series, dtype) = if series.null_count() == series.len() {
                (series.cast(&DataType::Float64)?, ColumnType::Float)
            } else if series.dtype().is_bool() {
                (series.clone(), ColumnType::Boolean)
            } else if series.dtype().is_integer() {
                (series.cast(&DataType::Int64)?, ColumnType::Integer)
            } else if series.dtype().is_float() {
                (series.cast(&DataType::Float64)?, ColumnType::Float)
            } else {
                let text = series.cast(&DataType::String)?;
                let non_null = text.len() - text.null_count();
                let distinct = text.drop_nulls().n_unique()?;
                let dtype = if distinct <= categorical_max_unique && distinct * 2 <= non_null {
                    ColumnType::Categorical
                } else {
                    ColumnType::Text
                };
                (text, dtype)
            };
            columns.push(series.into_column());
            dtypes.push(dtype);
        }

        Ok(Dataset {
            frame: DataFrame::new(columns)?,
            dtypes,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    pub fn columns(&self) -> Vec<DataColumn<'_>> {
        self.frame
            .get_columns()
            .iter()
            .zip(&self.dtypes)
            .map(|(column, dtype)| DataColumn {
                series: column.as_materialized_series(),
                dtype: *dtype,
            })
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<DataColumn<'_>> {
        self.columns().into_iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(PlSmallStr::as_str)
            .collect()
    }

    /// Columns with integer or float semantic type, in column order.
    pub fn numeric_columns(&self) -> Vec<DataColumn<'_>> {
        self.columns()
            .into_iter()
            .filter(|c| c.dtype.is_numeric())
            .collect()
    }

    /// Row-major view of the first `n` rows.
    pub fn head(&self, n: usize) -> Vec<Vec<CellValue>> {
        let columns = self.columns();
        (0..n.min(self.n_rows()))
            .map(|row| columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(series: Vec<Series>) -> Dataset {
        let columns = series.into_iter().map(IntoColumn::into_column).collect();
        Dataset::from_frame(DataFrame::new(columns).unwrap(), 20).unwrap()
    }

    #[test]
    fn test_integer_and_float_resolution() {
        use CellValue::*;
        let a = series_from_cells("a", &[Integer(1), Null, Integer(3)]);
        let b = series_from_cells("b", &[Integer(1), Float(2.5)]);
        let c = series_from_cells("c", &[Null, Null]);
        let ds = dataset(vec![a, b, c]);

        assert_eq!(ds.column("a").unwrap().dtype, ColumnType::Integer);
        let b = ds.column("b").unwrap();
        assert_eq!(b.dtype, ColumnType::Float);
        assert_eq!(b.cell(0), Float(1.0));
        let c = ds.column("c").unwrap();
        assert_eq!(c.dtype, ColumnType::Float);
        assert_eq!(c.missing_count(), 2);
    }

    #[test]
    fn test_string_columns_are_categorical_or_text() {
        use CellValue::*;
        let species: Vec<CellValue> = ["a", "b", "a", "b", "a", "b"]
            .iter()
            .map(|s| String((*s).to_string()))
            .collect();
        let ds = dataset(vec![series_from_cells("s", &species)]);
        assert_eq!(ds.column("s").unwrap().dtype, ColumnType::Categorical);

        let names: Vec<CellValue> = ["x", "y", "z"].iter().map(|s| String((*s).to_string())).collect();
        let mixed = vec![Integer(1), String("a".into()), Bool(true)];
        let ds = dataset(vec![series_from_cells("n", &names), series_from_cells("m", &mixed)]);
        assert_eq!(ds.column("n").unwrap().dtype, ColumnType::Text);

        let m = ds.column("m").unwrap();
        assert_eq!(m.dtype, ColumnType::Text);
        assert_eq!(m.cell(0), String("1".into()));
        assert_eq!(m.cell(2), String("True".into()));
    }

    #[test]
    fn test_boolean_is_not_numeric() {
        use CellValue::*;
        let ds = dataset(vec![series_from_cells("flag", &[Bool(true), Null, Bool(false)])]);
        let flag = ds.column("flag").unwrap();
        assert_eq!(flag.dtype, ColumnType::Boolean);
        assert!(!flag.dtype.is_numeric());
        assert!(flag.float_values().is_none());
    }

    #[test]
    fn test_narrow_numeric_widths_are_widened() {
        let small = Series::new("small".into(), &[1i32, 2, 3]);
        let single = Series::new("single".into(), &[1.5f32, 2.5]);
        let ds = dataset(vec![small, single]);

        assert_eq!(ds.frame().column("small").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.column("small").unwrap().dtype, ColumnType::Integer);
        assert_eq!(ds.frame().column("single").unwrap().dtype(), &DataType::Float64);
        assert_eq!(ds.column("single").unwrap().dtype, ColumnType::Float);
    }

    #[test]
    fn test_head_and_equality() {
        use CellValue::*;
        let a = series_from_cells("a", &[Integer(1), Integer(2)]);
        let ds = dataset(vec![a.clone()]);
        assert_eq!(ds.shape(), (2, 1));
        assert_eq!(ds.head(5), vec![vec![Integer(1)], vec![Integer(2)]]);
        assert_eq!(ds, dataset(vec![a]));
        assert_ne!(ds, dataset(vec![series_from_cells("a", &[Integer(1), Null])]));
    }

    #[test]
    fn test_float_formatting_reads_back_as_float() {
        assert_eq!(format_float(22.0), "22.0");
        assert_eq!(format_float(7.25), "7.25");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(1e16), "1e16");
        assert_eq!(format_float(-2.5e20), "-2.5e20");
        assert_eq!(CellValue::Float(-3.0).to_string(), "-3.0");
    }
}
