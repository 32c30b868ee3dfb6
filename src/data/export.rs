use anyhow::{Context, Result};

use super::model::{CellValue, Dataset, format_float};

/// Serialize the whole dataset as UTF-8 CSV: header row, no index column.
///
/// Missing cells are written empty, booleans as `True`/`False`, and
/// integral floats keep their `.0` (or an exponent, once too large) so the
/// column reads back as float.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.column_names())
        .context("writing CSV header")?;

    let columns = dataset.columns();
    for row in 0..dataset.n_rows() {
        let record = columns.iter().map(|c| export_field(&c.cell(row)));
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {}", row + 1))?;
    }

    writer.into_inner().context("flushing CSV output")
}

fn export_field(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format_float(*v),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_upload, parse_csv};
    use crate::data::model::ColumnType;
    use crate::data::sample::load_sample;
    use crate::data::summary::summarize;

    fn round_trip(ds: &Dataset) -> Dataset {
        let bytes = to_csv_bytes(ds).unwrap();
        load_upload(crate::config::EXPORT_FILE_NAME, &bytes).unwrap()
    }

    #[test]
    fn test_samples_round_trip() {
        for name in ["Iris", "Titanic"] {
            let ds = load_sample(name).unwrap();
            assert_eq!(round_trip(&ds), ds, "{name} changed after export");
        }
    }

    #[test]
    fn test_round_trip_with_quoting_and_missing() {
        let csv = "city,pop,ratio,ok\n\"Paris, FR\",2100000,0.5,True\n\"say \"\"hi\"\"\",,3.0,\nLagos,15000000,,False\n";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        let back = round_trip(&ds);
        assert_eq!(back, ds);
        assert_eq!(summarize(&back).shape, (3, 4));
        assert_eq!(
            back.column("city").unwrap().cell(1),
            CellValue::String("say \"hi\"".into())
        );
    }

    #[test]
    fn test_header_only_round_trip() {
        let ds = parse_csv(b"a,b\n").unwrap();
        let bytes = to_csv_bytes(&ds).unwrap();
        assert_eq!(bytes, b"a,b\n");
        assert_eq!(round_trip(&ds).shape(), (0, 2));
    }

    #[test]
    fn test_no_index_column_and_float_format() {
        let ds = parse_csv(b"x,y\n1.0,a\n2.5,b\n").unwrap();
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(text, "x,y\n1.0,a\n2.5,b\n");
    }

    #[test]
    fn test_large_and_infinite_floats_stay_float() {
        let ds = parse_csv(b"x\n1e16\n2e16\ninf\n-2.5\n").unwrap();
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(text, "x\n1e16\n2e16\ninf\n-2.5\n");

        let back = round_trip(&ds);
        assert_eq!(back, ds);
        let x = back.column("x").unwrap();
        assert_eq!(x.dtype, ColumnType::Float);
        assert_eq!(x.cell(0), CellValue::Float(1e16));
        assert_eq!(x.cell(2), CellValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_large_integral_floats_from_source_round_trip() {
        let ds = parse_csv(b"x\n1e16\n2e16\n").unwrap();
        assert_eq!(ds.column("x").unwrap().dtype, ColumnType::Float);
        assert_eq!(round_trip(&ds), ds);
    }
}
