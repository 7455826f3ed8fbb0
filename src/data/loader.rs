use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int32Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Penguin, PenguinDataset, Sex, Species};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguin dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – palmerpenguins layout, `NA` for missing cells
/// * `.json`    – `[{ "species": "Adelie", "island": ..., ... }, ...]`
/// * `.parquet` – one column per field (strings, ints or floats)
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} penguins from {} ({:?})",
        dataset.len(),
        path.display(),
        dataset.species_counts
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row. Cells that fail to parse (`NA`, empty) become `None`;
/// extra columns such as a leading row id are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    species: String,
    island: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    bill_length_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    bill_depth_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    flipper_length_mm: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    body_mass_g: Option<f64>,
    #[serde(default)]
    sex: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
}

fn load_csv(path: &Path) -> Result<PenguinDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    parse_csv(reader)
}

fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<PenguinDataset> {
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRecord>().enumerate() {
        let rec = result.with_context(|| format!("CSV row {row_no}"))?;
        let species = rec
            .species
            .parse::<Species>()
            .with_context(|| format!("CSV row {row_no}"))?;
        rows.push(Penguin {
            species,
            island: rec.island,
            bill_length_mm: rec.bill_length_mm,
            bill_depth_mm: rec.bill_depth_mm,
            flipper_length_mm: rec.flipper_length_mm,
            body_mass_g: rec.body_mass_g,
            sex: Sex::parse(&rec.sex),
            year: rec.year,
        });
    }
    Ok(PenguinDataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`, which
/// writes missing measurements as `null`.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    species: String,
    island: String,
    bill_length_mm: Option<f64>,
    bill_depth_mm: Option<f64>,
    flipper_length_mm: Option<f64>,
    body_mass_g: Option<f64>,
    sex: Option<String>,
    year: Option<i32>,
}

fn load_json(path: &Path) -> Result<PenguinDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PenguinDataset> {
    let records: Vec<JsonRecord> =
        serde_json::from_str(text).context("Expected a top-level JSON array of records")?;

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| -> Result<Penguin> {
            Ok(Penguin {
                species: rec.species.parse::<Species>().with_context(|| format!("Row {i}"))?,
                island: rec.island,
                bill_length_mm: rec.bill_length_mm,
                bill_depth_mm: rec.bill_depth_mm,
                flipper_length_mm: rec.flipper_length_mm,
                body_mass_g: rec.body_mass_g,
                sex: rec.sex.as_deref().and_then(Sex::parse),
                year: rec.year,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PenguinDataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Numeric columns may be any integer or float type and string columns may
/// be dictionary encoded; everything is cast to `Float64` / `Utf8` first.
/// Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<PenguinDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        append_batch(&batch, &mut rows)?;
    }
    Ok(PenguinDataset::from_rows(rows))
}

fn append_batch(batch: &RecordBatch, rows: &mut Vec<Penguin>) -> Result<()> {
    let species = required_column(batch, "species", &DataType::Utf8)?;
    let island = required_column(batch, "island", &DataType::Utf8)?;
    let bill_length = optional_column(batch, "bill_length_mm", &DataType::Float64)?;
    let bill_depth = optional_column(batch, "bill_depth_mm", &DataType::Float64)?;
    let flipper_length = optional_column(batch, "flipper_length_mm", &DataType::Float64)?;
    let body_mass = optional_column(batch, "body_mass_g", &DataType::Float64)?;
    let sex = optional_column(batch, "sex", &DataType::Utf8)?;
    let year = optional_column(batch, "year", &DataType::Int32)?;

    let species = species.as_string::<i32>();
    let island = island.as_string::<i32>();

    for row in 0..batch.num_rows() {
        if species.is_null(row) {
            bail!("Row {row}: null species");
        }
        rows.push(Penguin {
            species: species.value(row).parse::<Species>().with_context(|| format!("Row {row}"))?,
            island: if island.is_null(row) {
                String::new()
            } else {
                island.value(row).to_string()
            },
            bill_length_mm: f64_at(bill_length.as_ref(), row),
            bill_depth_mm: f64_at(bill_depth.as_ref(), row),
            flipper_length_mm: f64_at(flipper_length.as_ref(), row),
            body_mass_g: f64_at(body_mass.as_ref(), row),
            sex: sex.as_ref().and_then(|col| {
                let col = col.as_string::<i32>();
                (!col.is_null(row)).then(|| Sex::parse(col.value(row))).flatten()
            }),
            year: year.as_ref().and_then(|col| {
                let col = col.as_primitive::<Int32Type>();
                (!col.is_null(row)).then(|| col.value(row))
            }),
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

fn required_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    optional_column(batch, name, to)?
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

/// Fetch a column by name and cast it to `to`; `None` if the column is absent.
fn optional_column(batch: &RecordBatch, name: &str, to: &DataType) -> Result<Option<ArrayRef>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let cast_col = cast(col, to)
        .with_context(|| format!("column '{name}' of type {:?} is not {to:?}", col.data_type()))?;
    Ok(Some(cast_col))
}

fn f64_at(col: Option<&ArrayRef>, row: usize) -> Option<f64> {
    let col = col?.as_primitive::<Float64Type>();
    if col.is_null(row) {
        return None;
    }
    Some(col.value(row)).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const SAMPLE_CSV: &str = "\
rowid,species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
1,Adelie,Torgersen,39.1,18.7,181,3750,male,2007
2,Adelie,Torgersen,NA,NA,NA,NA,NA,2007
3,Gentoo,Biscoe,46.1,13.2,211,4500,female,2007
4,Chinstrap,Dream,46.5,17.9,192,3500,female,2007
";

    #[test]
    fn test_csv_with_missing_cells() {
        let ds = parse_csv(csv::Reader::from_reader(SAMPLE_CSV.as_bytes())).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.rows[0].flipper_length_mm, Some(181.0));
        assert_eq!(ds.rows[0].sex, Some(Sex::Male));
        assert_eq!(ds.rows[1].bill_length_mm, None);
        assert_eq!(ds.rows[1].sex, None);
        assert_eq!(ds.rows[1].year, Some(2007));
        assert_eq!(ds.species_counts[&Species::Gentoo], 1);
    }

    #[test]
    fn test_csv_unknown_species_is_error() {
        let text = concat!(
            "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year\n",
            "Emperor,Ross,1,1,1,1,male,2007\n",
        );
        let err = parse_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(format!("{err:#}").contains("unknown species"));
    }

    #[test]
    fn test_json_records() {
        let text = r#"[
            {"species": "Gentoo", "island": "Biscoe", "bill_length_mm": 46.1,
             "bill_depth_mm": 13.2, "flipper_length_mm": 211.0, "body_mass_g": 4500.0,
             "sex": "female", "year": 2007},
            {"species": "Adelie", "island": "Dream", "bill_length_mm": null,
             "bill_depth_mm": null, "flipper_length_mm": null, "body_mass_g": null,
             "sex": null, "year": null}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].sex, Some(Sex::Female));
        assert_eq!(ds.rows[1].body_mass_g, None);
        assert!(ds.islands.contains("Dream"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn test_load_parquet_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("flipper_length_mm", DataType::Int64, true),
            Field::new("body_mass_g", DataType::Float64, true),
            Field::new("sex", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Adelie", "Gentoo"])),
                Arc::new(StringArray::from(vec!["Torgersen", "Biscoe"])),
                Arc::new(Int64Array::from(vec![Some(181), None])),
                Arc::new(Float64Array::from(vec![Some(3750.0), Some(f64::NAN)])),
                Arc::new(StringArray::from(vec![Some("male"), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].flipper_length_mm, Some(181.0));
        assert_eq!(ds.rows[1].flipper_length_mm, None);
        assert_eq!(ds.rows[1].body_mass_g, None);
        assert_eq!(ds.rows[0].sex, Some(Sex::Male));
        assert_eq!(ds.rows[1].sex, None);
        assert_eq!(ds.rows[0].bill_length_mm, None);
        assert_eq!(ds.rows[0].year, None);
    }
}
