use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema, UInt64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use super::model::{ComplexSample, SweepSnapshot};

// ---------------------------------------------------------------------------
// Row layout shared by every format
// ---------------------------------------------------------------------------

/// One sweep point as stored on disk. The S21 columns are optional but must
/// be present on every row or on none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub freq: u64,
    pub s11_re: f64,
    pub s11_im: f64,
    #[serde(default)]
    pub s21_re: Option<f64>,
    #[serde(default)]
    pub s21_im: Option<f64>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sweep from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `freq`, `s11_re`, `s11_im` and optionally `s21_re`, `s21_im`
/// * `.json`    – `[{ "freq": 1000000, "s11_re": 0.1, "s11_im": -0.2, ... }, ...]`
/// * `.csv`     – header row with the same column names
pub fn load_file(path: &Path) -> Result<SweepSnapshot> {
    let records = match extension(path).as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        "csv" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    let sweep = records_to_snapshot(&records)?;
    log::info!(
        "Loaded {} points ({} with S21) from {}",
        sweep.s11.len(),
        sweep.s21.len(),
        path.display()
    );
    Ok(sweep)
}

/// Write a sweep in the format implied by the file extension.
pub fn save_file(path: &Path, sweep: &SweepSnapshot) -> Result<()> {
    let records = snapshot_to_records(sweep);
    match extension(path).as_str() {
        "parquet" | "pq" => write_parquet(path, &records),
        "json" => {
            let text = serde_json::to_string_pretty(&records).context("encoding JSON")?;
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
        }
        "csv" => write_csv(path, &records),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Records ↔ snapshot
// ---------------------------------------------------------------------------

/// Validate rows and split them into S11 and S21 sequences.
pub fn records_to_snapshot(records: &[SweepRecord]) -> Result<SweepSnapshot> {
    if let Some(i) = records.windows(2).position(|w| w[1].freq <= w[0].freq) {
        bail!(
            "Row {}: frequency {} Hz does not increase over {} Hz",
            i + 1,
            records[i + 1].freq,
            records[i].freq
        );
    }

    let mut s11 = Vec::with_capacity(records.len());
    let mut s21 = Vec::new();
    let with_s21 = records
        .first()
        .is_some_and(|r| r.s21_re.is_some() || r.s21_im.is_some());

    for (i, rec) in records.iter().enumerate() {
        s11.push(ComplexSample::new(rec.freq, rec.s11_re, rec.s11_im));
        match (rec.s21_re, rec.s21_im) {
            (Some(re), Some(im)) if with_s21 => s21.push(ComplexSample::new(rec.freq, re, im)),
            (None, None) if !with_s21 => {}
            _ => bail!("Row {i}: S21 columns must be filled on every row or on none"),
        }
    }

    Ok(SweepSnapshot::new(s11, s21))
}

/// Flatten a snapshot into rows. S21 is written only when it lines up with S11.
pub fn snapshot_to_records(sweep: &SweepSnapshot) -> Vec<SweepRecord> {
    let with_s21 = sweep.has_transmission();
    sweep
        .s11
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let through = with_s21.then(|| sweep.s21[i].coefficient);
            SweepRecord {
                freq: p.freq,
                s11_re: p.coefficient.re,
                s11_im: p.coefficient.im,
                s21_re: through.map(|c| c.re),
                s21_im: through.map(|c| c.im),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON / CSV
// ---------------------------------------------------------------------------

fn read_json(path: &Path) -> Result<Vec<SweepRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON sweep records")
}

fn read_csv(path: &Path) -> Result<Vec<SweepRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize::<SweepRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

fn write_csv(path: &Path, records: &[SweepRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Read every record batch of a Parquet file. Numeric columns of any width
/// are accepted and cast to `u64` (freq) or `f64` (coefficients).
fn read_parquet(path: &Path) -> Result<Vec<SweepRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let freq = numeric_column(&batch, "freq", DataType::UInt64)?
            .context("Parquet file missing 'freq' column")?;
        let freq = freq.as_primitive::<UInt64Type>();
        let s11_re = float_column(&batch, "s11_re")?.context("Parquet file missing 's11_re' column")?;
        let s11_im = float_column(&batch, "s11_im")?.context("Parquet file missing 's11_im' column")?;
        let s21_re = float_column(&batch, "s21_re")?;
        let s21_im = float_column(&batch, "s21_im")?;

        for row in 0..batch.num_rows() {
            records.push(SweepRecord {
                freq: freq.value(row),
                s11_re: s11_re[row],
                s11_im: s11_im[row],
                s21_re: s21_re.as_ref().map(|c| c[row]),
                s21_im: s21_im.as_ref().map(|c| c[row]),
            });
        }
    }

    Ok(records)
}

/// Cast a column to `to_type`; `None` when the column is absent.
fn numeric_column(batch: &RecordBatch, name: &str, to_type: DataType) -> Result<Option<ArrayRef>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let converted = cast(col.as_ref(), &to_type)
        .with_context(|| format!("column '{name}' is not numeric"))?;
    if converted.null_count() > 0 {
        bail!("column '{name}' contains null or out-of-range values");
    }
    Ok(Some(converted))
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Option<Vec<f64>>> {
    Ok(numeric_column(batch, name, DataType::Float64)?
        .map(|col| col.as_primitive::<Float64Type>().values().to_vec()))
}

fn write_parquet(path: &Path, records: &[SweepRecord]) -> Result<()> {
    let mut fields = vec![
        Field::new("freq", DataType::UInt64, false),
        Field::new("s11_re", DataType::Float64, false),
        Field::new("s11_im", DataType::Float64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(records.iter().map(|r| r.freq))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.s11_re))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.s11_im))),
    ];

    if records.first().is_some_and(|r| r.s21_re.is_some()) {
        fields.push(Field::new("s21_re", DataType::Float64, false));
        fields.push(Field::new("s21_im", DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.s21_re.unwrap_or(f64::NAN)),
        )));
        columns.push(Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.s21_im.unwrap_or(f64::NAN)),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sweep(with_s21: bool) -> SweepSnapshot {
        let s11: Vec<ComplexSample> = (0..5)
            .map(|i| ComplexSample::new(1_000_000 + i * 250_000, 0.1 * i as f64, -0.05))
            .collect();
        let s21 = if with_s21 {
            s11.iter()
                .map(|p| ComplexSample::new(p.freq, 0.5, 0.01 * p.freq as f64 / 1e6))
                .collect()
        } else {
            Vec::new()
        };
        SweepSnapshot::new(s11, s21)
    }

    fn assert_same(a: &SweepSnapshot, b: &SweepSnapshot) {
        assert_eq!(a.s11.len(), b.s11.len());
        assert_eq!(a.s21.len(), b.s21.len());
        let pairs = a.s11.iter().zip(b.s11.iter()).chain(a.s21.iter().zip(b.s21.iter()));
        for (x, y) in pairs {
            assert_eq!(x.freq, y.freq);
            assert!((x.coefficient - y.coefficient).norm() < 1e-12);
        }
    }

    #[test]
    fn csv_with_and_without_s21() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sweep.csv");
        std::fs::write(
            &path,
            "freq,s11_re,s11_im,s21_re,s21_im\n1000,0.1,0.2,0.5,0.5\n2000,0.2,0.1,0.4,0.6\n",
        )
        .unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.has_transmission());
        assert_eq!(loaded.s21[1], ComplexSample::new(2000, 0.4, 0.6));

        std::fs::write(&path, "freq,s11_re,s11_im\n1000,0.1,0.2\n2000,0.2,0.1\n").unwrap();
        let loaded = load_file(&path).unwrap();
        assert!(loaded.s21.is_empty());
    }

    #[test]
    fn json_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sweep.json");
        std::fs::write(
            &path,
            r#"[{"freq": 10, "s11_re": 0.5, "s11_im": 0.0}, {"freq": 20, "s11_re": 0.4, "s11_im": -0.1}]"#,
        )
        .unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.s11[0], ComplexSample::new(10, 0.5, 0.0));
        assert!(loaded.s21.is_empty());
    }

    #[test]
    fn saved_files_load_back() {
        let temp_dir = TempDir::new().unwrap();
        for (name, with_s21) in [("rt.parquet", true), ("rt2.parquet", false), ("rt.csv", true), ("rt.json", true)] {
            let path = temp_dir.path().join(name);
            let original = sweep(with_s21);
            save_file(&path, &original).unwrap();
            let loaded = load_file(&path).unwrap();
            assert_same(&loaded, &original);
        }
    }

    #[test]
    fn rejects_unsorted_frequencies() {
        let rec = |freq| SweepRecord {
            freq,
            s11_re: 0.0,
            s11_im: 0.0,
            s21_re: None,
            s21_im: None,
        };
        let err = records_to_snapshot(&[rec(10), rec(30), rec(30)]).unwrap_err();
        assert!(err.to_string().contains("Row 2"), "{err}");
    }

    #[test]
    fn rejects_partial_s21() {
        let records = vec![
            SweepRecord { freq: 1, s11_re: 0.0, s11_im: 0.0, s21_re: Some(0.1), s21_im: Some(0.1) },
            SweepRecord { freq: 2, s11_re: 0.0, s11_im: 0.0, s21_re: None, s21_im: None },
        ];
        assert!(records_to_snapshot(&records).is_err());

        let half = vec![SweepRecord { freq: 1, s11_re: 0.0, s11_im: 0.0, s21_re: Some(0.1), s21_im: None }];
        assert!(records_to_snapshot(&half).is_err());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("sweep.s1p")).unwrap_err();
        assert!(err.to_string().contains(".s1p"));
    }
}
