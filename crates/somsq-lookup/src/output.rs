use crate::batch::BatchSink;
use crate::Result;
use csv::Writer;
use somsq_core::{ExtractMode, LogEntry, OutputRow, LOG_COLUMNS};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Result table and request log, both CSV, headers written on creation.
pub struct CsvBatchSink {
    rows: Writer<File>,
    log: Writer<File>,
    mode: ExtractMode,
}

impl CsvBatchSink {
    pub fn create(output_path: &Path, log_path: &Path, mode: ExtractMode) -> Result<Self> {
        debug!(output = %output_path.display(), log = %log_path.display(), "creating csv outputs");
        let mut rows = Writer::from_path(output_path)?;
        rows.write_record(mode.output_columns())?;
        rows.flush()?;

        let mut log = Writer::from_path(log_path)?;
        log.write_record(LOG_COLUMNS)?;
        log.flush()?;

        Ok(Self { rows, log, mode })
    }
}

impl BatchSink for CsvBatchSink {
    fn write_rows(&mut self, rows: &[OutputRow]) -> Result<()> {
        for row in rows {
            self.rows.write_record(row.to_record(self.mode))?;
        }
        self.rows.flush()?;
        Ok(())
    }

    fn write_log(&mut self, entry: &LogEntry) -> Result<()> {
        self.log.write_record(entry.to_record())?;
        self.log.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CsvBatchSink;
    use crate::batch::BatchSink;
    use somsq_core::{normalize_phone, ExtractMode, LogEntry, OutputRow};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_headers_even_without_rows() {
        let temp = TempDir::new().expect("tempdir");
        let output = temp.path().join("output.csv");
        let log = temp.path().join("log.csv");
        drop(CsvBatchSink::create(&output, &log, ExtractMode::Nombre).expect("create"));

        let output = fs::read_to_string(output).expect("read output");
        assert_eq!(output, "telefono_entrada,telefono_11,lada,telefono_8,nombre_completo\n");
        let log = fs::read_to_string(log).expect("read log");
        assert!(log.starts_with("registrado_en,telefono_raw,telefono_digits,"));
    }

    #[test]
    fn writes_rows_for_mode() {
        let temp = TempDir::new().expect("tempdir");
        let output = temp.path().join("output.csv");
        let log = temp.path().join("log.csv");
        let mut sink = CsvBatchSink::create(&output, &log, ExtractMode::Ambos).expect("create");

        let phone = normalize_phone("9811111111").unwrap();
        let mut row = OutputRow::new("981 111 1111", &phone, &phone.split());
        row.id_cliente = Some("0069657104".to_string());
        sink.write_rows(&[row]).expect("write rows");

        let mut entry = LogEntry::new("2026-01-01T00:00:00Z", "981 111 1111", "9811111111");
        entry.ok = true;
        entry.error = Some("a, b".to_string());
        sink.write_log(&entry).expect("write log");

        let output = fs::read_to_string(output).expect("read output");
        assert_eq!(
            output.lines().nth(1),
            Some("981 111 1111,09811111111,098,11111111,0069657104,")
        );
        let log = fs::read_to_string(log).expect("read log");
        assert_eq!(
            log.lines().nth(1),
            Some("2026-01-01T00:00:00Z,981 111 1111,9811111111,,,,,,1,0,0,,\"a, b\"")
        );
    }
}
