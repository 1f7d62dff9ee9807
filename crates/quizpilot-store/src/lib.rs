//! quizpilot-store — CSV persistence for the answer ledger.
//!
//! One row per question: the first field is the question text, the remaining
//! fields are option cells annotated inline once classified. Rows are
//! variable-width; the header declares the widest row seen when the file was
//! created. Updates rewrite the whole row set through a temporary file and
//! an atomic replace, so a failed rewrite never truncates the live file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tempfile::NamedTempFile;

use quizpilot_core::error::LedgerError;
use quizpilot_core::model::{parse_cell, Ledger, OptionOutcome};
use quizpilot_core::traits::LedgerStore;

/// Header label for the question column.
const QUESTION_HEADER: &str = "Question";

/// CSV-backed [`LedgerStore`].
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_missing_or_empty(&self) -> Result<bool, LedgerError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(LedgerError::Io(e)),
        }
    }

    /// Read the header and every data row, surfacing malformed rows.
    fn read_rows(&self) -> Result<(StringRecord, Vec<StringRecord>), LedgerError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(map_csv)?;
        let header = reader.headers().map_err(map_csv)?.clone();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(map_csv)?;
            validate_row(&record, &header, index + 1)?;
            rows.push(record);
        }
        Ok((header, rows))
    }

    /// Replace the whole row set atomically.
    fn write_rows(&self, header: &StringRecord, rows: &[StringRecord]) -> Result<(), LedgerError> {
        let mut buf = Vec::new();
        {
            let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut buf);
            writer.write_record(header).map_err(map_csv)?;
            for row in rows {
                writer.write_record(row).map_err(map_csv)?;
            }
            writer.flush()?;
        }

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
        tmp.write_all(&buf)?;
        tmp.persist(&self.path).map_err(|e| LedgerError::Io(e.error))?;
        Ok(())
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self) -> Result<Ledger, LedgerError> {
        if self.is_missing_or_empty()? {
            return Ok(Ledger::new());
        }

        let (_, rows) = self.read_rows()?;
        let mut ledger = Ledger::new();
        for row in &rows {
            let question = row.get(0).unwrap_or_default();
            let cells: Vec<String> = row.iter().skip(1).map(str::to_string).collect();
            ledger.replay_row(question, &cells);
        }
        tracing::debug!(questions = ledger.len(), path = %self.path.display(), "ledger loaded");
        Ok(ledger)
    }

    fn append_question(&self, question: &str, cells: &[String]) -> Result<(), LedgerError> {
        let needs_header = self.is_missing_or_empty()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            let mut header = vec![QUESTION_HEADER.to_string()];
            for i in 1..=cells.len() {
                header.push(format!("Option {i}"));
            }
            writer.write_record(&header).map_err(map_csv)?;
        }

        let mut row = vec![question.to_string()];
        row.extend(cells.iter().cloned());
        writer.write_record(&row).map_err(map_csv)?;
        writer.flush()?;
        Ok(())
    }

    fn record_outcome(
        &self,
        question: &str,
        option: &str,
        outcome: OptionOutcome,
    ) -> Result<bool, LedgerError> {
        let Some(annotation) = outcome.annotation() else {
            return Ok(false);
        };

        let (header, mut rows) = self.read_rows()?;
        let mut updated = false;

        'rows: for row in rows.iter_mut() {
            if row.get(0) != Some(question) {
                continue;
            }
            for index in 1..row.len() {
                let cell = row.get(index).unwrap_or_default().trim();
                let (_, existing) = parse_cell(cell);
                // Only the first cell that matches and is still unclassified
                // takes the annotation.
                if existing == OptionOutcome::Unknown && cell == option.trim() {
                    let mut rebuilt = StringRecord::new();
                    for (j, field) in row.iter().enumerate() {
                        if j == index {
                            rebuilt.push_field(&format!("{cell} {annotation}"));
                        } else {
                            rebuilt.push_field(field);
                        }
                    }
                    *row = rebuilt;
                    updated = true;
                    break 'rows;
                }
            }
        }

        if updated {
            self.write_rows(&header, &rows)?;
        }
        Ok(updated)
    }
}

fn validate_row(
    record: &StringRecord,
    header: &StringRecord,
    row: usize,
) -> Result<(), LedgerError> {
    if record.get(0).is_none_or(|q| q.trim().is_empty()) {
        return Err(LedgerError::MalformedRow {
            row,
            reason: "empty question field".into(),
        });
    }
    if record.len() > header.len() {
        return Err(LedgerError::MalformedRow {
            row,
            reason: format!(
                "row has {} fields but the header declares {}",
                record.len(),
                header.len()
            ),
        });
    }
    Ok(())
}

fn map_csv(err: csv::Error) -> LedgerError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => LedgerError::Io(io),
        _ => LedgerError::Storage(message),
    }
}
