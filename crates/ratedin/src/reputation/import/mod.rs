//! Offline scoring input: CSV exports of stored assessments.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::WeightedScores;
use super::intake::ValidationError;

#[derive(Debug)]
pub enum AssessmentImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow {
        line: usize,
        source: ValidationError,
    },
    InvalidWeight {
        line: usize,
        weight: f64,
    },
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
    MissingValue {
        line: usize,
        column: &'static str,
    },
}

impl std::fmt::Display for AssessmentImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentImportError::Io(err) => write!(f, "failed to read assessment export: {}", err),
            AssessmentImportError::Csv(err) => write!(f, "invalid assessment CSV data: {}", err),
            AssessmentImportError::InvalidRow { line, source } => {
                write!(f, "line {}: {}", line, source)
            }
            AssessmentImportError::InvalidWeight { line, weight } => {
                write!(f, "line {}: weight_applied {} must be positive", line, weight)
            }
            AssessmentImportError::InvalidValue {
                line,
                column,
                value,
            } => write!(f, "line {}: {} value '{}' is not a number", line, column, value),
            AssessmentImportError::MissingValue { line, column } => {
                write!(f, "line {}: {} is missing", line, column)
            }
        }
    }
}

impl std::error::Error for AssessmentImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssessmentImportError::Io(err) => Some(err),
            AssessmentImportError::Csv(err) => Some(err),
            AssessmentImportError::InvalidRow { source, .. } => Some(source),
            AssessmentImportError::InvalidWeight { .. }
            | AssessmentImportError::InvalidValue { .. }
            | AssessmentImportError::MissingValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for AssessmentImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AssessmentImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct AssessmentCsvImporter;

impl AssessmentCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<WeightedScores>, AssessmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<WeightedScores>, AssessmentImportError> {
        parser::parse_rows(reader)
    }
}
