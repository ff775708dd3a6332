use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use super::super::domain::{Competency, RawCompetencyScores, WeightedScores};
use super::super::intake::validate_scores;
use super::AssessmentImportError;

const WEIGHT_COLUMN: &str = "weight_applied";

/// One export row keyed by header; score columns follow [`Competency::field_name`].
type Row = HashMap<String, String>;

fn cell<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn parse_cell<T: FromStr>(
    line: usize,
    column: &'static str,
    raw: &str,
) -> Result<T, AssessmentImportError> {
    raw.parse().map_err(|_| AssessmentImportError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    })
}

fn raw_scores(row: &Row, line: usize) -> Result<RawCompetencyScores, AssessmentImportError> {
    let mut scores = RawCompetencyScores::default();
    for competency in Competency::ALL {
        let column = competency.field_name();
        let value = cell(row, column)
            .map(|raw| parse_cell::<i64>(line, column, raw))
            .transpose()?;
        scores.set(competency, value);
    }
    Ok(scores)
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<WeightedScores>, AssessmentImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<Row>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index + 2;

        let scores = validate_scores(&raw_scores(&row, line)?)
            .map_err(|source| AssessmentImportError::InvalidRow { line, source })?;

        let weight_applied: f64 = match cell(&row, WEIGHT_COLUMN) {
            Some(raw) => parse_cell(line, WEIGHT_COLUMN, raw)?,
            None => {
                return Err(AssessmentImportError::MissingValue {
                    line,
                    column: WEIGHT_COLUMN,
                })
            }
        };
        if !(weight_applied.is_finite() && weight_applied > 0.0) {
            return Err(AssessmentImportError::InvalidWeight {
                line,
                weight: weight_applied,
            });
        }

        rows.push(WeightedScores {
            scores,
            weight_applied,
        });
    }

    Ok(rows)
}
