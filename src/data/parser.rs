use std::path::Path;

use tracing::debug;

use crate::data::record::{Dataset, Record};
use crate::error::{ParseError, ParseErrorKind, Result};

/// Reads delimited `f1,...,fn,label` lines into a [`Dataset`].
///
/// The first `skip_lines` lines are ignored (headers); blank lines are
/// skipped. Any malformed line aborts the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReader {
    pub skip_lines: usize,
    pub delimiter: char,
    pub num_features: usize,
    pub num_classes: usize,
}

impl RecordReader {
    pub fn new(skip_lines: usize, delimiter: char, num_features: usize, num_classes: usize) -> Self {
        RecordReader { skip_lines, delimiter, num_features, num_classes }
    }

    pub fn read_path(&self, path: &Path) -> Result<Dataset> {
        let text = std::fs::read_to_string(path)?;
        let dataset = self.read_str(&text)?;
        debug!(path = %path.display(), records = dataset.len(), "parsed dataset");
        Ok(dataset)
    }

    pub fn read_str(&self, text: &str) -> std::result::Result<Dataset, ParseError> {
        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate().skip(self.skip_lines) {
            if line.trim().is_empty() {
                continue;
            }
            let record = self
                .parse_line(line)
                .map_err(|kind| ParseError { line: idx + 1, kind })?;
            records.push(record);
        }
        Ok(Dataset::new(records))
    }

    fn parse_line(&self, line: &str) -> std::result::Result<Record, ParseErrorKind> {
        let cells: Vec<&str> = line.split(self.delimiter).map(str::trim).collect();
        if cells.len() != self.num_features + 1 {
            return Err(ParseErrorKind::FieldCount {
                expected: self.num_features + 1,
                got: cells.len(),
            });
        }

        let (feature_cells, label_cell) = cells.split_at(self.num_features);
        let features = feature_cells
            .iter()
            .map(|c| match c.parse::<f64>() {
                // `f64::from_str` also takes "NaN" and "inf"; only finite decimals are data.
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ParseErrorKind::NotANumber(c.to_string())),
            })
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        let label_text = label_cell[0];
        let label = label_text
            .parse::<usize>()
            .map_err(|_| ParseErrorKind::InvalidLabel(label_text.to_string()))?;
        if label >= self.num_classes {
            return Err(ParseErrorKind::LabelOutOfRange { label, num_classes: self.num_classes });
        }

        Ok(Record::new(features, label))
    }
}
