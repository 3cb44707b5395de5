//! Pre-classified CSV datasets: loading, validation, browsing and re-export.

use log::debug;
use std::cmp::Ordering;
use std::fmt;
use std::io::{Read, Write};

pub const TEXT_COLUMN: &str = "texto";
pub const LABEL_COLUMN: &str = "etiqueta_gpt";
pub const SUBTYPE_COLUMN: &str = "subtipo_gpt";
pub const CONFIDENCE_COLUMN: &str = "confidence_gpt";
pub const REASON_COLUMN: &str = "reason_gpt";

/// Columns every uploaded file must carry, in this order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    TEXT_COLUMN,
    LABEL_COLUMN,
    SUBTYPE_COLUMN,
    CONFIDENCE_COLUMN,
    REASON_COLUMN,
];

/// File name suggested for re-exports.
pub const DEFAULT_EXPORT_NAME: &str = "semitia_clasificado.csv";

#[derive(Debug)]
pub enum DatasetError {
    /// The header row lacks one or more required columns.
    MissingColumns(Vec<String>),
    /// The file could not be parsed or written as CSV.
    Csv(csv::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::MissingColumns(columns) => write!(
                f,
                "Invalid input: the CSV is missing required column(s): {}",
                columns.join(", ")
            ),
            DatasetError::Csv(e) => write!(f, "Invalid input: could not read CSV: {}", e),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Csv(e) => Some(e),
            DatasetError::MissingColumns(_) => None,
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Csv(e)
    }
}

/// The browsable projection of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub text: &'a str,
    pub subtype: &'a str,
    pub confidence: &'a str,
    pub reason: &'a str,
}

/// A parsed CSV file that carries every required column.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
    text_idx: usize,
    label_idx: usize,
    subtype_idx: usize,
    confidence_idx: usize,
    reason_idx: usize,
}

impl Dataset {
    #[tracing::instrument(skip(reader))]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        // Spreadsheet exports often start with a UTF-8 BOM.
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&c| position(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            debug!("CSV header {:?} lacks {:?}", headers, missing);
            return Err(DatasetError::MissingColumns(missing));
        }

        let index = |name: &str| position(name).unwrap_or_default();
        let (text_idx, label_idx, subtype_idx, confidence_idx, reason_idx) = (
            index(TEXT_COLUMN),
            index(LABEL_COLUMN),
            index(SUBTYPE_COLUMN),
            index(CONFIDENCE_COLUMN),
            index(REASON_COLUMN),
        );

        let records = csv_reader
            .records()
            .collect::<Result<Vec<_>, csv::Error>>()?;
        debug!("Loaded {} row(s)", records.len());

        Ok(Self {
            headers,
            records,
            text_idx,
            label_idx,
            subtype_idx,
            confidence_idx,
            reason_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn label_of<'a>(&self, record: &'a csv::StringRecord) -> &'a str {
        record.get(self.label_idx).unwrap_or_default().trim()
    }

    /// Row count per label, ordered by [`compare_labels`]. Numeric labels
    /// are grouped by value under their first spelling. Rows with an empty
    /// label are left out.
    pub fn label_distribution(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in &self.records {
            let label = self.label_of(record);
            if label.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(l, _)| labels_equal(l, label)) {
                Some((_, n)) => *n += 1,
                None => counts.push((label.to_string(), 1)),
            }
        }
        counts.sort_by(|a, b| compare_labels(&a.0, &b.0));
        counts
    }

    /// Distinct non-empty labels in display order.
    pub fn labels(&self) -> Vec<String> {
        self.label_distribution()
            .into_iter()
            .map(|(label, _)| label)
            .collect()
    }

    /// Rows whose label equals `label`.
    pub fn filter_by_label(&self, label: &str) -> Vec<Row<'_>> {
        let label = label.trim();
        self.records
            .iter()
            .filter(|r| labels_equal(self.label_of(r), label))
            .map(|r| Row {
                text: r.get(self.text_idx).unwrap_or_default(),
                subtype: r.get(self.subtype_idx).unwrap_or_default(),
                confidence: r.get(self.confidence_idx).unwrap_or_default(),
                reason: r.get(self.reason_idx).unwrap_or_default(),
            })
            .collect()
    }

    /// Writes the table back out unchanged.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for record in &self.records {
            csv_writer.write_record(record)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Numeric labels compare by value ("2" and "2.0" are the same category).
fn labels_equal(a: &str, b: &str) -> bool {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

/// Numeric labels first in numeric order, then the rest lexically.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then(a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
