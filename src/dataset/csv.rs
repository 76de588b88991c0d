//! CSV example loading.
//!
//! Supported format: UTF-8, comma-separated, optional header row
//! (auto-detected: a first row with any non-numeric, non-empty cell is
//! treated as a header), double-quoted fields with embedded commas.

use crate::dataset::memory::SplitDataset;
use crate::dataset::provider::DatasetError;

/// How the label column(s) at the end of each row are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Last column is an integer class index; one-hot encoded to `n_classes`.
    ClassIndex { n_classes: usize },
    /// Last `n_label_cols` columns are the label vector as-is.
    OneHot { n_label_cols: usize },
}

/// Parses CSV bytes into `(inputs, labels)` rows.
pub fn parse_csv(
    data: &[u8],
    label_mode: LabelMode,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), DatasetError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| DatasetError("CSV file is not valid UTF-8".into()))?;

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells = split_fields(line);
        if cells.is_empty() {
            continue;
        }
        // Header auto-detect only applies to the very first data line.
        if inputs.is_empty() && labels.is_empty() && looks_like_header(&cells) {
            continue;
        }

        let row_no = line_no + 1;
        let (feats, label) = match label_mode {
            LabelMode::ClassIndex { n_classes } => {
                if cells.len() < 2 {
                    return Err(DatasetError(format!(
                        "row {}: need features plus a class index, got {} column(s)",
                        row_no,
                        cells.len()
                    )));
                }
                let (feature_cells, class_cell) = cells.split_at(cells.len() - 1);
                let class: usize = class_cell[0].trim().parse().map_err(|_| {
                    DatasetError(format!(
                        "row {}: class index '{}' is not a non-negative integer",
                        row_no, class_cell[0]
                    ))
                })?;
                if class >= n_classes {
                    return Err(DatasetError(format!(
                        "row {}: class index {} is out of range for {} classes",
                        row_no, class, n_classes
                    )));
                }
                let mut one_hot = vec![0.0; n_classes];
                one_hot[class] = 1.0;
                (parse_floats(feature_cells, row_no)?, one_hot)
            }
            LabelMode::OneHot { n_label_cols } => {
                if cells.len() < n_label_cols + 1 {
                    return Err(DatasetError(format!(
                        "row {}: need at least {} columns, got {}",
                        row_no,
                        n_label_cols + 1,
                        cells.len()
                    )));
                }
                let (feature_cells, label_cells) = cells.split_at(cells.len() - n_label_cols);
                (
                    parse_floats(feature_cells, row_no)?,
                    parse_floats(label_cells, row_no)?,
                )
            }
        };

        if let Some(first) = inputs.first() {
            if feats.len() != first.len() {
                return Err(DatasetError(format!(
                    "row {}: feature count {} does not match the first row's {}",
                    row_no,
                    feats.len(),
                    first.len()
                )));
            }
        }
        inputs.push(feats);
        labels.push(label);
    }

    if inputs.is_empty() {
        return Err(DatasetError("CSV contains no data rows".into()));
    }
    Ok((inputs, labels))
}

/// Parses CSV bytes straight into a [`SplitDataset`], holding back
/// `val_split_pct` percent of the rows.
pub fn from_csv(
    data: &[u8],
    label_mode: LabelMode,
    val_split_pct: u8,
) -> Result<SplitDataset, DatasetError> {
    let (inputs, labels) = parse_csv(data, label_mode)?;
    Ok(SplitDataset::from_rows(inputs, labels, val_split_pct))
}

/// A header is any row containing a non-empty cell that does not parse as a
/// number.
fn looks_like_header(cells: &[String]) -> bool {
    cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits one line into fields, honoring double quotes; `""` inside a quoted
/// field is an escaped quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_no: usize) -> Result<Vec<f64>, DatasetError> {
    cells
        .iter()
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| DatasetError(format!("row {}: '{}' is not a valid number", row_no, c)))
        })
        .collect()
}
