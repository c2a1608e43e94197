//! CSV reader for the embedded datasets.
//!
//! Layout: a header row of feature names followed by a final `target`
//! column holding the 0-based class index.
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::error::{ClassifierError, Result};

const TARGET_COLUMN: &str = "target";

pub(super) fn parse_labelled_csv(text: &str) -> Result<(Array2<f64>, Array1<usize>, Vec<String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let label_idx = find_column(&headers, TARGET_COLUMN).ok_or_else(|| {
        ClassifierError::MalformedData(format!("missing '{}' column", TARGET_COLUMN))
    })?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != label_idx)
        .map(|(_, name)| name.trim().to_string())
        .collect();
    let n_features = feature_names.len();

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;

        let label = record
            .get(label_idx)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or_else(|| {
                ClassifierError::MalformedData(format!("invalid label at row {}", row_idx + 1))
            })?;
        labels.push(label);

        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == label_idx {
                continue;
            }
            let parsed = value.trim().parse::<f64>().map_err(|_| {
                ClassifierError::MalformedData(format!(
                    "invalid value '{}' at row {}, column {}",
                    value,
                    row_idx + 1,
                    col_idx + 1
                ))
            })?;
            features.push(parsed);
        }
    }

    let records = Array2::from_shape_vec((labels.len(), n_features), features)?;
    Ok((records, Array1::from_vec(labels), feature_names))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small_csv() {
        let text = "a,b,target\n1.0,2.5,0\n3,4,1\n";
        let (x, y, names) = parse_labelled_csv(text).unwrap();
        assert_eq!(x.dim(), (2, 2));
        assert_eq!(x[(0, 1)], 2.5);
        assert_eq!(y.to_vec(), vec![0, 1]);
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_target_column() {
        let text = "a,b\n1,2\n";
        assert!(matches!(
            parse_labelled_csv(text),
            Err(ClassifierError::MalformedData(_))
        ));
    }

    #[test]
    fn test_bad_value_reports_row() {
        let text = "a,target\n1,0\nx,1\n";
        let err = parse_labelled_csv(text).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{}", err);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let text = "a,b,target\n1,2,0\n3,1\n";
        assert!(parse_labelled_csv(text).is_err());
    }
}
