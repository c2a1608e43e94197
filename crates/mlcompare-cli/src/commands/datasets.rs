use anyhow::Result;
use serde::Serialize;

use mlcompare_classifiers::datasets::{self, DatasetId};

/// Shape and class balance of one built-in dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub rows: usize,
    pub features: usize,
    pub classes: Vec<(String, usize)>,
}

pub fn catalog() -> Result<Vec<DatasetInfo>> {
    DatasetId::ALL
        .iter()
        .map(|&id| -> Result<DatasetInfo> {
            let ds = datasets::load(id)?;
            let classes = ds
                .target_names
                .iter()
                .cloned()
                .zip(ds.class_counts())
                .collect();
            Ok(DatasetInfo {
                id,
                rows: ds.nrows(),
                features: ds.ncols(),
                classes,
            })
        })
        .collect()
}

impl DatasetInfo {
    pub fn describe(&self) -> String {
        let classes: Vec<String> = self
            .classes
            .iter()
            .map(|(name, count)| format!("{}={}", name, count))
            .collect();
        format!(
            "{:<14} {:>4} rows x {:>2} features, {} classes ({})",
            self.id.display_name(),
            self.rows,
            self.features,
            self.classes.len(),
            classes.join(", ")
        )
    }
}
