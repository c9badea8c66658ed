use std::collections::HashSet;

use crate::error::{CustomError, Result};

/// One row of the store's samples table.
#[derive(Debug, Clone)]
pub struct SampleRow {
    pub sample_id: Option<i64>,
    pub name: String,
}

/// Maps zero-based genotype columns to sample names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIndex {
    names: Vec<String>,
}

impl SampleIndex {
    /// Builds the index from 1-based `sample_id` rows in any order.
    /// The ids must be exactly `1..=rows.len()` and the names must be unique.
    /// Names become report fields, so they may not contain tabs or line breaks.
    pub fn from_rows(rows: Vec<SampleRow>) -> Result<Self> {
        let n_samples = rows.len();
        let mut slots: Vec<Option<String>> = vec![None; n_samples];
        let mut seen_names = HashSet::with_capacity(n_samples);

        for SampleRow { sample_id, name } in rows {
            let Some(sample_id) = sample_id else {
                return Err(CustomError::SchemaSampleIdMissing { name });
            };
            if name.contains(['\t', '\n', '\r']) {
                return Err(CustomError::SchemaSampleNameInvalid { name });
            }
            if sample_id < 1 || sample_id as u64 > n_samples as u64 {
                return Err(CustomError::SchemaSampleIdRange {
                    sample_id,
                    n_samples,
                });
            }
            let slot = &mut slots[(sample_id - 1) as usize];
            if slot.is_some() {
                return Err(CustomError::SchemaSampleIdDuplicate { sample_id });
            }
            if !seen_names.insert(name.clone()) {
                return Err(CustomError::SchemaSampleNameDuplicate { name });
            }
            *slot = Some(name);
        }

        // n unique ids within 1..=n fill every slot
        let names = slots.into_iter().flatten().collect();
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
