use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Garment, GarmentRecord, RecordRejection, Role},
};

/// A catalog row that failed validation at load time
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RejectedRecord {
    /// Position of the row in the source list
    pub index: usize,
    pub image_link: Option<String>,
    pub reason: RecordRejection,
}

/// In-memory garment table
///
/// Rows keep their source order, which ranking relies on to break ties.
#[derive(Debug, Clone, Default)]
pub struct GarmentCatalog {
    garments: Vec<Garment>,
}

impl GarmentCatalog {
    pub fn new(garments: Vec<Garment>) -> Self {
        Self { garments }
    }

    /// Validates raw records, quarantining rows that cannot be ranked
    pub fn from_records(records: Vec<GarmentRecord>) -> (Self, Vec<RejectedRecord>) {
        Self::ingest(
            records
                .into_iter()
                .map(|record| (record.image_link.clone(), Ok(record))),
        )
    }

    /// Validates untyped JSON rows one by one, so a row with a wrongly typed
    /// field is quarantined instead of failing the whole load
    pub fn from_values(rows: Vec<Value>) -> (Self, Vec<RejectedRecord>) {
        Self::ingest(rows.into_iter().map(|row| {
            let image_link = row
                .get("image_link")
                .and_then(Value::as_str)
                .map(str::to_string);
            let record = serde_json::from_value::<GarmentRecord>(row)
                .map_err(|e| RecordRejection::Malformed(e.to_string()));
            (image_link, record)
        }))
    }

    fn ingest(
        rows: impl Iterator<Item = (Option<String>, Result<GarmentRecord, RecordRejection>)>,
    ) -> (Self, Vec<RejectedRecord>) {
        let mut garments = Vec::new();
        let mut rejected = Vec::new();
        let mut total = 0;

        for (index, (image_link, record)) in rows.enumerate() {
            total += 1;
            match record.and_then(Garment::try_from) {
                Ok(garment) => garments.push(garment),
                Err(reason) => {
                    tracing::warn!(
                        index,
                        image_link = ?image_link,
                        reason = %reason,
                        "Excluding catalog row"
                    );
                    rejected.push(RejectedRecord {
                        index,
                        image_link,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            total,
            accepted = garments.len(),
            rejected = rejected.len(),
            "Garment catalog loaded"
        );

        (Self { garments }, rejected)
    }

    /// Reads a JSON array of garment records from disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<(Self, Vec<RejectedRecord>)> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let rows: Vec<Value> = serde_json::from_str(&raw).map_err(|e| {
            AppError::InvalidInput(format!(
                "Catalog file {} is not a list of garments: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::from_values(rows))
    }

    pub fn len(&self) -> usize {
        self.garments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.garments.is_empty()
    }

    pub fn garments(&self) -> &[Garment] {
        &self.garments
    }

    /// Rows eligible for `role`: matching category role and a compatible layer position
    pub fn candidates(&self, role: Role) -> Vec<&Garment> {
        self.garments
            .iter()
            .filter(|g| g.role == role && role.accepts(g.layer_position))
            .collect()
    }
}
