use core_types::types::{ModuleId, OfferId, Points, UserId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PointsError>;

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("learning module {module_id} not found")]
    ModuleNotFound { module_id: ModuleId },
    #[error("stock offer {offer_id} not found")]
    OfferNotFound { offer_id: OfferId },
    #[error("module {module_id} already completed by {user_id}")]
    AlreadyCompleted { user_id: UserId, module_id: ModuleId },
    #[error("insufficient points: required {required}, available {available}")]
    InsufficientBalance { required: Points, available: Points },
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl PointsError {
    pub fn blank(field: &'static str) -> Self {
        PointsError::Validation {
            field,
            reason: "must not be blank".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
