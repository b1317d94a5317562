//! Error types for syncd.
//!
//! Every variant aborts a reconciliation pass. Failures the pass tolerates
//! (deferred attribute sets, board-mode timeout) are logged where they
//! happen and never become a `SyncdError`.

use sonic_lai::{LaiError, LaiObjectId, LaiObjectType};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncdError>;

#[derive(Debug, Error)]
pub enum SyncdError {
    #[error("invalid ASIC_STATE key '{key}': {reason}")]
    InvalidAsicKey { key: String, reason: String },

    #[error("multiple linecards ({count}) in single hard reinit are not allowed")]
    MultipleLinecards { count: usize },

    #[error("passing non object id {object_type} as generic object (VID {vid})")]
    NonObjectIdRecord {
        object_type: LaiObjectType,
        vid: LaiObjectId,
    },

    #[error("linecard id can't be NULL")]
    NullLinecardVid,

    #[error("{objects} objects found but no linecard to create them on")]
    MissingLinecard { objects: usize },

    #[error("failed to find VID {vid} in OIDs map")]
    VidNotFound { vid: LaiObjectId },

    #[error("no metadata for attribute '{attr}' on {object_type}")]
    MissingAttributeMetadata {
        object_type: LaiObjectType,
        attr: String,
    },

    #[error("attribute {attr} is object id attribute but not processed")]
    UnprocessedOidAttribute { attr: &'static str },

    #[error("notification pointer attribute {attr} has no known handler")]
    UnknownNotificationPointer { attr: &'static str },

    #[error("failed to parse {attr} on VID {vid}: {source}")]
    AttributeParse {
        vid: LaiObjectId,
        attr: String,
        #[source]
        source: LaiError,
    },

    #[error("failed to create {object_type} VID {vid}: {source}")]
    CreateFailed {
        object_type: LaiObjectType,
        vid: LaiObjectId,
        #[source]
        source: LaiError,
    },

    #[error("failed to {action} pre-config on linecard {rid}: {source}")]
    PreConfiguration {
        action: &'static str,
        rid: LaiObjectId,
        #[source]
        source: LaiError,
    },

    #[error("cyclic creation dependency through VID {vid}")]
    CyclicDependency { vid: LaiObjectId },

    #[error("VID {vid} translated twice (RID {rid})")]
    DuplicateTranslation { vid: LaiObjectId, rid: LaiObjectId },

    #[error("vid to rid map is not empty ({}) after translation", .vids.len())]
    UntranslatedVids {
        vids: Vec<(LaiObjectId, LaiObjectType)>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid ASIC state snapshot: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LAI error: {0}")]
    Lai(#[from] LaiError),
}

impl SyncdError {
    pub fn config(message: impl Into<String>) -> Self {
        SyncdError::Config(message.into())
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncdError::InvalidAsicKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Persisted object the error is about, when it names one.
    pub fn failed_object(&self) -> Option<(LaiObjectType, LaiObjectId)> {
        match self {
            SyncdError::NonObjectIdRecord { object_type, vid }
            | SyncdError::CreateFailed {
                object_type, vid, ..
            } => Some((*object_type, *vid)),
            _ => None,
        }
    }
}
