//! Allocator errors.

use sonic_lai::oid::{GLOBAL_CONTEXT_MAX, LINECARD_INDEX_MAX, OBJECT_INDEX_MAX};
use sonic_lai::{LaiError, LaiObjectId, LaiObjectType, LaiStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OidManagerError {
    #[error("specified global context 0x{context:x} > maximum global context 0x{max:x}", max = GLOBAL_CONTEXT_MAX)]
    InvalidGlobalContext { context: u32 },

    #[error("invalid object type: {object_type}")]
    InvalidObjectType { object_type: LaiObjectType },

    #[error("this function can't be used to allocate linecard id")]
    LinecardTypeNotAllowed,

    #[error("object type of linecard {id} is {object_type}, should be LINECARD")]
    NotALinecard {
        id: LaiObjectId,
        object_type: LaiObjectType,
    },

    #[error("no more object indexes available for {object_type}, given: 0x{index:x} but limit is 0x{max:x}", max = OBJECT_INDEX_MAX)]
    ObjectIndexExhausted {
        object_type: LaiObjectType,
        index: u64,
    },

    #[error("no more available linecard indexes (used count is: {used})")]
    LinecardIndexExhausted { used: usize },

    #[error("linecard index {index} > {max} (max)", max = LINECARD_INDEX_MAX)]
    LinecardIndexOutOfRange { index: u32 },

    #[error("linecard index 0x{index:x} is invalid! programming error")]
    LinecardIndexNotAllocated { index: u32 },
}

impl OidManagerError {
    /// Resource exhaustion is never transient; callers should not retry.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            OidManagerError::ObjectIndexExhausted { .. }
                | OidManagerError::LinecardIndexExhausted { .. }
        )
    }
}

impl From<OidManagerError> for LaiError {
    fn from(err: OidManagerError) -> Self {
        if err.is_exhaustion() {
            LaiError::Status {
                status: LaiStatus::InsufficientResources,
            }
        } else {
            LaiError::invalid_parameter(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, OidManagerError>;
