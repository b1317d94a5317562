//! LAI error types and status handling.
//!
//! Vendor libraries report `lai_status_t` codes; this module maps them onto
//! a Rust `Result` so device-control call sites can use `?`.

use std::fmt;
use thiserror::Error;

use crate::types::LaiObjectId;

/// LAI status codes matching the LAI C API.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaiStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    InvalidPortNumber = -9,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    NotExecuted = -23,
    InvalidAttribute = -24,
    AttrNotSupported = -25,
}

impl LaiStatus {
    /// Creates a LaiStatus from a raw i32 value.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => LaiStatus::Success,
            -1 => LaiStatus::Failure,
            -2 => LaiStatus::NotSupported,
            -3 => LaiStatus::NoMemory,
            -4 => LaiStatus::InsufficientResources,
            -5 => LaiStatus::InvalidParameter,
            -6 => LaiStatus::ItemAlreadyExists,
            -7 => LaiStatus::ItemNotFound,
            -8 => LaiStatus::BufferOverflow,
            -9 => LaiStatus::InvalidPortNumber,
            -12 => LaiStatus::Uninitialized,
            -13 => LaiStatus::TableFull,
            -14 => LaiStatus::MandatoryAttributeMissing,
            -15 => LaiStatus::NotImplemented,
            -17 => LaiStatus::ObjectInUse,
            -18 => LaiStatus::InvalidObjectType,
            -19 => LaiStatus::InvalidObjectId,
            -23 => LaiStatus::NotExecuted,
            -24 => LaiStatus::InvalidAttribute,
            -25 => LaiStatus::AttrNotSupported,
            _ => LaiStatus::Failure,
        }
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == LaiStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> LaiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(LaiError::from_status(self))
        }
    }
}

impl fmt::Display for LaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LaiStatus::Success => "LAI_STATUS_SUCCESS",
            LaiStatus::Failure => "LAI_STATUS_FAILURE",
            LaiStatus::NotSupported => "LAI_STATUS_NOT_SUPPORTED",
            LaiStatus::NoMemory => "LAI_STATUS_NO_MEMORY",
            LaiStatus::InsufficientResources => "LAI_STATUS_INSUFFICIENT_RESOURCES",
            LaiStatus::InvalidParameter => "LAI_STATUS_INVALID_PARAMETER",
            LaiStatus::ItemAlreadyExists => "LAI_STATUS_ITEM_ALREADY_EXISTS",
            LaiStatus::ItemNotFound => "LAI_STATUS_ITEM_NOT_FOUND",
            LaiStatus::BufferOverflow => "LAI_STATUS_BUFFER_OVERFLOW",
            LaiStatus::InvalidPortNumber => "LAI_STATUS_INVALID_PORT_NUMBER",
            LaiStatus::Uninitialized => "LAI_STATUS_UNINITIALIZED",
            LaiStatus::TableFull => "LAI_STATUS_TABLE_FULL",
            LaiStatus::MandatoryAttributeMissing => "LAI_STATUS_MANDATORY_ATTRIBUTE_MISSING",
            LaiStatus::NotImplemented => "LAI_STATUS_NOT_IMPLEMENTED",
            LaiStatus::ObjectInUse => "LAI_STATUS_OBJECT_IN_USE",
            LaiStatus::InvalidObjectType => "LAI_STATUS_INVALID_OBJECT_TYPE",
            LaiStatus::InvalidObjectId => "LAI_STATUS_INVALID_OBJECT_ID",
            LaiStatus::NotExecuted => "LAI_STATUS_NOT_EXECUTED",
            LaiStatus::InvalidAttribute => "LAI_STATUS_INVALID_ATTRIBUTE",
            LaiStatus::AttrNotSupported => "LAI_STATUS_ATTR_NOT_SUPPORTED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for LAI operations.
#[derive(Debug, Clone, Error)]
pub enum LaiError {
    /// LAI API returned an error status.
    #[error("LAI operation failed: {status}")]
    Status { status: LaiStatus },

    #[error("Feature not supported: {feature}")]
    NotSupported { feature: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Item not found: {item}")]
    NotFound { item: String },

    #[error("Item already exists: {item}")]
    AlreadyExists { item: String },

    #[error("Object in use: {object}")]
    ObjectInUse { object: String },

    /// A mandatory-on-create attribute was not supplied.
    #[error("Mandatory attribute missing: {attr}")]
    MandatoryAttributeMissing { attr: String },

    /// The object id does not decode to a valid object type.
    #[error("Invalid object id: {id}")]
    InvalidObjectId { id: LaiObjectId },

    /// The object type value is outside the catalog.
    #[error("Invalid object type: {value}")]
    InvalidObjectType { value: i64 },

    /// A serialized LAI value could not be parsed.
    #[error("Failed to parse {kind} from '{input}'")]
    Parse { kind: &'static str, input: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LaiError {
    /// Creates an error from a LAI status code.
    pub fn from_status(status: LaiStatus) -> Self {
        match status {
            LaiStatus::Success => LaiError::Internal {
                message: "from_status called with success status".to_string(),
            },
            LaiStatus::NotSupported | LaiStatus::NotImplemented | LaiStatus::AttrNotSupported => {
                LaiError::NotSupported {
                    feature: "unknown".to_string(),
                }
            }
            LaiStatus::ItemNotFound => LaiError::NotFound {
                item: "unknown".to_string(),
            },
            LaiStatus::ItemAlreadyExists => LaiError::AlreadyExists {
                item: "unknown".to_string(),
            },
            _ => LaiError::Status { status },
        }
    }

    pub fn not_supported(feature: impl Into<String>) -> Self {
        LaiError::NotSupported {
            feature: feature.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        LaiError::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn not_found(item: impl Into<String>) -> Self {
        LaiError::NotFound { item: item.into() }
    }

    pub fn already_exists(item: impl Into<String>) -> Self {
        LaiError::AlreadyExists { item: item.into() }
    }

    pub fn parse(kind: &'static str, input: impl Into<String>) -> Self {
        LaiError::Parse {
            kind,
            input: input.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        LaiError::Internal {
            message: message.into(),
        }
    }

    /// Returns the LAI status code this error would be reported as.
    pub fn status(&self) -> LaiStatus {
        match self {
            LaiError::Status { status } => *status,
            LaiError::NotSupported { .. } => LaiStatus::NotSupported,
            LaiError::InvalidParameter { .. } | LaiError::Parse { .. } => {
                LaiStatus::InvalidParameter
            }
            LaiError::NotFound { .. } => LaiStatus::ItemNotFound,
            LaiError::AlreadyExists { .. } => LaiStatus::ItemAlreadyExists,
            LaiError::ObjectInUse { .. } => LaiStatus::ObjectInUse,
            LaiError::MandatoryAttributeMissing { .. } => LaiStatus::MandatoryAttributeMissing,
            LaiError::InvalidObjectId { .. } => LaiStatus::InvalidObjectId,
            LaiError::InvalidObjectType { .. } => LaiStatus::InvalidObjectType,
            LaiError::Internal { .. } => LaiStatus::Failure,
        }
    }
}

/// Result type for LAI operations.
pub type LaiResult<T> = Result<T, LaiError>;

/// Extension trait for converting raw LAI status codes.
pub trait LaiStatusExt {
    fn to_result(self) -> LaiResult<()>;
}

impl LaiStatusExt for i32 {
    fn to_result(self) -> LaiResult<()> {
        LaiStatus::from_raw(self).into_result()
    }
}
