//! Safe Rust types for LAI (Line-card Abstraction Interface).
//!
//! # Architecture
//!
//! - [`types`]: object types and object identifiers
//! - [`oid`]: the 64-bit object id codec
//! - [`attr`]: tagged attribute values
//! - [`metadata`]: read-only catalog of object types and attribute flags
//! - [`serialize`]: persisted string forms of ids and attribute values
//! - [`error`]: status codes and error handling
//! - [`api`]: the device-control and notification traits

pub mod api;
pub mod attr;
pub mod error;
pub mod metadata;
pub mod oid;
pub mod serialize;
pub mod types;

pub use api::{LaiApi, LaiNotificationSink};
pub use attr::{LaiAttrId, LaiAttribute, LaiAttributeValue, LaiPointer};
pub use error::{LaiError, LaiResult, LaiStatus};
pub use metadata::{AttrFlags, AttrMetadata, AttrValueType, LaiMetadata, StaticLaiMetadata};
pub use types::{LaiNotificationKind, LaiObjectId, LaiObjectType, RawLaiObjectId};
