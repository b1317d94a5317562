//! Virtual LAI line card.
//!
//! Provides the real-id allocator used by the virtual switch backend and
//! an in-memory [`VirtualLai`] device that implements
//! [`sonic_lai::LaiApi`].

pub mod error;
pub mod linecard_config;
pub mod oid_manager;
pub mod virtual_lai;

pub use error::{OidManagerError, Result};
pub use linecard_config::{LinecardConfig, LinecardConfigContainer};
pub use oid_manager::RealObjectIdManager;
pub use virtual_lai::VirtualLai;
