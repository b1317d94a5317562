//! SONiC OTN syncd - line-card object reconciliation
//!
//! After a restart every object the previous process configured on the line
//! card has to be bound again: the persisted ASIC state is keyed by virtual
//! ids (VIDs) that survive restarts, while the device hands out real ids
//! (RIDs) that may change. A hard reinit replays the persisted state and
//! produces a fresh VID to RID translation.
//!
//! ```text
//! [ASIC_STATE snapshot] ──> [SingleReiniter] ──> [LaiApi] ──> [line card]
//!          │                        │
//!   previous vid/rid maps           ↓
//!                          [TranslationMap]
//! ```
//!
//! # Key Components
//!
//! - [`reiniter::SingleReiniter`]: one reconciliation pass
//! - [`linecard::LaiLinecard`]: the created card and its discovered objects
//! - [`board_mode::BoardModePoller`]: board-mode convergence
//! - [`notifications::NotificationHandler`]: pointer fixup and event queue
//! - [`asic_state`]: persisted state access

pub mod asic_state;
pub mod attr_refs;
pub mod audit;
pub mod board_mode;
pub mod config;
pub mod error;
pub mod linecard;
pub mod notifications;
pub mod reiniter;
pub mod translation;

pub use asic_state::{AsicStateReader, AsicStateSnapshot, PersistedObjectRecord};
pub use board_mode::{BoardModeOutcome, BoardModePoller};
pub use config::SyncdConfig;
pub use error::{Result, SyncdError};
pub use linecard::LaiLinecard;
pub use notifications::{LaiNotification, NotificationHandler};
pub use reiniter::{PostRemoveActions, PostRemoveContext, ReinitResult, ReinitStats, SingleReiniter};
pub use translation::TranslationMap;
