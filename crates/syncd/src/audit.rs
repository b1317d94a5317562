//! Audit and structured logging for syncd.
//!
//! Operational events go through the `*_log!` macros, which stamp a
//! `source` field on every `tracing` event. Hard reinit milestones, line
//! card operations and fatal errors are additionally recorded as an
//! [`AuditRecord`] under the `audit` target, serialized as JSON.
//!
//! | Outcome      | Level |
//! |--------------|-------|
//! | `Success`    | info  |
//! | `InProgress` | debug |
//! | `Failure`    | warn  |

use chrono::{DateTime, Utc};
use serde::Serialize;
use sonic_lai::{LaiObjectId, LaiObjectType};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    /// Pass started or finished
    HardReinit,
    /// Object created on the line card
    ResourceCreate,
    /// Line card set outside the replayed state (pre-configuration bracket)
    LaiOperation,
    /// Fatal error aborting a pass
    ErrorCondition,
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditCategory::HardReinit => "HARD_REINIT",
            AuditCategory::ResourceCreate => "RESOURCE_CREATE",
            AuditCategory::LaiOperation => "LAI_OPERATION",
            AuditCategory::ErrorCondition => "ERROR_CONDITION",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    InProgress,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
            AuditOutcome::InProgress => "in_progress",
        };
        f.write_str(name)
    }
}

/// One audited reinit event.
///
/// The outcome starts as `InProgress`. Object ids serialize as `oid:0x...`
/// and the object type as its `LAI_OBJECT_TYPE_*` name.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub category: AuditCategory,
    pub action: String,
    pub outcome: AuditOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vid: Option<LaiObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rid: Option<LaiObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Groups the records of one pass.
    pub correlation_id: String,
}

impl AuditRecord {
    pub fn new(
        category: AuditCategory,
        action: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            action: action.into(),
            outcome: AuditOutcome::InProgress,
            vid: None,
            rid: None,
            object_type: None,
            details: None,
            error: None,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Object the event concerns, with either id left out when not yet known.
    pub fn with_object(
        mut self,
        object_type: LaiObjectType,
        vid: Option<LaiObjectId>,
        rid: Option<LaiObjectId>,
    ) -> Self {
        self.object_type = Some(object_type.name());
        self.vid = vid;
        self.rid = rid;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Records the error and marks the outcome as `Failure`.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.outcome = AuditOutcome::Failure;
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization_failed","message":"{}"}}"#, e))
    }
}

/// Debug-level event tagged with its source component.
///
/// ```ignore
/// debug_log!("LaiLinecard", rid = %rid, "discovered object");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::debug!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! info_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::info!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::warn!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! error_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::error!(source = $source, $($arg)*)
    };
}

/// Emits an [`AuditRecord`] under the `audit` target at the level its
/// outcome maps to.
#[macro_export]
macro_rules! audit_log {
    ($record:expr) => {{
        let record = $record;
        let json = record.to_json();
        match record.outcome {
            $crate::audit::AuditOutcome::Success => tracing::info!(
                target: "audit",
                category = %record.category,
                action = %record.action,
                audit_json = %json,
                "AUDIT: {} - {} - {}", record.category, record.action, record.outcome
            ),
            $crate::audit::AuditOutcome::InProgress => tracing::debug!(
                target: "audit",
                category = %record.category,
                action = %record.action,
                audit_json = %json,
                "AUDIT: {} - {} - {}", record.category, record.action, record.outcome
            ),
            $crate::audit::AuditOutcome::Failure => tracing::warn!(
                target: "audit",
                category = %record.category,
                action = %record.action,
                error = record.error.as_deref().unwrap_or(""),
                audit_json = %json,
                "AUDIT: {} - {} - {}", record.category, record.action, record.outcome
            ),
        }
    }};
}

/// Installs the global subscriber with JSON output.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json(),
        )
        .init();
}

/// Installs the global subscriber with human-readable output.
pub fn init_logging_pretty(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_file(true).with_line_number(true).pretty())
        .init();
}
