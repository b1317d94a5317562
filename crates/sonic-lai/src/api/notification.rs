//! Notifications a line card reports asynchronously.

use crate::types::LaiObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaiOperStatus {
    Unknown,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LaiAlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaiAlarmInfo {
    pub resource_id: LaiObjectId,
    pub severity: LaiAlarmSeverity,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaiApsSwitchInfo {
    pub aps_id: LaiObjectId,
    /// APS port now carrying traffic.
    pub active_port: LaiObjectId,
}

/// Receiver for line-card notifications.
///
/// A device invokes these once the matching pointer attribute has been
/// installed on the line card.
pub trait LaiNotificationSink: Send + Sync {
    fn on_linecard_state_change(&self, linecard_id: LaiObjectId, status: LaiOperStatus);

    fn on_linecard_alarm(&self, linecard_id: LaiObjectId, alarm: LaiAlarmInfo);

    fn on_aps_switch_info(&self, linecard_id: LaiObjectId, info: LaiApsSwitchInfo);
}
