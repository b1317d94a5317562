//! Line-card notification plumbing.
//!
//! Persisted pointer attributes carry whatever address the previous process
//! installed. Before an attribute list reaches the device those values are
//! replaced by handles naming the local handler for the attribute's
//! notification kind. The same handler receives the notifications and queues
//! them for the delivery thread.

use std::collections::VecDeque;

use parking_lot::Mutex;
use sonic_lai::api::{LaiAlarmInfo, LaiApsSwitchInfo, LaiNotificationSink, LaiOperStatus};
use sonic_lai::{
    AttrValueType, LaiAttribute, LaiAttributeValue, LaiMetadata, LaiObjectId, LaiObjectType,
    LaiPointer,
};

use crate::attr_refs::attr_metadata_for;
use crate::error::{Result, SyncdError};
use crate::debug_log;

#[derive(Debug, Clone, PartialEq)]
pub enum LaiNotification {
    LinecardStateChange {
        linecard_id: LaiObjectId,
        status: LaiOperStatus,
    },
    LinecardAlarm {
        linecard_id: LaiObjectId,
        alarm: LaiAlarmInfo,
    },
    ApsSwitchInfo {
        linecard_id: LaiObjectId,
        info: LaiApsSwitchInfo,
    },
}

#[derive(Debug, Default)]
pub struct NotificationHandler {
    queue: Mutex<VecDeque<LaiNotification>>,
}

impl NotificationHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites persisted notification pointers to local handler handles.
    ///
    /// Null pointers are kept; a non-null pointer whose attribute names no
    /// notification kind is an error.
    pub fn update_notifications_pointers(
        &self,
        metadata: &dyn LaiMetadata,
        object_type: LaiObjectType,
        attrs: &mut [LaiAttribute],
    ) -> Result<()> {
        for attr in attrs.iter_mut() {
            let meta = attr_metadata_for(metadata, object_type, attr)?;
            if meta.value_type != AttrValueType::Pointer {
                continue;
            }

            let LaiAttributeValue::Pointer(pointer) = &mut attr.value else {
                continue;
            };

            if matches!(pointer, LaiPointer::Raw(_)) {
                let kind = meta
                    .notification
                    .ok_or(SyncdError::UnknownNotificationPointer { attr: meta.name })?;
                debug_log!("NotificationHandler", attr = meta.name, %kind, "pointer fixed up");
                *pointer = LaiPointer::Handler(kind);
            }
        }
        Ok(())
    }

    fn enqueue(&self, notification: LaiNotification) {
        self.queue.lock().push_back(notification);
    }

    pub fn pop(&self) -> Option<LaiNotification> {
        self.queue.lock().pop_front()
    }

    pub fn drain(&self) -> Vec<LaiNotification> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl LaiNotificationSink for NotificationHandler {
    fn on_linecard_state_change(&self, linecard_id: LaiObjectId, status: LaiOperStatus) {
        self.enqueue(LaiNotification::LinecardStateChange {
            linecard_id,
            status,
        });
    }

    fn on_linecard_alarm(&self, linecard_id: LaiObjectId, alarm: LaiAlarmInfo) {
        self.enqueue(LaiNotification::LinecardAlarm { linecard_id, alarm });
    }

    fn on_aps_switch_info(&self, linecard_id: LaiObjectId, info: LaiApsSwitchInfo) {
        self.enqueue(LaiNotification::ApsSwitchInfo { linecard_id, info });
    }
}
