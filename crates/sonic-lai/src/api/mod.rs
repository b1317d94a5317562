//! Device-control interface.
//!
//! [`LaiApi`] is the seam between the daemon and a vendor line-card library.
//! Implementations must be callable from the reconciliation thread while the
//! notification subsystem holds its own handle, hence `Send + Sync`.

pub mod notification;

pub use notification::{
    LaiAlarmInfo, LaiAlarmSeverity, LaiApsSwitchInfo, LaiNotificationSink, LaiOperStatus,
};

use crate::attr::{LaiAttrId, LaiAttribute};
use crate::error::LaiResult;
use crate::oid;
use crate::types::{LaiObjectId, LaiObjectType};

pub trait LaiApi: Send + Sync {
    /// Creates an object on `linecard_id` and returns its RID.
    ///
    /// For [`LaiObjectType::Linecard`] the line-card argument is ignored and
    /// the returned id is the card itself.
    fn create(
        &self,
        object_type: LaiObjectType,
        linecard_id: LaiObjectId,
        attrs: &[LaiAttribute],
    ) -> LaiResult<LaiObjectId>;

    fn remove(&self, object_type: LaiObjectType, object_id: LaiObjectId) -> LaiResult<()>;

    fn set(
        &self,
        object_type: LaiObjectType,
        object_id: LaiObjectId,
        attr: &LaiAttribute,
    ) -> LaiResult<()>;

    /// Reads the requested attributes, in request order.
    fn get(
        &self,
        object_type: LaiObjectType,
        object_id: LaiObjectId,
        attr_ids: &[LaiAttrId],
    ) -> LaiResult<Vec<LaiAttribute>>;

    fn object_type_query(&self, object_id: LaiObjectId) -> LaiObjectType {
        oid::object_type_query(object_id)
    }

    fn linecard_id_query(&self, object_id: LaiObjectId) -> LaiResult<LaiObjectId> {
        oid::linecard_id_query(object_id)
    }
}
