//! In-memory line-card device.
//!
//! `VirtualLai` implements [`LaiApi`] against a table of objects, minting
//! real ids through [`RealObjectIdManager`]. Creating a card populates its
//! default ports, which later show up in `LAI_LINECARD_ATTR_PORT_LIST` the
//! way factory objects do on hardware.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};
use parking_lot::Mutex;
use sonic_lai::api::{LaiAlarmInfo, LaiApsSwitchInfo, LaiNotificationSink, LaiOperStatus};
use sonic_lai::metadata::{linecard_attr, port_attr, AttrMetadata, AttrValueType};
use sonic_lai::{
    LaiApi, LaiAttrId, LaiAttribute, LaiAttributeValue, LaiError, LaiMetadata,
    LaiNotificationKind, LaiObjectId, LaiObjectType, LaiPointer, LaiResult, LaiStatus,
};

use crate::error::OidManagerError;
use crate::linecard_config::LinecardConfigContainer;
use crate::oid_manager::RealObjectIdManager;

#[derive(Debug, Clone)]
struct VsObject {
    object_type: LaiObjectType,
    linecard_id: LaiObjectId,
    attrs: BTreeMap<LaiAttrId, LaiAttributeValue>,
}

/// A board-mode change the card has accepted but not finished applying.
#[derive(Debug, Clone, Copy)]
struct PendingBoardMode {
    target: i32,
    reads_left: u32,
}

#[derive(Debug)]
struct VsState {
    oid_manager: RealObjectIdManager,
    objects: BTreeMap<LaiObjectId, VsObject>,
    pending_board_modes: HashMap<LaiObjectId, PendingBoardMode>,
}

/// Action to run against the notification sink once the state lock is gone.
enum Deferred {
    None,
    StateChange(LaiObjectId, LaiOperStatus),
}

pub struct VirtualLai {
    metadata: Arc<dyn LaiMetadata>,
    configs: Arc<LinecardConfigContainer>,
    state: Mutex<VsState>,
    sink: Option<Arc<dyn LaiNotificationSink>>,
    board_mode_settle_reads: u32,
}

impl VirtualLai {
    pub fn new(
        global_context: u32,
        configs: Arc<LinecardConfigContainer>,
        metadata: Arc<dyn LaiMetadata>,
    ) -> Result<Self, OidManagerError> {
        let oid_manager = RealObjectIdManager::new(global_context, configs.clone())?;

        Ok(Self {
            metadata,
            configs,
            state: Mutex::new(VsState {
                oid_manager,
                objects: BTreeMap::new(),
                pending_board_modes: HashMap::new(),
            }),
            sink: None,
            board_mode_settle_reads: 0,
        })
    }

    pub fn with_notification_sink(mut self, sink: Arc<dyn LaiNotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Number of board-mode reads before a requested mode takes effect.
    pub fn with_board_mode_settle_reads(mut self, reads: u32) -> Self {
        self.board_mode_settle_reads = reads;
        self
    }

    /// Ids of every object of `object_type`, in id order.
    pub fn object_ids(&self, object_type: LaiObjectType) -> Vec<LaiObjectId> {
        self.state
            .lock()
            .objects
            .iter()
            .filter(|(_, obj)| obj.object_type == object_type)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn object_exists(&self, object_id: LaiObjectId) -> bool {
        self.state.lock().objects.contains_key(&object_id)
    }

    /// Raises an alarm on a card if its alarm callback is installed.
    pub fn raise_alarm(&self, linecard_id: LaiObjectId, alarm: LaiAlarmInfo) -> LaiResult<()> {
        if self.callback_installed(linecard_id, linecard_attr::LINECARD_ALARM_NOTIFY)? {
            if let Some(sink) = &self.sink {
                sink.on_linecard_alarm(linecard_id, alarm);
            }
        }
        Ok(())
    }

    /// Reports an APS switchover if the card's APS callback is installed.
    pub fn switch_aps(&self, linecard_id: LaiObjectId, info: LaiApsSwitchInfo) -> LaiResult<()> {
        if self.callback_installed(linecard_id, linecard_attr::APS_SWITCH_INFO_NOTIFY)? {
            if let Some(sink) = &self.sink {
                sink.on_aps_switch_info(linecard_id, info);
            }
        }
        Ok(())
    }

    fn callback_installed(&self, linecard_id: LaiObjectId, attr_id: LaiAttrId) -> LaiResult<bool> {
        let state = self.state.lock();
        let obj = lookup(&state, LaiObjectType::Linecard, linecard_id)?;
        Ok(matches!(
            obj.attrs.get(&attr_id),
            Some(LaiAttributeValue::Pointer(LaiPointer::Handler(_)))
        ))
    }

    fn attr_meta(&self, object_type: LaiObjectType, id: LaiAttrId) -> LaiResult<&AttrMetadata> {
        self.metadata.attr_metadata(object_type, id).ok_or(LaiError::Status {
            status: LaiStatus::InvalidAttribute,
        })
    }

    /// Checks value shape and that every referenced object exists.
    fn validate_value(
        &self,
        state: &VsState,
        meta: &AttrMetadata,
        value: &LaiAttributeValue,
    ) -> LaiResult<()> {
        if !value_matches(meta.value_type, value) {
            return Err(LaiError::invalid_parameter(format!(
                "{} expects {:?}",
                meta.name, meta.value_type
            )));
        }

        if let LaiAttributeValue::Pointer(LaiPointer::Raw(addr)) = value {
            return Err(LaiError::invalid_parameter(format!(
                "{} carries unresolved pointer 0x{:x}",
                meta.name, addr
            )));
        }

        for id in referenced_ids(value) {
            if !id.is_null() && !state.objects.contains_key(&id) {
                return Err(LaiError::InvalidObjectId { id });
            }
        }
        Ok(())
    }

    fn validate_create_attrs(
        &self,
        state: &VsState,
        object_type: LaiObjectType,
        attrs: &[LaiAttribute],
    ) -> LaiResult<()> {
        for attr in attrs {
            let meta = self.attr_meta(object_type, attr.id)?;
            if meta.is_read_only() {
                return Err(LaiError::Status {
                    status: LaiStatus::InvalidAttribute,
                });
            }
            self.validate_value(state, meta, &attr.value)?;
        }

        for meta in self.metadata.attributes(object_type) {
            if meta.is_mandatory_on_create() && !attrs.iter().any(|a| a.id == meta.id) {
                return Err(LaiError::MandatoryAttributeMissing {
                    attr: meta.name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn create_linecard(&self, state: &mut VsState, attrs: &[LaiAttribute]) -> LaiResult<LaiObjectId> {
        let hardware_info = attrs
            .iter()
            .find(|a| a.id == linecard_attr::HARDWARE_INFO)
            .and_then(|a| a.value.as_str())
            .unwrap_or_default()
            .to_string();

        let linecard_id = state
            .oid_manager
            .allocate_new_linecard_object_id(&hardware_info)?;
        if linecard_id.is_null() {
            return Err(LaiError::not_found(format!(
                "linecard config for hardware info '{}'",
                hardware_info
            )));
        }

        if let Some(existing) = state.objects.get_mut(&linecard_id) {
            info!("connected to existing linecard {}", linecard_id);
            for attr in attrs {
                existing.attrs.insert(attr.id, attr.value.clone());
            }
            return Ok(linecard_id);
        }

        let config = self
            .configs
            .get_config(&hardware_info)
            .cloned()
            .ok_or_else(|| LaiError::not_found(hardware_info.clone()))?;

        let mut card = VsObject {
            object_type: LaiObjectType::Linecard,
            linecard_id,
            attrs: attrs.iter().map(|a| (a.id, a.value.clone())).collect(),
        };
        card.attrs.insert(
            linecard_attr::BOARD_MODE,
            LaiAttributeValue::S32(config.board_mode),
        );
        card.attrs.insert(
            linecard_attr::OPER_STATUS,
            LaiAttributeValue::S32(linecard_attr::OPER_STATUS_ACTIVE),
        );
        state.objects.insert(linecard_id, card);

        for index in 0..config.default_ports {
            let port_id = state
                .oid_manager
                .allocate_new_object_id(LaiObjectType::Port, linecard_id)?;
            let port_type = if index % 2 == 0 {
                port_attr::PORT_TYPE_LINE_IN
            } else {
                port_attr::PORT_TYPE_LINE_OUT
            };
            let port = VsObject {
                object_type: LaiObjectType::Port,
                linecard_id,
                attrs: BTreeMap::from([
                    (port_attr::PORT_TYPE, LaiAttributeValue::S32(port_type)),
                    (port_attr::PORT_ID, LaiAttributeValue::U32(index + 1)),
                    (port_attr::ADMIN_STATE, LaiAttributeValue::S32(0)),
                    (
                        port_attr::OPER_STATUS,
                        LaiAttributeValue::S32(linecard_attr::OPER_STATUS_ACTIVE),
                    ),
                ]),
            };
            state.objects.insert(port_id, port);
        }

        info!(
            "created linecard {} with {} default ports",
            linecard_id, config.default_ports
        );
        Ok(linecard_id)
    }

    fn read_board_mode(&self, state: &mut VsState, object_id: LaiObjectId) -> Option<LaiAttributeValue> {
        if let Some(pending) = state.pending_board_modes.get_mut(&object_id) {
            if pending.reads_left == 0 {
                let target = pending.target;
                state.pending_board_modes.remove(&object_id);
                if let Some(card) = state.objects.get_mut(&object_id) {
                    card.attrs
                        .insert(linecard_attr::BOARD_MODE, LaiAttributeValue::S32(target));
                }
            } else {
                pending.reads_left -= 1;
            }
        }

        state
            .objects
            .get(&object_id)
            .and_then(|card| card.attrs.get(&linecard_attr::BOARD_MODE).cloned())
    }
}

impl LaiApi for VirtualLai {
    fn create(
        &self,
        object_type: LaiObjectType,
        linecard_id: LaiObjectId,
        attrs: &[LaiAttribute],
    ) -> LaiResult<LaiObjectId> {
        if !self.metadata.is_object_type_valid(object_type) {
            return Err(LaiError::InvalidObjectType {
                value: i64::from(object_type.as_raw()),
            });
        }

        let mut state = self.state.lock();
        self.validate_create_attrs(&state, object_type, attrs)?;

        if object_type == LaiObjectType::Linecard {
            return self.create_linecard(&mut state, attrs);
        }

        lookup(&state, LaiObjectType::Linecard, linecard_id)?;

        let object_id = state
            .oid_manager
            .allocate_new_object_id(object_type, linecard_id)?;
        state.objects.insert(
            object_id,
            VsObject {
                object_type,
                linecard_id,
                attrs: attrs.iter().map(|a| (a.id, a.value.clone())).collect(),
            },
        );

        debug!(%object_type, rid = %object_id, "created");
        Ok(object_id)
    }

    fn remove(&self, object_type: LaiObjectType, object_id: LaiObjectId) -> LaiResult<()> {
        let mut state = self.state.lock();
        lookup(&state, object_type, object_id)?;

        if object_type == LaiObjectType::Linecard {
            state.objects.retain(|_, obj| obj.linecard_id != object_id);
            state.pending_board_modes.remove(&object_id);
            state.oid_manager.release_object_id(object_id)?;
        } else {
            state.objects.remove(&object_id);
        }

        debug!(%object_type, rid = %object_id, "removed");
        Ok(())
    }

    fn set(
        &self,
        object_type: LaiObjectType,
        object_id: LaiObjectId,
        attr: &LaiAttribute,
    ) -> LaiResult<()> {
        let meta = self.attr_meta(object_type, attr.id)?;
        if meta.is_read_only() || meta.is_create_only() {
            warn!("{} can't be set on {}", meta.name, object_id);
            return Err(LaiError::Status {
                status: LaiStatus::InvalidAttribute,
            });
        }

        let deferred = {
            let mut state = self.state.lock();
            lookup(&state, object_type, object_id)?;
            self.validate_value(&state, meta, &attr.value)?;

            if object_type == LaiObjectType::Linecard && attr.id == linecard_attr::BOARD_MODE {
                if let LaiAttributeValue::S32(target) = attr.value {
                    state.pending_board_modes.insert(
                        object_id,
                        PendingBoardMode {
                            target,
                            reads_left: self.board_mode_settle_reads,
                        },
                    );
                }
                return Ok(());
            }

            let status = state
                .objects
                .get(&object_id)
                .and_then(|obj| obj.attrs.get(&linecard_attr::OPER_STATUS))
                .and_then(LaiAttributeValue::as_s32);

            if let Some(obj) = state.objects.get_mut(&object_id) {
                obj.attrs.insert(attr.id, attr.value.clone());
            }

            match (meta.notification, &attr.value) {
                (
                    Some(LaiNotificationKind::LinecardStateChange),
                    LaiAttributeValue::Pointer(LaiPointer::Handler(_)),
                ) => {
                    let status = match status {
                        Some(linecard_attr::OPER_STATUS_ACTIVE) => LaiOperStatus::Active,
                        Some(linecard_attr::OPER_STATUS_INACTIVE) => LaiOperStatus::Inactive,
                        _ => LaiOperStatus::Unknown,
                    };
                    Deferred::StateChange(object_id, status)
                }
                _ => Deferred::None,
            }
        };

        if let (Deferred::StateChange(id, status), Some(sink)) = (deferred, &self.sink) {
            sink.on_linecard_state_change(id, status);
        }
        Ok(())
    }

    fn get(
        &self,
        object_type: LaiObjectType,
        object_id: LaiObjectId,
        attr_ids: &[LaiAttrId],
    ) -> LaiResult<Vec<LaiAttribute>> {
        let mut state = self.state.lock();
        lookup(&state, object_type, object_id)?;

        let mut result = Vec::with_capacity(attr_ids.len());
        for &id in attr_ids {
            let meta = self.attr_meta(object_type, id)?;

            let value = if object_type == LaiObjectType::Linecard && id == linecard_attr::PORT_LIST {
                Some(LaiAttributeValue::ObjList(
                    state
                        .objects
                        .iter()
                        .filter(|(_, obj)| {
                            obj.object_type == LaiObjectType::Port && obj.linecard_id == object_id
                        })
                        .map(|(port_id, _)| *port_id)
                        .collect(),
                ))
            } else if object_type == LaiObjectType::Linecard && id == linecard_attr::BOARD_MODE {
                self.read_board_mode(&mut state, object_id)
            } else {
                state
                    .objects
                    .get(&object_id)
                    .and_then(|obj| obj.attrs.get(&id).cloned())
            };

            let value = value.ok_or_else(|| LaiError::not_found(meta.name))?;
            result.push(LaiAttribute::new(id, value));
        }
        Ok(result)
    }
}

fn lookup<'a>(
    state: &'a VsState,
    object_type: LaiObjectType,
    object_id: LaiObjectId,
) -> LaiResult<&'a VsObject> {
    match state.objects.get(&object_id) {
        Some(obj) if obj.object_type == object_type => Ok(obj),
        Some(_) => Err(LaiError::InvalidObjectId { id: object_id }),
        None => Err(LaiError::not_found(object_id.to_string())),
    }
}

fn value_matches(value_type: AttrValueType, value: &LaiAttributeValue) -> bool {
    matches!(
        (value_type, value),
        (AttrValueType::Bool, LaiAttributeValue::Bool(_))
            | (AttrValueType::U8, LaiAttributeValue::U8(_))
            | (AttrValueType::U16, LaiAttributeValue::U16(_))
            | (AttrValueType::U32, LaiAttributeValue::U32(_))
            | (AttrValueType::U64, LaiAttributeValue::U64(_))
            | (AttrValueType::S32, LaiAttributeValue::S32(_))
            | (AttrValueType::Double, LaiAttributeValue::Double(_))
            | (AttrValueType::Chardata, LaiAttributeValue::Chardata(_))
            | (AttrValueType::ObjectId, LaiAttributeValue::Oid(_))
            | (AttrValueType::ObjectList, LaiAttributeValue::ObjList(_))
            | (AttrValueType::U32List, LaiAttributeValue::U32List(_))
            | (AttrValueType::Pointer, LaiAttributeValue::Pointer(_))
            | (AttrValueType::Struct, LaiAttributeValue::Struct(_))
    )
}

fn referenced_ids(value: &LaiAttributeValue) -> Vec<LaiObjectId> {
    match value {
        LaiAttributeValue::Oid(id) => vec![*id],
        LaiAttributeValue::ObjList(list) => list.clone(),
        LaiAttributeValue::Struct(members) => members
            .iter()
            .flat_map(|(_, v)| referenced_ids(v))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linecard_config::LinecardConfig;
    use sonic_lai::metadata::{logical_channel_attr, transceiver_attr};
    use sonic_lai::oid;
    use sonic_lai::StaticLaiMetadata;

    fn vs() -> VirtualLai {
        let mut config = LinecardConfig::new("P230C", 1);
        config.default_ports = 4;
        config.board_mode = 1;
        let configs: LinecardConfigContainer = [config].into_iter().collect();
        VirtualLai::new(0, Arc::new(configs), Arc::new(StaticLaiMetadata)).unwrap()
    }

    fn linecard_attrs() -> Vec<LaiAttribute> {
        vec![
            LaiAttribute::new(
                linecard_attr::LINECARD_TYPE,
                LaiAttributeValue::Chardata("P230C".into()),
            ),
            LaiAttribute::new(
                linecard_attr::HARDWARE_INFO,
                LaiAttributeValue::Chardata("P230C".into()),
            ),
        ]
    }

    #[test]
    fn test_create_linecard_populates_ports() {
        let vs = vs();
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        assert_eq!(oid::decode_linecard_index(lc), 1);

        let attrs = vs
            .get(LaiObjectType::Linecard, lc, &[linecard_attr::PORT_LIST])
            .unwrap();
        let ports = attrs[0].value.as_objlist().unwrap().to_vec();
        assert_eq!(ports.len(), 4);
        assert_eq!(vs.object_ids(LaiObjectType::Port), ports);
        assert_eq!(oid::linecard_id_query(ports[0]).unwrap(), lc);
    }

    #[test]
    fn test_linecard_reconnect_returns_same_id() {
        let vs = vs();
        let first = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        let second = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(vs.object_ids(LaiObjectType::Port).len(), 4);
    }

    #[test]
    fn test_unknown_hardware_fails() {
        let vs = vs();
        let attrs = vec![
            LaiAttribute::new(
                linecard_attr::LINECARD_TYPE,
                LaiAttributeValue::Chardata("X".into()),
            ),
            LaiAttribute::new(
                linecard_attr::HARDWARE_INFO,
                LaiAttributeValue::Chardata("X".into()),
            ),
        ];
        assert!(matches!(
            vs.create(LaiObjectType::Linecard, LaiObjectId::NULL, &attrs),
            Err(LaiError::NotFound { .. })
        ));
    }

    #[test]
    fn test_mandatory_attribute_missing() {
        let vs = vs();
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        let err = vs.create(LaiObjectType::Transceiver, lc, &[]).unwrap_err();
        assert_eq!(err.status(), LaiStatus::MandatoryAttributeMissing);
    }

    #[test]
    fn test_references_must_exist() {
        let vs = vs();
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        let attrs = vec![
            LaiAttribute::new(logical_channel_attr::CHANNEL_ID, LaiAttributeValue::U32(1)),
            LaiAttribute::new(
                logical_channel_attr::TRANSCEIVER,
                LaiAttributeValue::Oid(LaiObjectId::from_raw(0xdead)),
            ),
        ];
        assert!(matches!(
            vs.create(LaiObjectType::LogicalChannel, lc, &attrs),
            Err(LaiError::InvalidObjectId { .. })
        ));

        let trx = vs
            .create(
                LaiObjectType::Transceiver,
                lc,
                &[LaiAttribute::new(
                    transceiver_attr::TRANSCEIVER_ID,
                    LaiAttributeValue::U32(1),
                )],
            )
            .unwrap();
        let attrs = vec![
            LaiAttribute::new(logical_channel_attr::CHANNEL_ID, LaiAttributeValue::U32(1)),
            LaiAttribute::new(logical_channel_attr::TRANSCEIVER, LaiAttributeValue::Oid(trx)),
        ];
        assert!(vs.create(LaiObjectType::LogicalChannel, lc, &attrs).is_ok());
    }

    #[test]
    fn test_set_rejects_create_only_and_raw_pointers() {
        let vs = vs();
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();

        let err = vs
            .set(
                LaiObjectType::Linecard,
                lc,
                &LaiAttribute::new(
                    linecard_attr::LINECARD_TYPE,
                    LaiAttributeValue::Chardata("other".into()),
                ),
            )
            .unwrap_err();
        assert_eq!(err.status(), LaiStatus::InvalidAttribute);

        let err = vs
            .set(
                LaiObjectType::Linecard,
                lc,
                &LaiAttribute::new(
                    linecard_attr::LINECARD_ALARM_NOTIFY,
                    LaiAttributeValue::Pointer(LaiPointer::Raw(0x1234)),
                ),
            )
            .unwrap_err();
        assert_eq!(err.status(), LaiStatus::InvalidParameter);
    }

    #[test]
    fn test_board_mode_settles_after_reads() {
        let vs = vs().with_board_mode_settle_reads(2);
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        let read = |vs: &VirtualLai| {
            vs.get(LaiObjectType::Linecard, lc, &[linecard_attr::BOARD_MODE])
                .unwrap()[0]
                .value
                .as_s32()
        };

        assert_eq!(read(&vs), Some(1));
        vs.set(
            LaiObjectType::Linecard,
            lc,
            &LaiAttribute::new(linecard_attr::BOARD_MODE, LaiAttributeValue::S32(3)),
        )
        .unwrap();
        assert_eq!(read(&vs), Some(1));
        assert_eq!(read(&vs), Some(1));
        assert_eq!(read(&vs), Some(3));
    }

    #[test]
    fn test_remove_linecard_releases_slot() {
        let vs = vs();
        let lc = vs
            .create(LaiObjectType::Linecard, LaiObjectId::NULL, &linecard_attrs())
            .unwrap();
        vs.remove(LaiObjectType::Linecard, lc).unwrap();
        assert!(!vs.object_exists(lc));
        assert!(vs.object_ids(LaiObjectType::Port).is_empty());
        assert!(vs.remove(LaiObjectType::Linecard, lc).is_err());
    }
}
