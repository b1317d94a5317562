//! Built-in metadata catalog for the line-card object model.

use super::{AttrFlags, AttrMetadata, AttrValueType, LaiMetadata, ObjectTypeInfo, StructMemberInfo};
use crate::types::{LaiNotificationKind, LaiObjectType};

const M_CO: AttrFlags = AttrFlags::MANDATORY_ON_CREATE.union(AttrFlags::CREATE_ONLY);
const CO: AttrFlags = AttrFlags::CREATE_ONLY;
const CS: AttrFlags = AttrFlags::CREATE_AND_SET;
const RO: AttrFlags = AttrFlags::READ_ONLY;

pub mod linecard_attr {
    use crate::attr::LaiAttrId;

    pub const LINECARD_TYPE: LaiAttrId = 0;
    pub const HARDWARE_INFO: LaiAttrId = 1;
    pub const BOARD_MODE: LaiAttrId = 2;
    pub const START_PRE_CONFIGURATION: LaiAttrId = 3;
    pub const STOP_PRE_CONFIGURATION: LaiAttrId = 4;
    pub const OPER_STATUS: LaiAttrId = 5;
    pub const HOSTNAME: LaiAttrId = 6;
    pub const COLLECT_LINECARD_ALARM: LaiAttrId = 7;
    pub const LINECARD_STATE_CHANGE_NOTIFY: LaiAttrId = 8;
    pub const LINECARD_ALARM_NOTIFY: LaiAttrId = 9;
    pub const APS_SWITCH_INFO_NOTIFY: LaiAttrId = 10;
    pub const PORT_LIST: LaiAttrId = 11;
    pub const MGMT_PORT: LaiAttrId = 12;

    pub const OPER_STATUS_UNKNOWN: i32 = 0;
    pub const OPER_STATUS_ACTIVE: i32 = 1;
    pub const OPER_STATUS_INACTIVE: i32 = 2;
}

pub mod port_attr {
    use crate::attr::LaiAttrId;

    pub const PORT_TYPE: LaiAttrId = 0;
    pub const PORT_ID: LaiAttrId = 1;
    pub const ADMIN_STATE: LaiAttrId = 2;
    pub const OPER_STATUS: LaiAttrId = 3;
    pub const LOS_THRESHOLD: LaiAttrId = 4;
    pub const PEER_PORT: LaiAttrId = 5;

    pub const PORT_TYPE_LINE_IN: i32 = 1;
    pub const PORT_TYPE_LINE_OUT: i32 = 2;
    pub const PORT_TYPE_CLIENT_IN: i32 = 3;
    pub const PORT_TYPE_CLIENT_OUT: i32 = 4;
}

pub mod transceiver_attr {
    use crate::attr::LaiAttrId;

    pub const TRANSCEIVER_ID: LaiAttrId = 0;
    pub const ENABLED: LaiAttrId = 1;
    pub const SERIAL_NO: LaiAttrId = 2;
}

pub mod logical_channel_attr {
    use crate::attr::LaiAttrId;

    pub const CHANNEL_ID: LaiAttrId = 0;
    pub const TRANSCEIVER: LaiAttrId = 1;
    pub const ADMIN_STATE: LaiAttrId = 2;
    pub const DESCRIPTION: LaiAttrId = 3;
}

pub mod otn_attr {
    use crate::attr::LaiAttrId;

    pub const OTN_ID: LaiAttrId = 0;
    pub const LOGICAL_CHANNEL: LaiAttrId = 1;
    pub const TTI_MSG_TRANSMIT: LaiAttrId = 2;
}

pub mod och_attr {
    use crate::attr::LaiAttrId;

    pub const OCH_ID: LaiAttrId = 0;
    pub const FREQUENCY: LaiAttrId = 1;
    pub const TARGET_OUTPUT_POWER: LaiAttrId = 2;
}

pub mod assignment_attr {
    use crate::attr::LaiAttrId;

    pub const ASSIGNMENT_ID: LaiAttrId = 0;
    pub const LOGICAL_CHANNEL: LaiAttrId = 1;
    pub const ASSIGNMENT_TYPE: LaiAttrId = 2;
    pub const ALLOCATION: LaiAttrId = 3;
}

pub mod oa_attr {
    use crate::attr::LaiAttrId;

    pub const OA_ID: LaiAttrId = 0;
    pub const TARGET_GAIN: LaiAttrId = 1;
    pub const WORKING_MODE: LaiAttrId = 2;
    pub const INGRESS_PORT: LaiAttrId = 3;
}

pub mod aps_attr {
    use crate::attr::LaiAttrId;

    pub const APS_ID: LaiAttrId = 0;
    pub const TYPE: LaiAttrId = 1;
    pub const PORT_LIST: LaiAttrId = 2;
    pub const PROTECTION_SETTINGS: LaiAttrId = 3;
}

pub mod aps_port_attr {
    use crate::attr::LaiAttrId;

    pub const PORT_TYPE: LaiAttrId = 0;
    pub const APS: LaiAttrId = 1;
    pub const POWER_LOS_THRESHOLD: LaiAttrId = 2;
}

use LaiObjectType as T;

const ADMIN_STATE_VALUES: &[(&str, i32)] = &[
    ("LAI_ADMIN_STATE_ENABLED", 0),
    ("LAI_ADMIN_STATE_DISABLED", 1),
    ("LAI_ADMIN_STATE_MAINT", 2),
];

const OPER_STATUS_VALUES: &[(&str, i32)] = &[
    ("LAI_OPER_STATUS_UNKNOWN", 0),
    ("LAI_OPER_STATUS_ACTIVE", 1),
    ("LAI_OPER_STATUS_INACTIVE", 2),
];

static LINECARD_ATTRS: [AttrMetadata; 13] = [
    AttrMetadata::new(T::Linecard, linecard_attr::LINECARD_TYPE, "LAI_LINECARD_ATTR_LINECARD_TYPE", AttrValueType::Chardata, M_CO),
    AttrMetadata::new(T::Linecard, linecard_attr::HARDWARE_INFO, "LAI_LINECARD_ATTR_HARDWARE_INFO", AttrValueType::Chardata, CO),
    AttrMetadata::new(T::Linecard, linecard_attr::BOARD_MODE, "LAI_LINECARD_ATTR_BOARD_MODE", AttrValueType::S32, CS)
        .enums(&[
            ("LAI_LINECARD_BOARD_MODE_L1_400G_CA_100GE", 0),
            ("LAI_LINECARD_BOARD_MODE_L1_200G_CA_100GE", 1),
            ("LAI_LINECARD_BOARD_MODE_L1_100G_CA_100GE", 2),
            ("LAI_LINECARD_BOARD_MODE_L1_400G_CA_400GE", 3),
        ]),
    AttrMetadata::new(T::Linecard, linecard_attr::START_PRE_CONFIGURATION, "LAI_LINECARD_ATTR_START_PRE_CONFIGURATION", AttrValueType::Bool, CS),
    AttrMetadata::new(T::Linecard, linecard_attr::STOP_PRE_CONFIGURATION, "LAI_LINECARD_ATTR_STOP_PRE_CONFIGURATION", AttrValueType::Bool, CS),
    AttrMetadata::new(T::Linecard, linecard_attr::OPER_STATUS, "LAI_LINECARD_ATTR_OPER_STATUS", AttrValueType::S32, RO)
        .enums(OPER_STATUS_VALUES),
    AttrMetadata::new(T::Linecard, linecard_attr::HOSTNAME, "LAI_LINECARD_ATTR_HOSTNAME", AttrValueType::Chardata, CS),
    AttrMetadata::new(T::Linecard, linecard_attr::COLLECT_LINECARD_ALARM, "LAI_LINECARD_ATTR_COLLECT_LINECARD_ALARM", AttrValueType::Bool, CS),
    AttrMetadata::new(T::Linecard, linecard_attr::LINECARD_STATE_CHANGE_NOTIFY, "LAI_LINECARD_ATTR_LINECARD_STATE_CHANGE_NOTIFY", AttrValueType::Pointer, CS)
        .notify(LaiNotificationKind::LinecardStateChange),
    AttrMetadata::new(T::Linecard, linecard_attr::LINECARD_ALARM_NOTIFY, "LAI_LINECARD_ATTR_LINECARD_ALARM_NOTIFY", AttrValueType::Pointer, CS)
        .notify(LaiNotificationKind::LinecardAlarm),
    AttrMetadata::new(T::Linecard, linecard_attr::APS_SWITCH_INFO_NOTIFY, "LAI_LINECARD_ATTR_APS_SWITCH_INFO_NOTIFY", AttrValueType::Pointer, CS)
        .notify(LaiNotificationKind::ApsSwitchInfo),
    AttrMetadata::new(T::Linecard, linecard_attr::PORT_LIST, "LAI_LINECARD_ATTR_PORT_LIST", AttrValueType::ObjectList, RO)
        .allowed(&[T::Port]),
    AttrMetadata::new(T::Linecard, linecard_attr::MGMT_PORT, "LAI_LINECARD_ATTR_MGMT_PORT", AttrValueType::ObjectId, CS)
        .allowed(&[T::Port]),
];

static PORT_ATTRS: [AttrMetadata; 6] = [
    AttrMetadata::new(T::Port, port_attr::PORT_TYPE, "LAI_PORT_ATTR_PORT_TYPE", AttrValueType::S32, M_CO)
        .enums(&[
            ("LAI_PORT_TYPE_INVALID", 0),
            ("LAI_PORT_TYPE_LINE_IN", 1),
            ("LAI_PORT_TYPE_LINE_OUT", 2),
            ("LAI_PORT_TYPE_CLIENT_IN", 3),
            ("LAI_PORT_TYPE_CLIENT_OUT", 4),
        ]),
    AttrMetadata::new(T::Port, port_attr::PORT_ID, "LAI_PORT_ATTR_PORT_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Port, port_attr::ADMIN_STATE, "LAI_PORT_ATTR_ADMIN_STATE", AttrValueType::S32, CS)
        .enums(ADMIN_STATE_VALUES),
    AttrMetadata::new(T::Port, port_attr::OPER_STATUS, "LAI_PORT_ATTR_OPER_STATUS", AttrValueType::S32, RO)
        .enums(OPER_STATUS_VALUES),
    AttrMetadata::new(T::Port, port_attr::LOS_THRESHOLD, "LAI_PORT_ATTR_LOS_THRESHOLD", AttrValueType::Double, CS),
    AttrMetadata::new(T::Port, port_attr::PEER_PORT, "LAI_PORT_ATTR_PEER_PORT", AttrValueType::ObjectId, CS)
        .allowed(&[T::Port]),
];

static TRANSCEIVER_ATTRS: [AttrMetadata; 3] = [
    AttrMetadata::new(T::Transceiver, transceiver_attr::TRANSCEIVER_ID, "LAI_TRANSCEIVER_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Transceiver, transceiver_attr::ENABLED, "LAI_TRANSCEIVER_ATTR_ENABLED", AttrValueType::Bool, CS),
    AttrMetadata::new(T::Transceiver, transceiver_attr::SERIAL_NO, "LAI_TRANSCEIVER_ATTR_SERIAL_NO", AttrValueType::Chardata, RO),
];

static LOGICAL_CHANNEL_ATTRS: [AttrMetadata; 4] = [
    AttrMetadata::new(T::LogicalChannel, logical_channel_attr::CHANNEL_ID, "LAI_LOGICALCHANNEL_ATTR_CHANNEL_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::LogicalChannel, logical_channel_attr::TRANSCEIVER, "LAI_LOGICALCHANNEL_ATTR_TRANSCEIVER", AttrValueType::ObjectId, M_CO)
        .allowed(&[T::Transceiver]),
    AttrMetadata::new(T::LogicalChannel, logical_channel_attr::ADMIN_STATE, "LAI_LOGICALCHANNEL_ATTR_ADMIN_STATE", AttrValueType::S32, CS)
        .enums(ADMIN_STATE_VALUES),
    AttrMetadata::new(T::LogicalChannel, logical_channel_attr::DESCRIPTION, "LAI_LOGICALCHANNEL_ATTR_DESCRIPTION", AttrValueType::Chardata, CS),
];

static OTN_ATTRS: [AttrMetadata; 3] = [
    AttrMetadata::new(T::Otn, otn_attr::OTN_ID, "LAI_OTN_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Otn, otn_attr::LOGICAL_CHANNEL, "LAI_OTN_ATTR_LOGICAL_CHANNEL", AttrValueType::ObjectId, M_CO)
        .allowed(&[T::LogicalChannel]),
    AttrMetadata::new(T::Otn, otn_attr::TTI_MSG_TRANSMIT, "LAI_OTN_ATTR_TTI_MSG_TRANSMIT", AttrValueType::Chardata, CS),
];

static OCH_ATTRS: [AttrMetadata; 3] = [
    AttrMetadata::new(T::Och, och_attr::OCH_ID, "LAI_OCH_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Och, och_attr::FREQUENCY, "LAI_OCH_ATTR_FREQUENCY", AttrValueType::U64, CS),
    AttrMetadata::new(T::Och, och_attr::TARGET_OUTPUT_POWER, "LAI_OCH_ATTR_TARGET_OUTPUT_POWER", AttrValueType::Double, CS),
];

static ASSIGNMENT_ATTRS: [AttrMetadata; 4] = [
    AttrMetadata::new(T::Assignment, assignment_attr::ASSIGNMENT_ID, "LAI_ASSIGNMENT_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Assignment, assignment_attr::LOGICAL_CHANNEL, "LAI_ASSIGNMENT_ATTR_LOGICAL_CHANNEL", AttrValueType::ObjectId, M_CO)
        .allowed(&[T::LogicalChannel]),
    AttrMetadata::new(T::Assignment, assignment_attr::ASSIGNMENT_TYPE, "LAI_ASSIGNMENT_ATTR_ASSIGNMENT_TYPE", AttrValueType::S32, CO)
        .enums(&[
            ("LAI_ASSIGNMENT_TYPE_LOGICAL_CHANNEL", 0),
            ("LAI_ASSIGNMENT_TYPE_OPTICAL_CHANNEL", 1),
        ]),
    AttrMetadata::new(T::Assignment, assignment_attr::ALLOCATION, "LAI_ASSIGNMENT_ATTR_ALLOCATION", AttrValueType::Double, CS),
];

static OA_ATTRS: [AttrMetadata; 4] = [
    AttrMetadata::new(T::Oa, oa_attr::OA_ID, "LAI_OA_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Oa, oa_attr::TARGET_GAIN, "LAI_OA_ATTR_TARGET_GAIN", AttrValueType::Double, CS),
    AttrMetadata::new(T::Oa, oa_attr::WORKING_MODE, "LAI_OA_ATTR_WORKING_MODE", AttrValueType::S32, CS)
        .enums(&[
            ("LAI_OA_WORKING_MODE_CONSTANT_POWER", 0),
            ("LAI_OA_WORKING_MODE_CONSTANT_GAIN", 1),
        ]),
    AttrMetadata::new(T::Oa, oa_attr::INGRESS_PORT, "LAI_OA_ATTR_INGRESS_PORT", AttrValueType::ObjectId, CS)
        .allowed(&[T::Port]),
];

static APS_PROTECTION_MEMBERS: [StructMemberInfo; 3] = [
    StructMemberInfo {
        name: "primary",
        value_type: AttrValueType::ObjectId,
        allowed_object_types: &[T::ApsPort],
    },
    StructMemberInfo {
        name: "secondary",
        value_type: AttrValueType::ObjectId,
        allowed_object_types: &[T::ApsPort],
    },
    StructMemberInfo {
        name: "revertive",
        value_type: AttrValueType::Bool,
        allowed_object_types: &[],
    },
];

static APS_ATTRS: [AttrMetadata; 4] = [
    AttrMetadata::new(T::Aps, aps_attr::APS_ID, "LAI_APS_ATTR_ID", AttrValueType::U32, M_CO),
    AttrMetadata::new(T::Aps, aps_attr::TYPE, "LAI_APS_ATTR_TYPE", AttrValueType::S32, M_CO)
        .enums(&[("LAI_APS_TYPE_OLP", 0), ("LAI_APS_TYPE_OMSP", 1)]),
    AttrMetadata::new(T::Aps, aps_attr::PORT_LIST, "LAI_APS_ATTR_PORT_LIST", AttrValueType::ObjectList, CS)
        .allowed(&[T::ApsPort]),
    AttrMetadata::new(T::Aps, aps_attr::PROTECTION_SETTINGS, "LAI_APS_ATTR_PROTECTION_SETTINGS", AttrValueType::Struct, CS)
        .allowed(&[T::ApsPort])
        .members(&APS_PROTECTION_MEMBERS),
];

static APS_PORT_ATTRS: [AttrMetadata; 3] = [
    AttrMetadata::new(T::ApsPort, aps_port_attr::PORT_TYPE, "LAI_APSPORT_ATTR_PORT_TYPE", AttrValueType::S32, M_CO)
        .enums(&[
            ("LAI_APSPORT_PORT_TYPE_LINE_PRIMARY_IN", 0),
            ("LAI_APSPORT_PORT_TYPE_LINE_PRIMARY_OUT", 1),
            ("LAI_APSPORT_PORT_TYPE_LINE_SECONDARY_IN", 2),
            ("LAI_APSPORT_PORT_TYPE_LINE_SECONDARY_OUT", 3),
        ]),
    AttrMetadata::new(T::ApsPort, aps_port_attr::APS, "LAI_APSPORT_ATTR_APS", AttrValueType::ObjectId, CO)
        .allowed(&[T::Aps]),
    AttrMetadata::new(T::ApsPort, aps_port_attr::POWER_LOS_THRESHOLD, "LAI_APSPORT_ATTR_POWER_LOS_THRESHOLD", AttrValueType::Double, CS),
];

macro_rules! id_only_attrs {
    ($static_name:ident, $ty:expr, $name:literal) => {
        static $static_name: [AttrMetadata; 1] =
            [AttrMetadata::new($ty, 0, $name, AttrValueType::U32, M_CO)];
    };
}

id_only_attrs!(ETHERNET_ATTRS, T::Ethernet, "LAI_ETHERNET_ATTR_ID");
id_only_attrs!(PHYSICAL_CHANNEL_ATTRS, T::PhysicalChannel, "LAI_PHYSICALCHANNEL_ATTR_ID");
id_only_attrs!(LLDP_ATTRS, T::Lldp, "LAI_LLDP_ATTR_ID");
id_only_attrs!(INTERFACE_ATTRS, T::Interface, "LAI_INTERFACE_ATTR_ID");
id_only_attrs!(OSC_ATTRS, T::Osc, "LAI_OSC_ATTR_ID");
id_only_attrs!(ATTENUATOR_ATTRS, T::Attenuator, "LAI_ATTENUATOR_ATTR_ID");
id_only_attrs!(WSS_ATTRS, T::Wss, "LAI_WSS_ATTR_ID");
id_only_attrs!(MEDIA_CHANNEL_ATTRS, T::MediaChannel, "LAI_MEDIACHANNEL_ATTR_ID");
id_only_attrs!(OCM_ATTRS, T::Ocm, "LAI_OCM_ATTR_ID");
id_only_attrs!(OTDR_ATTRS, T::Otdr, "LAI_OTDR_ATTR_ID");

const fn info(object_type: LaiObjectType, attributes: &'static [AttrMetadata]) -> ObjectTypeInfo {
    ObjectTypeInfo {
        object_type,
        name: object_type.name(),
        is_non_object_id: false,
        attributes,
    }
}

static OBJECT_TYPE_INFOS: [ObjectTypeInfo; 20] = [
    info(T::Linecard, &LINECARD_ATTRS),
    info(T::Port, &PORT_ATTRS),
    info(T::Transceiver, &TRANSCEIVER_ATTRS),
    info(T::LogicalChannel, &LOGICAL_CHANNEL_ATTRS),
    info(T::Otn, &OTN_ATTRS),
    info(T::Ethernet, &ETHERNET_ATTRS),
    info(T::PhysicalChannel, &PHYSICAL_CHANNEL_ATTRS),
    info(T::Och, &OCH_ATTRS),
    info(T::Lldp, &LLDP_ATTRS),
    info(T::Assignment, &ASSIGNMENT_ATTRS),
    info(T::Interface, &INTERFACE_ATTRS),
    info(T::Oa, &OA_ATTRS),
    info(T::Osc, &OSC_ATTRS),
    info(T::Aps, &APS_ATTRS),
    info(T::ApsPort, &APS_PORT_ATTRS),
    info(T::Attenuator, &ATTENUATOR_ATTRS),
    info(T::Wss, &WSS_ATTRS),
    info(T::MediaChannel, &MEDIA_CHANNEL_ATTRS),
    info(T::Ocm, &OCM_ATTRS),
    info(T::Otdr, &OTDR_ATTRS),
];

/// The compiled-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLaiMetadata;

impl LaiMetadata for StaticLaiMetadata {
    fn object_type_info(&self, object_type: LaiObjectType) -> Option<&ObjectTypeInfo> {
        OBJECT_TYPE_INFOS
            .iter()
            .find(|info| info.object_type == object_type)
    }

    fn attr_metadata_by_name(&self, name: &str) -> Option<&AttrMetadata> {
        OBJECT_TYPE_INFOS
            .iter()
            .flat_map(|info| info.attributes.iter())
            .find(|meta| meta.name == name)
    }
}
