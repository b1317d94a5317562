//! Core LAI types: object types and object identifiers.
//!
//! Unlike the switch SAI, line-card objects are addressed by an untyped
//! 64-bit handle whose type tag lives inside the value itself (see
//! [`crate::oid`]), so [`LaiObjectId`] is a plain newtype and classification
//! happens by decoding rather than through the type system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LaiError;

/// Raw LAI object ID type (matches lai_object_id_t in C).
pub type RawLaiObjectId = u64;

/// LAI object types matching `lai_object_type_t`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LaiObjectType {
    Null = 0,
    Linecard = 1,
    Port = 2,
    Transceiver = 3,
    LogicalChannel = 4,
    Otn = 5,
    Ethernet = 6,
    PhysicalChannel = 7,
    Och = 8,
    Lldp = 9,
    Assignment = 10,
    Interface = 11,
    Oa = 12,
    Osc = 13,
    Aps = 14,
    ApsPort = 15,
    Attenuator = 16,
    Wss = 17,
    MediaChannel = 18,
    Ocm = 19,
    Otdr = 20,
}

impl LaiObjectType {
    /// One past the largest object type value (`LAI_OBJECT_TYPE_EXTENSIONS_MAX`).
    pub const EXTENSIONS_MAX: i32 = 21;

    /// Every non-null object type in numeric order.
    pub const ALL: [LaiObjectType; 20] = [
        LaiObjectType::Linecard,
        LaiObjectType::Port,
        LaiObjectType::Transceiver,
        LaiObjectType::LogicalChannel,
        LaiObjectType::Otn,
        LaiObjectType::Ethernet,
        LaiObjectType::PhysicalChannel,
        LaiObjectType::Och,
        LaiObjectType::Lldp,
        LaiObjectType::Assignment,
        LaiObjectType::Interface,
        LaiObjectType::Oa,
        LaiObjectType::Osc,
        LaiObjectType::Aps,
        LaiObjectType::ApsPort,
        LaiObjectType::Attenuator,
        LaiObjectType::Wss,
        LaiObjectType::MediaChannel,
        LaiObjectType::Ocm,
        LaiObjectType::Otdr,
    ];

    /// Converts a raw value; `None` when outside `[NULL, EXTENSIONS_MAX)`.
    pub fn from_raw(value: i32) -> Option<Self> {
        if value == 0 {
            return Some(LaiObjectType::Null);
        }
        Self::ALL.iter().copied().find(|t| t.as_raw() == value)
    }

    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// True for every type except NULL.
    pub fn is_valid(self) -> bool {
        self != LaiObjectType::Null
    }

    pub const fn name(self) -> &'static str {
        match self {
            LaiObjectType::Null => "LAI_OBJECT_TYPE_NULL",
            LaiObjectType::Linecard => "LAI_OBJECT_TYPE_LINECARD",
            LaiObjectType::Port => "LAI_OBJECT_TYPE_PORT",
            LaiObjectType::Transceiver => "LAI_OBJECT_TYPE_TRANSCEIVER",
            LaiObjectType::LogicalChannel => "LAI_OBJECT_TYPE_LOGICALCHANNEL",
            LaiObjectType::Otn => "LAI_OBJECT_TYPE_OTN",
            LaiObjectType::Ethernet => "LAI_OBJECT_TYPE_ETHERNET",
            LaiObjectType::PhysicalChannel => "LAI_OBJECT_TYPE_PHYSICALCHANNEL",
            LaiObjectType::Och => "LAI_OBJECT_TYPE_OCH",
            LaiObjectType::Lldp => "LAI_OBJECT_TYPE_LLDP",
            LaiObjectType::Assignment => "LAI_OBJECT_TYPE_ASSIGNMENT",
            LaiObjectType::Interface => "LAI_OBJECT_TYPE_INTERFACE",
            LaiObjectType::Oa => "LAI_OBJECT_TYPE_OA",
            LaiObjectType::Osc => "LAI_OBJECT_TYPE_OSC",
            LaiObjectType::Aps => "LAI_OBJECT_TYPE_APS",
            LaiObjectType::ApsPort => "LAI_OBJECT_TYPE_APSPORT",
            LaiObjectType::Attenuator => "LAI_OBJECT_TYPE_ATTENUATOR",
            LaiObjectType::Wss => "LAI_OBJECT_TYPE_WSS",
            LaiObjectType::MediaChannel => "LAI_OBJECT_TYPE_MEDIACHANNEL",
            LaiObjectType::Ocm => "LAI_OBJECT_TYPE_OCM",
            LaiObjectType::Otdr => "LAI_OBJECT_TYPE_OTDR",
        }
    }
}

impl fmt::Display for LaiObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaiObjectType {
    type Err = LaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LaiObjectType::Null.name() {
            return Ok(LaiObjectType::Null);
        }
        LaiObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| LaiError::parse("object type", s))
    }
}

/// A LAI object identifier (VID or RID).
///
/// The all-zero value is `LAI_NULL_OBJECT_ID`. The textual form is
/// `oid:0x<hex>`, which is also the serde representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LaiObjectId(RawLaiObjectId);

impl LaiObjectId {
    /// The null object ID (LAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self(0);

    pub const fn from_raw(raw: RawLaiObjectId) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> RawLaiObjectId {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for LaiObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaiObjectId(0x{:016x})", self.0)
    }
}

impl fmt::Display for LaiObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oid:0x{:x}", self.0)
    }
}

impl FromStr for LaiObjectId {
    type Err = LaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("oid:0x")
            .ok_or_else(|| LaiError::parse("object id", s))?;
        if hex.is_empty() || hex.len() > 16 {
            return Err(LaiError::parse("object id", s));
        }
        u64::from_str_radix(hex, 16)
            .map(LaiObjectId)
            .map_err(|_| LaiError::parse("object id", s))
    }
}

impl From<RawLaiObjectId> for LaiObjectId {
    fn from(raw: RawLaiObjectId) -> Self {
        Self(raw)
    }
}

impl Serialize for LaiObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LaiObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Asynchronous notifications a line card can deliver through a
/// pointer-valued attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaiNotificationKind {
    LinecardStateChange,
    LinecardAlarm,
    ApsSwitchInfo,
}

impl LaiNotificationKind {
    pub fn name(self) -> &'static str {
        match self {
            LaiNotificationKind::LinecardStateChange => "linecard_state_change",
            LaiNotificationKind::LinecardAlarm => "linecard_alarm",
            LaiNotificationKind::ApsSwitchInfo => "aps_switch_info",
        }
    }
}

impl fmt::Display for LaiNotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
