//! Read-only metadata describing object types and their attributes.
//!
//! The reconciler never hard-codes which attributes carry object ids or must
//! be supplied at creation; it asks a [`LaiMetadata`] implementation.

mod catalog;

pub use catalog::{
    aps_attr, aps_port_attr, assignment_attr, linecard_attr, logical_channel_attr, oa_attr,
    och_attr, otn_attr, port_attr, transceiver_attr, StaticLaiMetadata,
};

use bitflags::bitflags;

use crate::attr::LaiAttrId;
use crate::types::{LaiNotificationKind, LaiObjectType};

bitflags! {
    /// Attribute flags (`lai_attr_flags_t`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttrFlags: u32 {
        const MANDATORY_ON_CREATE = 1 << 0;
        const CREATE_ONLY = 1 << 1;
        const CREATE_AND_SET = 1 << 2;
        const READ_ONLY = 1 << 3;
        const KEY = 1 << 4;
    }
}

impl AttrFlags {
    /// Mandatory-on-create or create-only: must be passed to `create`.
    pub const fn is_creation_required(self) -> bool {
        self.intersects(AttrFlags::MANDATORY_ON_CREATE.union(AttrFlags::CREATE_ONLY))
    }
}

/// Value type of an attribute or struct member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrValueType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    S32,
    Double,
    Chardata,
    ObjectId,
    ObjectList,
    U32List,
    Pointer,
    Struct,
}

/// Describes one member of a struct-valued attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructMemberInfo {
    pub name: &'static str,
    pub value_type: AttrValueType,
    pub allowed_object_types: &'static [LaiObjectType],
}

/// Describes one attribute of one object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrMetadata {
    pub object_type: LaiObjectType,
    pub id: LaiAttrId,
    pub name: &'static str,
    pub value_type: AttrValueType,
    pub flags: AttrFlags,
    /// Non-empty when the attribute (or a struct member) holds object ids.
    pub allowed_object_types: &'static [LaiObjectType],
    /// Enum value names for enum-typed s32 attributes.
    pub enum_values: &'static [(&'static str, i32)],
    pub struct_members: &'static [StructMemberInfo],
    /// Notification delivered through a pointer-valued attribute.
    pub notification: Option<LaiNotificationKind>,
}

impl AttrMetadata {
    pub(crate) const fn new(
        object_type: LaiObjectType,
        id: LaiAttrId,
        name: &'static str,
        value_type: AttrValueType,
        flags: AttrFlags,
    ) -> Self {
        Self {
            object_type,
            id,
            name,
            value_type,
            flags,
            allowed_object_types: &[],
            enum_values: &[],
            struct_members: &[],
            notification: None,
        }
    }

    pub(crate) const fn allowed(mut self, types: &'static [LaiObjectType]) -> Self {
        self.allowed_object_types = types;
        self
    }

    pub(crate) const fn enums(mut self, values: &'static [(&'static str, i32)]) -> Self {
        self.enum_values = values;
        self
    }

    pub(crate) const fn members(mut self, members: &'static [StructMemberInfo]) -> Self {
        self.struct_members = members;
        self
    }

    pub(crate) const fn notify(mut self, kind: LaiNotificationKind) -> Self {
        self.notification = Some(kind);
        self
    }

    pub fn is_creation_required(&self) -> bool {
        self.flags.is_creation_required()
    }

    pub fn is_create_only(&self) -> bool {
        self.flags.contains(AttrFlags::CREATE_ONLY)
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(AttrFlags::READ_ONLY)
    }

    pub fn is_mandatory_on_create(&self) -> bool {
        self.flags.contains(AttrFlags::MANDATORY_ON_CREATE)
    }

    /// True when values of this attribute may contain object ids.
    pub fn is_oid_attribute(&self) -> bool {
        !self.allowed_object_types.is_empty()
            || matches!(
                self.value_type,
                AttrValueType::ObjectId | AttrValueType::ObjectList
            )
    }

    pub fn enum_value(&self, name: &str) -> Option<i32> {
        self.enum_values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn enum_name(&self, value: i32) -> Option<&'static str> {
        self.enum_values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| *n)
    }

    pub fn struct_member(&self, name: &str) -> Option<&'static StructMemberInfo> {
        self.struct_members.iter().find(|m| m.name == name)
    }
}

/// Per-object-type information (`lai_object_type_info_t`).
#[derive(Debug, Clone, Copy)]
pub struct ObjectTypeInfo {
    pub object_type: LaiObjectType,
    pub name: &'static str,
    /// Objects keyed by a struct rather than by an object id.
    pub is_non_object_id: bool,
    pub attributes: &'static [AttrMetadata],
}

/// Read-only metadata capability.
pub trait LaiMetadata: Send + Sync {
    fn object_type_info(&self, object_type: LaiObjectType) -> Option<&ObjectTypeInfo>;

    fn is_object_type_valid(&self, object_type: LaiObjectType) -> bool {
        object_type.is_valid() && self.object_type_info(object_type).is_some()
    }

    fn attributes(&self, object_type: LaiObjectType) -> &[AttrMetadata] {
        self.object_type_info(object_type)
            .map(|info| info.attributes)
            .unwrap_or(&[])
    }

    fn attr_metadata(&self, object_type: LaiObjectType, id: LaiAttrId) -> Option<&AttrMetadata> {
        self.attributes(object_type).iter().find(|m| m.id == id)
    }

    fn attr_metadata_by_name(&self, name: &str) -> Option<&AttrMetadata>;
}
