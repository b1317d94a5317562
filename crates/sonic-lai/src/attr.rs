//! Attribute values passed to create/set/get calls.

use crate::types::{LaiNotificationKind, LaiObjectId};

/// Attribute id, scoped to an object type.
pub type LaiAttrId = i32;

/// A callback-reference attribute value.
///
/// Persisted snapshots only record whether a callback was installed, as an
/// opaque address. Before such a value reaches the device it is rewritten to
/// a [`LaiPointer::Handler`] naming the process-local handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaiPointer {
    Null,
    /// Address as recorded by a previous process; meaningless in this one.
    Raw(u64),
    Handler(LaiNotificationKind),
}

impl LaiPointer {
    pub fn is_null(&self) -> bool {
        matches!(self, LaiPointer::Null)
    }
}

/// Tagged attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum LaiAttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S32(i32),
    Double(f64),
    Chardata(String),
    Oid(LaiObjectId),
    ObjList(Vec<LaiObjectId>),
    U32List(Vec<u32>),
    Pointer(LaiPointer),
    /// Named struct members in declaration order.
    Struct(Vec<(String, LaiAttributeValue)>),
}

impl LaiAttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LaiAttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_s32(&self) -> Option<i32> {
        match self {
            LaiAttributeValue::S32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            LaiAttributeValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LaiAttributeValue::Chardata(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<LaiObjectId> {
        match self {
            LaiAttributeValue::Oid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_objlist(&self) -> Option<&[LaiObjectId]> {
        match self {
            LaiAttributeValue::ObjList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<LaiPointer> {
        match self {
            LaiAttributeValue::Pointer(v) => Some(*v),
            _ => None,
        }
    }

    /// Looks up a struct member by name.
    pub fn member(&self, name: &str) -> Option<&LaiAttributeValue> {
        match self {
            LaiAttributeValue::Struct(members) => {
                members.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut LaiAttributeValue> {
        match self {
            LaiAttributeValue::Struct(members) => members
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// A single attribute: id plus value.
#[derive(Debug, Clone, PartialEq)]
pub struct LaiAttribute {
    pub id: LaiAttrId,
    pub value: LaiAttributeValue,
}

impl LaiAttribute {
    pub fn new(id: LaiAttrId, value: LaiAttributeValue) -> Self {
        Self { id, value }
    }
}

/// Finds an attribute by id in a list.
pub fn find_attr(attrs: &[LaiAttribute], id: LaiAttrId) -> Option<&LaiAttribute> {
    attrs.iter().find(|a| a.id == id)
}
