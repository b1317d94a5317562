//! String forms of LAI values as they appear in persisted state.
//!
//! | value type   | example                         |
//! |--------------|---------------------------------|
//! | bool         | `true`                          |
//! | integer      | `42`                            |
//! | enum (s32)   | `LAI_PORT_TYPE_LINE_IN` or `1`  |
//! | object id    | `oid:0x1000000000001`           |
//! | object list  | `2:oid:0x1,oid:0x2` / `0:null`  |
//! | u32 list     | `3:1,2,3`                       |
//! | pointer      | `NULL` / `ptr:0x7f00dead`       |
//! | struct       | `{"primary":"oid:0x5"}`         |

use std::str::FromStr;

use crate::attr::{LaiAttributeValue, LaiPointer};
use crate::error::{LaiError, LaiResult};
use crate::metadata::{AttrMetadata, AttrValueType, StructMemberInfo};
use crate::types::LaiObjectId;

const EMPTY_LIST: &str = "0:null";

pub fn serialize_object_id(id: LaiObjectId) -> String {
    id.to_string()
}

pub fn deserialize_object_id(s: &str) -> LaiResult<LaiObjectId> {
    s.parse()
}

/// Parses a persisted attribute value according to its metadata.
pub fn deserialize_attr_value(meta: &AttrMetadata, s: &str) -> LaiResult<LaiAttributeValue> {
    match meta.value_type {
        AttrValueType::S32 => {
            if let Some(value) = meta.enum_value(s) {
                return Ok(LaiAttributeValue::S32(value));
            }
            parse_number(s, "s32").map(LaiAttributeValue::S32)
        }
        AttrValueType::Struct => deserialize_struct(meta.struct_members, s),
        other => deserialize_scalar(other, s),
    }
}

/// Renders an attribute value in its persisted form.
pub fn serialize_attr_value(meta: &AttrMetadata, value: &LaiAttributeValue) -> String {
    match value {
        LaiAttributeValue::S32(v) => meta
            .enum_name(*v)
            .map(str::to_string)
            .unwrap_or_else(|| v.to_string()),
        other => serialize_value(other),
    }
}

fn serialize_value(value: &LaiAttributeValue) -> String {
    match value {
        LaiAttributeValue::Bool(v) => v.to_string(),
        LaiAttributeValue::U8(v) => v.to_string(),
        LaiAttributeValue::U16(v) => v.to_string(),
        LaiAttributeValue::U32(v) => v.to_string(),
        LaiAttributeValue::U64(v) => v.to_string(),
        LaiAttributeValue::S32(v) => v.to_string(),
        LaiAttributeValue::Double(v) => v.to_string(),
        LaiAttributeValue::Chardata(v) => v.clone(),
        LaiAttributeValue::Oid(v) => v.to_string(),
        LaiAttributeValue::ObjList(list) => serialize_list(list),
        LaiAttributeValue::U32List(list) => serialize_list(list),
        LaiAttributeValue::Pointer(LaiPointer::Null) => "NULL".to_string(),
        LaiAttributeValue::Pointer(LaiPointer::Raw(addr)) => format!("ptr:0x{:x}", addr),
        LaiAttributeValue::Pointer(LaiPointer::Handler(kind)) => format!("ptr:{}", kind),
        LaiAttributeValue::Struct(members) => {
            let map: serde_json::Map<String, serde_json::Value> = members
                .iter()
                .map(|(name, v)| (name.clone(), serde_json::Value::String(serialize_value(v))))
                .collect();
            serde_json::Value::Object(map).to_string()
        }
    }
}

fn serialize_list<T: ToString>(list: &[T]) -> String {
    if list.is_empty() {
        return EMPTY_LIST.to_string();
    }
    let items: Vec<String> = list.iter().map(ToString::to_string).collect();
    format!("{}:{}", list.len(), items.join(","))
}

fn deserialize_scalar(value_type: AttrValueType, s: &str) -> LaiResult<LaiAttributeValue> {
    let value = match value_type {
        AttrValueType::Bool => match s {
            "true" => LaiAttributeValue::Bool(true),
            "false" => LaiAttributeValue::Bool(false),
            _ => return Err(LaiError::parse("bool", s)),
        },
        AttrValueType::U8 => LaiAttributeValue::U8(parse_number(s, "u8")?),
        AttrValueType::U16 => LaiAttributeValue::U16(parse_number(s, "u16")?),
        AttrValueType::U32 => LaiAttributeValue::U32(parse_number(s, "u32")?),
        AttrValueType::U64 => LaiAttributeValue::U64(parse_number(s, "u64")?),
        AttrValueType::S32 => LaiAttributeValue::S32(parse_number(s, "s32")?),
        AttrValueType::Double => LaiAttributeValue::Double(parse_number(s, "double")?),
        AttrValueType::Chardata => LaiAttributeValue::Chardata(s.to_string()),
        AttrValueType::ObjectId => LaiAttributeValue::Oid(s.parse()?),
        AttrValueType::ObjectList => LaiAttributeValue::ObjList(deserialize_list(s, "object list")?),
        AttrValueType::U32List => LaiAttributeValue::U32List(deserialize_list(s, "u32 list")?),
        AttrValueType::Pointer => LaiAttributeValue::Pointer(deserialize_pointer(s)?),
        AttrValueType::Struct => return Err(LaiError::parse("nested struct", s)),
    };
    Ok(value)
}

fn parse_number<T: FromStr>(s: &str, kind: &'static str) -> LaiResult<T> {
    s.parse().map_err(|_| LaiError::parse(kind, s))
}

fn deserialize_list<T>(s: &str, kind: &'static str) -> LaiResult<Vec<T>>
where
    T: FromStr,
{
    if s == EMPTY_LIST {
        return Ok(Vec::new());
    }

    let (count, items) = s.split_once(':').ok_or_else(|| LaiError::parse(kind, s))?;
    let count: usize = count.parse().map_err(|_| LaiError::parse(kind, s))?;

    let list = items
        .split(',')
        .map(|item| item.parse::<T>().map_err(|_| LaiError::parse(kind, s)))
        .collect::<LaiResult<Vec<T>>>()?;

    if list.len() != count {
        return Err(LaiError::parse(kind, s));
    }
    Ok(list)
}

fn deserialize_pointer(s: &str) -> LaiResult<LaiPointer> {
    if s == "NULL" {
        return Ok(LaiPointer::Null);
    }
    let hex = s
        .strip_prefix("ptr:0x")
        .ok_or_else(|| LaiError::parse("pointer", s))?;
    match u64::from_str_radix(hex, 16) {
        Ok(0) => Ok(LaiPointer::Null),
        Ok(addr) => Ok(LaiPointer::Raw(addr)),
        Err(_) => Err(LaiError::parse("pointer", s)),
    }
}

fn deserialize_struct(
    members: &'static [StructMemberInfo],
    s: &str,
) -> LaiResult<LaiAttributeValue> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(s).map_err(|_| LaiError::parse("struct", s))?;

    if let Some(unknown) = object
        .keys()
        .find(|key| !members.iter().any(|m| m.name == key.as_str()))
    {
        return Err(LaiError::parse("struct member", unknown.as_str()));
    }

    let mut values = Vec::with_capacity(object.len());
    for member in members {
        let Some(raw) = object.get(member.name) else {
            continue;
        };
        let raw = raw
            .as_str()
            .ok_or_else(|| LaiError::parse("struct member", raw.to_string()))?;
        values.push((
            member.name.to_string(),
            deserialize_scalar(member.value_type, raw)?,
        ));
    }
    Ok(LaiAttributeValue::Struct(values))
}
