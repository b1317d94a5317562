//! Object identifier codec.
//!
//! Every LAI object id is a self-describing 64-bit value:
//!
//! ```text
//! bits 63..56  reserved (must be zero)
//! bits 55..48  global context
//! bits 47..40  linecard index
//! bits 39..32  object type
//! bits 31..0   object index
//! ```
//!
//! Line-card ids carry their own linecard index in the object index field as
//! well, so the id of a card can be derived from any object that lives on it.

use crate::error::{LaiError, LaiResult};
use crate::types::{LaiObjectId, LaiObjectType};

pub const OID_RESERVED_BITS_SIZE: u32 = 8;
pub const GLOBAL_CONTEXT_BITS_SIZE: u32 = 8;
pub const LINECARD_INDEX_BITS_SIZE: u32 = 8;
pub const OBJECT_TYPE_BITS_SIZE: u32 = 8;
pub const OBJECT_INDEX_BITS_SIZE: u32 = 32;

pub const GLOBAL_CONTEXT_MAX: u64 = (1 << GLOBAL_CONTEXT_BITS_SIZE) - 1;
pub const LINECARD_INDEX_MAX: u64 = (1 << LINECARD_INDEX_BITS_SIZE) - 1;
pub const OBJECT_TYPE_MAX: u64 = (1 << OBJECT_TYPE_BITS_SIZE) - 1;
pub const OBJECT_INDEX_MAX: u64 = (1 << OBJECT_INDEX_BITS_SIZE) - 1;

const OBJECT_TYPE_SHIFT: u32 = OBJECT_INDEX_BITS_SIZE;
const LINECARD_INDEX_SHIFT: u32 = OBJECT_TYPE_SHIFT + OBJECT_TYPE_BITS_SIZE;
const GLOBAL_CONTEXT_SHIFT: u32 = LINECARD_INDEX_SHIFT + LINECARD_INDEX_BITS_SIZE;

const _: () = assert!(
    OID_RESERVED_BITS_SIZE
        + GLOBAL_CONTEXT_BITS_SIZE
        + LINECARD_INDEX_BITS_SIZE
        + OBJECT_TYPE_BITS_SIZE
        + OBJECT_INDEX_BITS_SIZE
        == u64::BITS
);
const _: () = assert!((LaiObjectType::EXTENSIONS_MAX as u64) < OBJECT_TYPE_MAX);

/// Packs raw field values into an object id. Callers validate ranges.
pub const fn encode_raw(
    object_type: u8,
    linecard_index: u8,
    object_index: u32,
    global_context: u8,
) -> LaiObjectId {
    LaiObjectId::from_raw(
        ((global_context as u64) << GLOBAL_CONTEXT_SHIFT)
            | ((linecard_index as u64) << LINECARD_INDEX_SHIFT)
            | ((object_type as u64) << OBJECT_TYPE_SHIFT)
            | object_index as u64,
    )
}

pub fn encode(
    object_type: LaiObjectType,
    linecard_index: u8,
    object_index: u32,
    global_context: u8,
) -> LaiObjectId {
    // Valid types are all below EXTENSIONS_MAX, which fits the 8-bit field.
    encode_raw(
        object_type.as_raw() as u8,
        linecard_index,
        object_index,
        global_context,
    )
}

/// Encodes the id of the line card occupying `linecard_index`.
pub fn encode_linecard(linecard_index: u8, global_context: u8) -> LaiObjectId {
    encode(
        LaiObjectType::Linecard,
        linecard_index,
        u32::from(linecard_index),
        global_context,
    )
}

pub const fn decode_object_type_raw(id: LaiObjectId) -> u8 {
    ((id.as_raw() >> OBJECT_TYPE_SHIFT) & OBJECT_TYPE_MAX) as u8
}

pub const fn decode_linecard_index(id: LaiObjectId) -> u8 {
    ((id.as_raw() >> LINECARD_INDEX_SHIFT) & LINECARD_INDEX_MAX) as u8
}

pub const fn decode_global_context(id: LaiObjectId) -> u8 {
    ((id.as_raw() >> GLOBAL_CONTEXT_SHIFT) & GLOBAL_CONTEXT_MAX) as u8
}

pub const fn decode_object_index(id: LaiObjectId) -> u32 {
    (id.as_raw() & OBJECT_INDEX_MAX) as u32
}

/// Returns the object type encoded in `id`.
///
/// Null ids and ids carrying an unknown type tag both yield
/// [`LaiObjectType::Null`]; the caller decides whether that is fatal.
pub fn object_type_query(id: LaiObjectId) -> LaiObjectType {
    if id.is_null() {
        return LaiObjectType::Null;
    }

    match LaiObjectType::from_raw(i32::from(decode_object_type_raw(id))) {
        Some(ty) if ty.is_valid() => ty,
        _ => {
            tracing::error!("invalid object id {}", id);
            LaiObjectType::Null
        }
    }
}

/// Returns the id of the line card `id` lives on.
///
/// A line-card id is returned unchanged, the null id maps to null, and an id
/// with an invalid type tag is an error.
pub fn linecard_id_query(id: LaiObjectId) -> LaiResult<LaiObjectId> {
    if id.is_null() {
        return Ok(LaiObjectId::NULL);
    }

    match object_type_query(id) {
        LaiObjectType::Null => Err(LaiError::InvalidObjectId { id }),
        LaiObjectType::Linecard => Ok(id),
        _ => Ok(encode_linecard(
            decode_linecard_index(id),
            decode_global_context(id),
        )),
    }
}

/// All fields of an object id, decoded without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectIdFields {
    pub global_context: u8,
    pub linecard_index: u8,
    pub object_type: u8,
    pub object_index: u32,
}

impl ObjectIdFields {
    pub const fn decode(id: LaiObjectId) -> Self {
        Self {
            global_context: decode_global_context(id),
            linecard_index: decode_linecard_index(id),
            object_type: decode_object_type_raw(id),
            object_index: decode_object_index(id),
        }
    }

    pub const fn encode(&self) -> LaiObjectId {
        encode_raw(
            self.object_type,
            self.linecard_index,
            self.object_index,
            self.global_context,
        )
    }
}
