//! Object id references inside attribute values.
//!
//! Which parts of a value hold object ids is decided by the attribute's
//! metadata: the whole value for object-id and object-list attributes, and
//! the object-id and object-list typed members for structs. Any other attribute that claims
//! to reference objects is rejected rather than silently passed through with
//! untranslated ids. Null ids are never visited.

use sonic_lai::{AttrMetadata, AttrValueType, LaiAttribute, LaiAttributeValue, LaiMetadata};
use sonic_lai::{LaiObjectId, LaiObjectType};

use crate::error::{Result, SyncdError};

/// Returns every non-null id referenced by one attribute value.
pub fn referenced_ids(meta: &AttrMetadata, value: &LaiAttributeValue) -> Result<Vec<LaiObjectId>> {
    let mut ids = Vec::new();
    let mut value = value.clone();
    rewrite_value(meta, &mut value, &mut |id| {
        ids.push(id);
        Ok(id)
    })?;
    Ok(ids)
}

/// Replaces every non-null id in `value` with `translate(id)`.
pub fn rewrite_value<F>(meta: &AttrMetadata, value: &mut LaiAttributeValue, translate: &mut F) -> Result<()>
where
    F: FnMut(LaiObjectId) -> Result<LaiObjectId>,
{
    match (meta.value_type, value) {
        (AttrValueType::ObjectId, LaiAttributeValue::Oid(id)) => rewrite_id(id, translate),
        (AttrValueType::ObjectList, LaiAttributeValue::ObjList(list)) => {
            list.iter_mut().try_for_each(|id| rewrite_id(id, translate))
        }
        (AttrValueType::Struct, LaiAttributeValue::Struct(members)) => {
            for (name, member) in members.iter_mut() {
                let Some(info) = meta.struct_member(name) else {
                    continue;
                };
                match (info.value_type, member) {
                    (AttrValueType::ObjectId, LaiAttributeValue::Oid(id)) => {
                        rewrite_id(id, translate)?
                    }
                    (AttrValueType::ObjectList, LaiAttributeValue::ObjList(list)) => {
                        list.iter_mut().try_for_each(|id| rewrite_id(id, translate))?
                    }
                    _ => {}
                }
            }
            Ok(())
        }
        _ if meta.allowed_object_types.is_empty() => Ok(()),
        _ => Err(SyncdError::UnprocessedOidAttribute { attr: meta.name }),
    }
}

fn rewrite_id<F>(id: &mut LaiObjectId, translate: &mut F) -> Result<()>
where
    F: FnMut(LaiObjectId) -> Result<LaiObjectId>,
{
    if !id.is_null() {
        *id = translate(*id)?;
    }
    Ok(())
}

/// Metadata of one attribute of `object_type`.
pub fn attr_metadata_for<'m>(
    metadata: &'m dyn LaiMetadata,
    object_type: LaiObjectType,
    attr: &LaiAttribute,
) -> Result<&'m AttrMetadata> {
    metadata
        .attr_metadata(object_type, attr.id)
        .ok_or_else(|| SyncdError::MissingAttributeMetadata {
            object_type,
            attr: attr.id.to_string(),
        })
}

/// Rewrites the ids of a whole attribute list in place.
pub fn rewrite_attrs<F>(
    metadata: &dyn LaiMetadata,
    object_type: LaiObjectType,
    attrs: &mut [LaiAttribute],
    mut translate: F,
) -> Result<()>
where
    F: FnMut(LaiObjectId) -> Result<LaiObjectId>,
{
    for attr in attrs.iter_mut() {
        let meta = attr_metadata_for(metadata, object_type, attr)?;
        rewrite_value(meta, &mut attr.value, &mut translate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_lai::metadata::{aps_attr, linecard_attr, port_attr, StructMemberInfo};
    use sonic_lai::{AttrFlags, StaticLaiMetadata};

    fn id(raw: u64) -> LaiObjectId {
        LaiObjectId::from_raw(raw)
    }

    fn meta(object_type: LaiObjectType, attr: i32) -> &'static AttrMetadata {
        static CATALOG: StaticLaiMetadata = StaticLaiMetadata;
        CATALOG.attr_metadata(object_type, attr).unwrap()
    }

    #[test]
    fn test_single_id_skips_null() {
        let m = meta(LaiObjectType::Port, port_attr::PEER_PORT);
        assert_eq!(
            referenced_ids(m, &LaiAttributeValue::Oid(id(5))).unwrap(),
            vec![id(5)]
        );
        assert!(referenced_ids(m, &LaiAttributeValue::Oid(LaiObjectId::NULL))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rewrite_object_list() {
        let m = meta(LaiObjectType::Aps, aps_attr::PORT_LIST);
        let mut value = LaiAttributeValue::ObjList(vec![id(1), LaiObjectId::NULL, id(2)]);
        rewrite_value(m, &mut value, &mut |vid| Ok(id(vid.as_raw() + 0x100))).unwrap();
        assert_eq!(
            value,
            LaiAttributeValue::ObjList(vec![id(0x101), LaiObjectId::NULL, id(0x102)])
        );
    }

    #[test]
    fn test_struct_members() {
        let m = meta(LaiObjectType::Aps, aps_attr::PROTECTION_SETTINGS);
        let value = LaiAttributeValue::Struct(vec![
            ("primary".to_string(), LaiAttributeValue::Oid(id(7))),
            ("secondary".to_string(), LaiAttributeValue::Oid(id(8))),
            ("revertive".to_string(), LaiAttributeValue::Bool(true)),
        ]);
        assert_eq!(referenced_ids(m, &value).unwrap(), vec![id(7), id(8)]);
    }

    /// Struct attribute with a list member, e.g. a group and its ports.
    static PORT_GROUP: AttrMetadata = AttrMetadata {
        object_type: LaiObjectType::Aps,
        id: 100,
        name: "LAI_APS_ATTR_PORT_GROUP",
        value_type: AttrValueType::Struct,
        flags: AttrFlags::CREATE_AND_SET,
        allowed_object_types: &[LaiObjectType::ApsPort],
        enum_values: &[],
        struct_members: &[
            StructMemberInfo {
                name: "leader",
                value_type: AttrValueType::ObjectId,
                allowed_object_types: &[LaiObjectType::ApsPort],
            },
            StructMemberInfo {
                name: "members",
                value_type: AttrValueType::ObjectList,
                allowed_object_types: &[LaiObjectType::ApsPort],
            },
            StructMemberInfo {
                name: "weight",
                value_type: AttrValueType::U32,
                allowed_object_types: &[],
            },
        ],
        notification: None,
    };

    fn port_group(leader: u64, members: Vec<LaiObjectId>) -> LaiAttributeValue {
        LaiAttributeValue::Struct(vec![
            ("leader".to_string(), LaiAttributeValue::Oid(id(leader))),
            ("members".to_string(), LaiAttributeValue::ObjList(members)),
            ("weight".to_string(), LaiAttributeValue::U32(3)),
        ])
    }

    #[test]
    fn test_rewrite_struct_list_member() {
        let mut value = port_group(1, vec![id(2), LaiObjectId::NULL, id(3)]);
        let mut seen = Vec::new();
        rewrite_value(&PORT_GROUP, &mut value, &mut |vid| {
            seen.push(vid);
            Ok(id(vid.as_raw() + 0x100))
        })
        .unwrap();

        assert_eq!(seen, vec![id(1), id(2), id(3)]);
        assert_eq!(
            value,
            LaiAttributeValue::Struct(vec![
                ("leader".to_string(), LaiAttributeValue::Oid(id(0x101))),
                (
                    "members".to_string(),
                    LaiAttributeValue::ObjList(vec![id(0x102), LaiObjectId::NULL, id(0x103)])
                ),
                ("weight".to_string(), LaiAttributeValue::U32(3)),
            ])
        );
    }

    #[test]
    fn test_struct_list_member_ids_are_referenced() {
        let value = port_group(0, vec![id(4), LaiObjectId::NULL, id(5)]);
        assert_eq!(referenced_ids(&PORT_GROUP, &value).unwrap(), vec![id(4), id(5)]);
    }

    #[test]
    fn test_scalar_attribute_is_untouched() {
        let m = meta(LaiObjectType::Port, port_attr::PORT_ID);
        let mut value = LaiAttributeValue::U32(4);
        rewrite_value(m, &mut value, &mut |_| unreachable!()).unwrap();
        assert_eq!(value, LaiAttributeValue::U32(4));
    }

    #[test]
    fn test_mismatched_oid_attribute_is_rejected() {
        let m = meta(LaiObjectType::Linecard, linecard_attr::MGMT_PORT);
        let err = referenced_ids(m, &LaiAttributeValue::U32(1)).unwrap_err();
        assert!(matches!(
            err,
            SyncdError::UnprocessedOidAttribute {
                attr: "LAI_LINECARD_ATTR_MGMT_PORT"
            }
        ));
    }

    #[test]
    fn test_rewrite_attrs_propagates_errors() {
        let mut attrs = vec![
            LaiAttribute::new(port_attr::PORT_ID, LaiAttributeValue::U32(1)),
            LaiAttribute::new(port_attr::PEER_PORT, LaiAttributeValue::Oid(id(9))),
        ];
        let err = rewrite_attrs(&StaticLaiMetadata, LaiObjectType::Port, &mut attrs, |vid| {
            Err(SyncdError::VidNotFound { vid })
        })
        .unwrap_err();
        assert!(matches!(err, SyncdError::VidNotFound { .. }));

        let mut attrs = vec![LaiAttribute::new(99, LaiAttributeValue::U32(1))];
        assert!(matches!(
            rewrite_attrs(&StaticLaiMetadata, LaiObjectType::Port, &mut attrs, Ok),
            Err(SyncdError::MissingAttributeMetadata { .. })
        ));
    }
}
