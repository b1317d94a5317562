//! Persisted ASIC state.
//!
//! Objects are stored under `ASIC_STATE:<LAI_OBJECT_TYPE_*>:<vid>` keys whose
//! fields are attribute names and whose values are the serialized attribute
//! values. The previous pass's translations live next to them in the
//! `VIDTORID` and `RIDTOVID` tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sonic_lai::serialize::deserialize_attr_value;
use sonic_lai::{LaiAttribute, LaiMetadata, LaiObjectId, LaiObjectType};

use crate::error::{Result, SyncdError};
use crate::translation::TranslationMap;

pub const ASIC_STATE_TABLE: &str = "ASIC_STATE";

/// Field stored for objects created without attributes.
const EMPTY_FIELD: &str = "NULL";

/// Read access to the persisted object store.
pub trait AsicStateReader {
    /// Every `ASIC_STATE:*` key.
    fn asic_state_keys(&self) -> Result<Vec<String>>;

    /// Field/value pairs stored under `key`.
    fn attributes_from_asic_key(&self, key: &str) -> Result<Vec<(String, String)>>;

    fn vid_to_rid_map(&self) -> Result<BTreeMap<LaiObjectId, LaiObjectId>>;

    fn rid_to_vid_map(&self) -> Result<BTreeMap<LaiObjectId, LaiObjectId>>;
}

/// One logical object as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedObjectRecord {
    pub object_type: LaiObjectType,
    pub vid: LaiObjectId,
    pub attrs: Vec<LaiAttribute>,
}

pub fn format_asic_key(object_type: LaiObjectType, vid: LaiObjectId) -> String {
    format!("{}:{}:{}", ASIC_STATE_TABLE, object_type, vid)
}

/// Splits an `ASIC_STATE` key into object type and VID.
pub fn parse_asic_key(key: &str) -> Result<(LaiObjectType, LaiObjectId)> {
    let rest = key
        .strip_prefix(ASIC_STATE_TABLE)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| SyncdError::invalid_key(key, "missing ASIC_STATE prefix"))?;

    let (object_type, vid) = rest
        .split_once(':')
        .ok_or_else(|| SyncdError::invalid_key(key, "missing object id"))?;

    let object_type: LaiObjectType = object_type
        .parse()
        .map_err(|e: sonic_lai::LaiError| SyncdError::invalid_key(key, e.to_string()))?;
    if !object_type.is_valid() {
        return Err(SyncdError::invalid_key(key, "null object type"));
    }

    let vid: LaiObjectId = vid
        .parse()
        .map_err(|e: sonic_lai::LaiError| SyncdError::invalid_key(key, e.to_string()))?;

    Ok((object_type, vid))
}

/// Reads and parses every persisted object.
pub fn read_records(
    reader: &dyn AsicStateReader,
    metadata: &dyn LaiMetadata,
) -> Result<Vec<PersistedObjectRecord>> {
    let keys = reader.asic_state_keys()?;
    let mut records = Vec::with_capacity(keys.len());

    for key in keys {
        let (object_type, vid) = parse_asic_key(&key)?;

        let mut attrs = Vec::new();
        for (field, value) in reader.attributes_from_asic_key(&key)? {
            if field == EMPTY_FIELD {
                continue;
            }

            let meta = metadata
                .attr_metadata_by_name(&field)
                .filter(|meta| meta.object_type == object_type)
                .ok_or_else(|| SyncdError::MissingAttributeMetadata {
                    object_type,
                    attr: field.clone(),
                })?;

            let value =
                deserialize_attr_value(meta, &value).map_err(|source| SyncdError::AttributeParse {
                    vid,
                    attr: field.clone(),
                    source,
                })?;
            attrs.push(LaiAttribute::new(meta.id, value));
        }

        records.push(PersistedObjectRecord {
            object_type,
            vid,
            attrs,
        });
    }

    Ok(records)
}

/// JSON dump of the ASIC database.
///
/// ```json
/// {
///   "asic_state": {
///     "ASIC_STATE:LAI_OBJECT_TYPE_LINECARD:oid:0x...": { "LAI_LINECARD_ATTR_LINECARD_TYPE": "P230C" }
///   },
///   "vidtorid": { "oid:0x...": "oid:0x..." },
///   "ridtovid": { "oid:0x...": "oid:0x..." }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsicStateSnapshot {
    #[serde(default)]
    pub asic_state: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(default)]
    pub vidtorid: BTreeMap<LaiObjectId, LaiObjectId>,

    #[serde(default)]
    pub ridtovid: BTreeMap<LaiObjectId, LaiObjectId>,
}

impl AsicStateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SyncdError::Snapshot(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SyncdError::Snapshot(e.to_string()))
    }

    /// Stores an object under its ASIC_STATE key, replacing any previous one.
    pub fn insert_object<'a>(
        &mut self,
        object_type: LaiObjectType,
        vid: LaiObjectId,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let mut fields: BTreeMap<String, String> = fields
            .into_iter()
            .map(|(f, v)| (f.to_string(), v.to_string()))
            .collect();
        if fields.is_empty() {
            fields.insert(EMPTY_FIELD.to_string(), EMPTY_FIELD.to_string());
        }
        self.asic_state.insert(format_asic_key(object_type, vid), fields);
    }

    /// Replaces the stored translations with the result of a pass.
    pub fn store_translations(&mut self, map: &TranslationMap) {
        self.vidtorid = map.vid_to_rid().clone();
        self.ridtovid = map.rid_to_vid().clone();
    }
}

impl AsicStateReader for AsicStateSnapshot {
    fn asic_state_keys(&self) -> Result<Vec<String>> {
        Ok(self.asic_state.keys().cloned().collect())
    }

    fn attributes_from_asic_key(&self, key: &str) -> Result<Vec<(String, String)>> {
        let fields = self
            .asic_state
            .get(key)
            .ok_or_else(|| SyncdError::invalid_key(key, "no such key"))?;
        Ok(fields
            .iter()
            .map(|(f, v)| (f.clone(), v.clone()))
            .collect())
    }

    fn vid_to_rid_map(&self) -> Result<BTreeMap<LaiObjectId, LaiObjectId>> {
        Ok(self.vidtorid.clone())
    }

    fn rid_to_vid_map(&self) -> Result<BTreeMap<LaiObjectId, LaiObjectId>> {
        Ok(self.ridtovid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_lai::metadata::port_attr;
    use sonic_lai::{LaiAttributeValue, StaticLaiMetadata};

    fn vid(raw: u64) -> LaiObjectId {
        LaiObjectId::from_raw(raw)
    }

    #[test]
    fn test_parse_asic_key() {
        let key = "ASIC_STATE:LAI_OBJECT_TYPE_PORT:oid:0x2000000000001";
        assert_eq!(
            parse_asic_key(key).unwrap(),
            (LaiObjectType::Port, vid(0x2000000000001))
        );
        assert_eq!(
            format_asic_key(LaiObjectType::Port, vid(0x2000000000001)),
            key
        );
    }

    #[test]
    fn test_parse_asic_key_errors() {
        for key in [
            "TEMP_ASIC_STATE:LAI_OBJECT_TYPE_PORT:oid:0x1",
            "ASIC_STATE:LAI_OBJECT_TYPE_PORT",
            "ASIC_STATE:LAI_OBJECT_TYPE_BOGUS:oid:0x1",
            "ASIC_STATE:LAI_OBJECT_TYPE_NULL:oid:0x1",
            "ASIC_STATE:LAI_OBJECT_TYPE_PORT:0x1",
        ] {
            assert!(
                matches!(parse_asic_key(key), Err(SyncdError::InvalidAsicKey { .. })),
                "{key}"
            );
        }
    }

    #[test]
    fn test_read_records() {
        let mut snapshot = AsicStateSnapshot::new();
        snapshot.insert_object(
            LaiObjectType::Port,
            vid(0x20),
            [
                ("LAI_PORT_ATTR_PORT_TYPE", "LAI_PORT_TYPE_LINE_IN"),
                ("LAI_PORT_ATTR_PORT_ID", "1"),
                ("LAI_PORT_ATTR_PEER_PORT", "oid:0x21"),
            ],
        );
        snapshot.insert_object(LaiObjectType::Och, vid(0x30), []);

        let records = read_records(&snapshot, &StaticLaiMetadata).unwrap();
        assert_eq!(records.len(), 2);

        let port = &records[1];
        assert_eq!(port.object_type, LaiObjectType::Port);
        assert_eq!(port.vid, vid(0x20));
        assert_eq!(
            port.attrs,
            vec![
                LaiAttribute::new(port_attr::PEER_PORT, LaiAttributeValue::Oid(vid(0x21))),
                LaiAttribute::new(port_attr::PORT_ID, LaiAttributeValue::U32(1)),
                LaiAttribute::new(port_attr::PORT_TYPE, LaiAttributeValue::S32(1)),
            ]
        );
        assert!(records[0].attrs.is_empty());
    }

    #[test]
    fn test_read_records_rejects_foreign_attribute() {
        let mut snapshot = AsicStateSnapshot::new();
        snapshot.insert_object(
            LaiObjectType::Port,
            vid(0x20),
            [("LAI_OCH_ATTR_FREQUENCY", "193100000")],
        );
        assert!(matches!(
            read_records(&snapshot, &StaticLaiMetadata),
            Err(SyncdError::MissingAttributeMetadata { .. })
        ));
    }

    #[test]
    fn test_read_records_reports_bad_value() {
        let mut snapshot = AsicStateSnapshot::new();
        snapshot.insert_object(
            LaiObjectType::Port,
            vid(0x20),
            [("LAI_PORT_ATTR_PORT_ID", "one")],
        );
        let err = read_records(&snapshot, &StaticLaiMetadata).unwrap_err();
        assert!(err.to_string().contains("LAI_PORT_ATTR_PORT_ID"));
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = AsicStateSnapshot::from_json(
            r#"{
                "asic_state": {
                    "ASIC_STATE:LAI_OBJECT_TYPE_OCH:oid:0x30": { "LAI_OCH_ATTR_ID": "1" }
                },
                "vidtorid": { "oid:0x30": "oid:0x8010000000000" }
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.vid_to_rid_map().unwrap().len(), 1);
        assert!(snapshot.rid_to_vid_map().unwrap().is_empty());

        let back = AsicStateSnapshot::from_json(&snapshot.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, snapshot);
        assert!(AsicStateSnapshot::from_json("[]").is_err());
    }
}
