//! VID/RID translation map built by a reconciliation pass.
//!
//! The two directions are kept in lockstep: an entry is only ever inserted
//! into both, and neither key may be bound twice. Lookups never create
//! entries.

use std::collections::BTreeMap;

use serde::Serialize;
use sonic_lai::LaiObjectId;

use crate::error::{Result, SyncdError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationMap {
    #[serde(rename = "vidtorid")]
    vid_to_rid: BTreeMap<LaiObjectId, LaiObjectId>,

    #[serde(rename = "ridtovid")]
    rid_to_vid: BTreeMap<LaiObjectId, LaiObjectId>,
}

impl TranslationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `vid` to `rid` in both directions.
    pub fn insert(&mut self, vid: LaiObjectId, rid: LaiObjectId) -> Result<()> {
        if self.vid_to_rid.contains_key(&vid) || self.rid_to_vid.contains_key(&rid) {
            return Err(SyncdError::DuplicateTranslation { vid, rid });
        }
        self.vid_to_rid.insert(vid, rid);
        self.rid_to_vid.insert(rid, vid);
        Ok(())
    }

    pub fn rid(&self, vid: LaiObjectId) -> Option<LaiObjectId> {
        self.vid_to_rid.get(&vid).copied()
    }

    pub fn vid(&self, rid: LaiObjectId) -> Option<LaiObjectId> {
        self.rid_to_vid.get(&rid).copied()
    }

    pub fn contains_vid(&self, vid: LaiObjectId) -> bool {
        self.vid_to_rid.contains_key(&vid)
    }

    pub fn len(&self) -> usize {
        self.vid_to_rid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vid_to_rid.is_empty()
    }

    /// `(vid, rid)` pairs in VID order.
    pub fn iter(&self) -> impl Iterator<Item = (LaiObjectId, LaiObjectId)> + '_ {
        self.vid_to_rid.iter().map(|(vid, rid)| (*vid, *rid))
    }

    pub fn vid_to_rid(&self) -> &BTreeMap<LaiObjectId, LaiObjectId> {
        &self.vid_to_rid
    }

    pub fn rid_to_vid(&self) -> &BTreeMap<LaiObjectId, LaiObjectId> {
        &self.rid_to_vid
    }
}
