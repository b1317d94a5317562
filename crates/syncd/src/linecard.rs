//! Handle to the line card created by a reconciliation pass.

use std::collections::BTreeSet;

use sonic_lai::{LaiApi, LaiMetadata, LaiObjectId};

use crate::attr_refs::referenced_ids;
use crate::error::Result;
use crate::{debug_log, info_log};

/// The line card plus the objects it reported on its own.
///
/// Discovery walks every read-only object-id attribute reachable from the
/// card. Whatever it finds existed before any object was created by this
/// process, so those RIDs may be matched instead of recreated.
#[derive(Debug, Clone)]
pub struct LaiLinecard {
    vid: LaiObjectId,
    rid: LaiObjectId,
    discovered: BTreeSet<LaiObjectId>,
}

impl LaiLinecard {
    pub fn new(
        vid: LaiObjectId,
        rid: LaiObjectId,
        api: &dyn LaiApi,
        metadata: &dyn LaiMetadata,
    ) -> Result<Self> {
        let mut linecard = Self {
            vid,
            rid,
            discovered: BTreeSet::new(),
        };
        linecard.discover(api, metadata)?;
        Ok(linecard)
    }

    fn discover(&mut self, api: &dyn LaiApi, metadata: &dyn LaiMetadata) -> Result<()> {
        let mut pending = vec![self.rid];

        while let Some(rid) = pending.pop() {
            let object_type = api.object_type_query(rid);

            for meta in metadata.attributes(object_type) {
                if !meta.is_read_only() || !meta.is_oid_attribute() {
                    continue;
                }

                let attrs = match api.get(object_type, rid, &[meta.id]) {
                    Ok(attrs) => attrs,
                    Err(e) => {
                        debug_log!("LaiLinecard", attr = meta.name, rid = %rid, error = %e, "skipping attribute during discovery");
                        continue;
                    }
                };

                for attr in &attrs {
                    for found in referenced_ids(meta, &attr.value)? {
                        if found != self.rid && self.discovered.insert(found) {
                            pending.push(found);
                        }
                    }
                }
            }
        }

        info_log!(
            "LaiLinecard",
            rid = %self.rid,
            discovered = self.discovered.len(),
            "discovered default objects"
        );
        Ok(())
    }

    pub fn vid(&self) -> LaiObjectId {
        self.vid
    }

    pub fn rid(&self) -> LaiObjectId {
        self.rid
    }

    /// True for objects the card reported before this process created any.
    pub fn is_discovered_rid(&self, rid: LaiObjectId) -> bool {
        self.discovered.contains(&rid)
    }

    pub fn discovered_rids(&self) -> impl Iterator<Item = LaiObjectId> + '_ {
        self.discovered.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sonic_lai::metadata::linecard_attr;
    use sonic_lai::{LaiAttribute, LaiAttributeValue, LaiObjectType, StaticLaiMetadata};
    use sonic_lai_vs::{LinecardConfig, LinecardConfigContainer, VirtualLai};
    use std::sync::Arc;

    #[test]
    fn test_discovers_default_ports() {
        let mut config = LinecardConfig::new("P230C", 2);
        config.default_ports = 3;
        let configs: LinecardConfigContainer = [config].into_iter().collect();
        let vs = VirtualLai::new(0, Arc::new(configs), Arc::new(StaticLaiMetadata)).unwrap();

        let rid = vs
            .create(
                LaiObjectType::Linecard,
                LaiObjectId::NULL,
                &[
                    LaiAttribute::new(
                        linecard_attr::LINECARD_TYPE,
                        LaiAttributeValue::Chardata("P230C".into()),
                    ),
                    LaiAttribute::new(
                        linecard_attr::HARDWARE_INFO,
                        LaiAttributeValue::Chardata("P230C".into()),
                    ),
                ],
            )
            .unwrap();

        let vid = LaiObjectId::from_raw(0x1000000000001);
        let linecard = LaiLinecard::new(vid, rid, &vs, &StaticLaiMetadata).unwrap();

        assert_eq!(linecard.vid(), vid);
        assert_eq!(linecard.rid(), rid);
        let discovered: Vec<_> = linecard.discovered_rids().collect();
        assert_eq!(discovered, vs.object_ids(LaiObjectType::Port));
        assert!(linecard.is_discovered_rid(discovered[0]));
        assert!(!linecard.is_discovered_rid(rid));
    }
}
