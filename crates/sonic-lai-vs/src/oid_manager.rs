//! Real object id allocation.
//!
//! One manager exists per global context. It owns the set of occupied
//! line-card slots and a per-object-type counter that mints object indexes.
//! Counters are monotonic for the manager's lifetime, across all cards, and
//! only [`RealObjectIdManager::clear`] resets them.
//!
//! The manager itself is not synchronized; wrap it in a mutex when several
//! threads allocate.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, error, info};
use sonic_lai::oid::{self, GLOBAL_CONTEXT_MAX, LINECARD_INDEX_MAX, OBJECT_INDEX_MAX};
use sonic_lai::{LaiObjectId, LaiObjectType};

use crate::error::{OidManagerError, Result};
use crate::linecard_config::LinecardConfigContainer;

#[derive(Debug)]
pub struct RealObjectIdManager {
    global_context: u8,
    container: Arc<LinecardConfigContainer>,
    linecard_indexes: BTreeSet<u32>,
    indexer: HashMap<LaiObjectType, u64>,
}

impl RealObjectIdManager {
    pub fn new(global_context: u32, container: Arc<LinecardConfigContainer>) -> Result<Self> {
        if u64::from(global_context) > GLOBAL_CONTEXT_MAX {
            return Err(OidManagerError::InvalidGlobalContext {
                context: global_context,
            });
        }

        Ok(Self {
            global_context: global_context as u8,
            container,
            linecard_indexes: BTreeSet::new(),
            indexer: HashMap::new(),
        })
    }

    pub fn global_context(&self) -> u8 {
        self.global_context
    }

    /// Forgets every slot and counter.
    pub fn clear(&mut self) {
        info!("clearing linecard index set");
        self.linecard_indexes.clear();
        self.indexer.clear();
    }

    pub fn is_linecard_index_allocated(&self, index: u32) -> bool {
        self.linecard_indexes.contains(&index)
    }

    /// Reserves the lowest free slot.
    pub fn allocate_new_linecard_index(&mut self) -> Result<u32> {
        let free = (0..=LINECARD_INDEX_MAX as u32).find(|i| !self.linecard_indexes.contains(i));

        match free {
            Some(index) => {
                self.linecard_indexes.insert(index);
                info!("allocated new linecard index 0x{:x}", index);
                Ok(index)
            }
            None => Err(OidManagerError::LinecardIndexExhausted {
                used: self.linecard_indexes.len(),
            }),
        }
    }

    pub fn release_linecard_index(&mut self, index: u32) -> Result<()> {
        if !self.linecard_indexes.remove(&index) {
            return Err(OidManagerError::LinecardIndexNotAllocated { index });
        }
        debug!("released linecard index 0x{:x}", index);
        Ok(())
    }

    /// Mints a fresh id for a non-card object living on `linecard_id`.
    pub fn allocate_new_object_id(
        &mut self,
        object_type: LaiObjectType,
        linecard_id: LaiObjectId,
    ) -> Result<LaiObjectId> {
        if !object_type.is_valid() {
            return Err(OidManagerError::InvalidObjectType { object_type });
        }

        if object_type == LaiObjectType::Linecard {
            return Err(OidManagerError::LinecardTypeNotAllowed);
        }

        let linecard_type = oid::object_type_query(linecard_id);
        if linecard_type != LaiObjectType::Linecard {
            return Err(OidManagerError::NotALinecard {
                id: linecard_id,
                object_type: linecard_type,
            });
        }

        let counter = self.indexer.entry(object_type).or_insert(0);
        let object_index = *counter;
        *counter += 1;

        if object_index > OBJECT_INDEX_MAX {
            return Err(OidManagerError::ObjectIndexExhausted {
                object_type,
                index: object_index,
            });
        }

        let object_id = oid::encode(
            object_type,
            oid::decode_linecard_index(linecard_id),
            object_index as u32,
            self.global_context,
        );

        debug!(rid = %object_id, "created RID");
        Ok(object_id)
    }

    /// Returns the id of the card described by `hardware_info`.
    ///
    /// Unconfigured hardware yields the null id rather than an error.
    pub fn allocate_new_linecard_object_id(&mut self, hardware_info: &str) -> Result<LaiObjectId> {
        let Some(config) = self.container.get_config(hardware_info) else {
            error!("no linecard config for hardware info: '{}'", hardware_info);
            return Ok(LaiObjectId::NULL);
        };

        let linecard_index = config.linecard_index;
        if u64::from(linecard_index) > LINECARD_INDEX_MAX {
            return Err(OidManagerError::LinecardIndexOutOfRange {
                index: linecard_index,
            });
        }

        self.linecard_indexes.insert(linecard_index);

        let object_id = oid::encode_linecard(linecard_index as u8, self.global_context);

        info!(
            "created LINECARD RID {} for hwinfo: '{}'",
            object_id, hardware_info
        );
        Ok(object_id)
    }

    /// Releases the slot held by a card id; other ids hold nothing.
    pub fn release_object_id(&mut self, object_id: LaiObjectId) -> Result<()> {
        if oid::object_type_query(object_id) == LaiObjectType::Linecard {
            self.release_linecard_index(u32::from(oid::decode_linecard_index(object_id)))?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn set_next_object_index(&mut self, object_type: LaiObjectType, index: u64) {
        self.indexer.insert(object_type, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linecard_config::LinecardConfig;

    fn manager(global_context: u32) -> RealObjectIdManager {
        let container: LinecardConfigContainer = [
            LinecardConfig::new("P230C", 1),
            LinecardConfig::new("E110C", 7),
            LinecardConfig::new("BAD", 256),
        ]
        .into_iter()
        .collect();
        RealObjectIdManager::new(global_context, Arc::new(container)).unwrap()
    }

    #[test]
    fn test_rejects_large_global_context() {
        let container = Arc::new(LinecardConfigContainer::new());
        assert!(RealObjectIdManager::new(0xff, container.clone()).is_ok());
        assert_eq!(
            RealObjectIdManager::new(0x100, container).unwrap_err(),
            OidManagerError::InvalidGlobalContext { context: 0x100 }
        );
    }

    #[test]
    fn test_linecard_id_from_config() {
        let mut mgr = manager(3);
        let lc = mgr.allocate_new_linecard_object_id("E110C").unwrap();
        assert_eq!(oid::object_type_query(lc), LaiObjectType::Linecard);
        assert_eq!(oid::decode_linecard_index(lc), 7);
        assert_eq!(oid::decode_object_index(lc), 7);
        assert_eq!(oid::decode_global_context(lc), 3);
        assert!(mgr.is_linecard_index_allocated(7));
    }

    #[test]
    fn test_unconfigured_hardware_is_null() {
        let mut mgr = manager(0);
        assert_eq!(
            mgr.allocate_new_linecard_object_id("unknown").unwrap(),
            LaiObjectId::NULL
        );
    }

    #[test]
    fn test_linecard_index_out_of_range() {
        let mut mgr = manager(0);
        assert_eq!(
            mgr.allocate_new_linecard_object_id("BAD").unwrap_err(),
            OidManagerError::LinecardIndexOutOfRange { index: 256 }
        );
    }

    #[test]
    fn test_object_ids_are_monotonic_across_cards() {
        let mut mgr = manager(0);
        let lc1 = mgr.allocate_new_linecard_object_id("P230C").unwrap();
        let lc7 = mgr.allocate_new_linecard_object_id("E110C").unwrap();

        let a = mgr.allocate_new_object_id(LaiObjectType::Port, lc1).unwrap();
        let b = mgr.allocate_new_object_id(LaiObjectType::Port, lc7).unwrap();
        let c = mgr.allocate_new_object_id(LaiObjectType::Port, lc1).unwrap();
        let other = mgr.allocate_new_object_id(LaiObjectType::Och, lc1).unwrap();

        assert_eq!(oid::decode_object_index(a), 0);
        assert_eq!(oid::decode_object_index(b), 1);
        assert_eq!(oid::decode_object_index(c), 2);
        assert_eq!(oid::decode_object_index(other), 0);
        assert_eq!(oid::decode_linecard_index(b), 7);
        assert_eq!(oid::linecard_id_query(c).unwrap(), lc1);
    }

    #[test]
    fn test_allocate_object_id_preconditions() {
        let mut mgr = manager(0);
        let lc = mgr.allocate_new_linecard_object_id("P230C").unwrap();
        let port = mgr.allocate_new_object_id(LaiObjectType::Port, lc).unwrap();

        assert_eq!(
            mgr.allocate_new_object_id(LaiObjectType::Null, lc).unwrap_err(),
            OidManagerError::InvalidObjectType {
                object_type: LaiObjectType::Null
            }
        );
        assert_eq!(
            mgr.allocate_new_object_id(LaiObjectType::Linecard, lc)
                .unwrap_err(),
            OidManagerError::LinecardTypeNotAllowed
        );
        assert!(matches!(
            mgr.allocate_new_object_id(LaiObjectType::Port, port),
            Err(OidManagerError::NotALinecard { .. })
        ));
    }

    #[test]
    fn test_object_index_exhaustion() {
        let mut mgr = manager(0);
        let lc = mgr.allocate_new_linecard_object_id("P230C").unwrap();

        mgr.set_next_object_index(LaiObjectType::Oa, OBJECT_INDEX_MAX);
        let last = mgr.allocate_new_object_id(LaiObjectType::Oa, lc).unwrap();
        assert_eq!(oid::decode_object_index(last), u32::MAX);

        let err = mgr.allocate_new_object_id(LaiObjectType::Oa, lc).unwrap_err();
        assert!(err.is_exhaustion());
    }

    #[test]
    fn test_linecard_index_first_fit_and_release() {
        let mut mgr = manager(0);
        assert_eq!(mgr.allocate_new_linecard_index().unwrap(), 0);
        assert_eq!(mgr.allocate_new_linecard_index().unwrap(), 1);
        assert_eq!(mgr.allocate_new_linecard_index().unwrap(), 2);

        mgr.release_linecard_index(1).unwrap();
        assert_eq!(mgr.allocate_new_linecard_index().unwrap(), 1);
        assert_eq!(mgr.allocate_new_linecard_index().unwrap(), 3);

        assert_eq!(
            mgr.release_linecard_index(200).unwrap_err(),
            OidManagerError::LinecardIndexNotAllocated { index: 200 }
        );
    }

    #[test]
    fn test_linecard_index_exhaustion() {
        let mut mgr = manager(0);
        for expected in 0..=255 {
            assert_eq!(mgr.allocate_new_linecard_index().unwrap(), expected);
        }
        let err = mgr.allocate_new_linecard_index().unwrap_err();
        assert_eq!(err, OidManagerError::LinecardIndexExhausted { used: 256 });
    }

    #[test]
    fn test_release_linecard_object_id() {
        let mut mgr = manager(0);
        let lc = mgr.allocate_new_linecard_object_id("P230C").unwrap();
        let port = mgr.allocate_new_object_id(LaiObjectType::Port, lc).unwrap();

        mgr.release_object_id(port).unwrap();
        assert!(mgr.is_linecard_index_allocated(1));

        mgr.release_object_id(lc).unwrap();
        assert!(!mgr.is_linecard_index_allocated(1));
        assert!(mgr.release_object_id(lc).is_err());
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut mgr = manager(0);
        let lc = mgr.allocate_new_linecard_object_id("P230C").unwrap();
        mgr.allocate_new_object_id(LaiObjectType::Port, lc).unwrap();

        mgr.clear();
        assert!(!mgr.is_linecard_index_allocated(1));

        let lc = mgr.allocate_new_linecard_object_id("P230C").unwrap();
        let port = mgr.allocate_new_object_id(LaiObjectType::Port, lc).unwrap();
        assert_eq!(oid::decode_object_index(port), 0);
    }
}
