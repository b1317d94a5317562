//! Hard reinit: rebuild the VID/RID translation for one line card.
//!
//! A pass runs start to finish on the calling thread:
//!
//! 1. classify persisted records (at most one line card)
//! 2. create the line card with its creation attributes, discover its
//!    default objects, open the pre-configuration window and converge the
//!    board mode
//! 3. materialize every other object, resolving creation-time references
//!    first; an object is matched instead of created when its previous RID is
//!    one the card discovered on its own
//! 4. apply every deferred attribute once all objects exist
//! 5. close the pre-configuration window and run post-remove actions
//! 6. require every previously translated VID to be translated again
//!
//! Objects created before a fatal error stay on the device.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use sonic_lai::metadata::linecard_attr;
use sonic_lai::oid;
use sonic_lai::serialize::serialize_attr_value;
use sonic_lai::{
    LaiApi, LaiAttribute, LaiAttributeValue, LaiMetadata, LaiObjectId, LaiObjectType,
};

use crate::asic_state::{read_records, AsicStateReader, PersistedObjectRecord};
use crate::attr_refs::{attr_metadata_for, referenced_ids, rewrite_attrs};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::board_mode::{BoardModeOutcome, BoardModePoller};
use crate::config::BoardModeConfig;
use crate::error::{Result, SyncdError};
use crate::linecard::LaiLinecard;
use crate::notifications::NotificationHandler;
use crate::translation::TranslationMap;
use crate::{audit_log, debug_log, error_log, info_log, warn_log};

const SOURCE: &str = "SingleReiniter";

type OidMap = BTreeMap<LaiObjectId, LaiObjectId>;

/// Create and set counters for one object type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectTypeStats {
    pub creates: u64,
    pub create_time: Duration,
    pub sets: u64,
    pub set_time: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ReinitStats {
    pub per_type: BTreeMap<LaiObjectType, ObjectTypeStats>,
    /// Objects bound to a discovered RID instead of being created.
    pub matched: u64,
    /// Deferred sets the device rejected.
    pub set_failures: u64,
    /// Create-only attributes dropped while matching.
    pub skipped_create_only: u64,
    pub board_mode: Option<BoardModeOutcome>,
}

impl ReinitStats {
    fn record_create(&mut self, object_type: LaiObjectType, elapsed: Duration) {
        let entry = self.per_type.entry(object_type).or_default();
        entry.creates += 1;
        entry.create_time += elapsed;
    }

    fn record_set(&mut self, object_type: LaiObjectType, elapsed: Duration) {
        let entry = self.per_type.entry(object_type).or_default();
        entry.sets += 1;
        entry.set_time += elapsed;
    }

    pub fn creates(&self, object_type: LaiObjectType) -> u64 {
        self.per_type.get(&object_type).map_or(0, |s| s.creates)
    }

    pub fn sets(&self, object_type: LaiObjectType) -> u64 {
        self.per_type.get(&object_type).map_or(0, |s| s.sets)
    }

    pub fn total_creates(&self) -> u64 {
        self.per_type.values().map(|s| s.creates).sum()
    }

    pub fn total_sets(&self) -> u64 {
        self.per_type.values().map(|s| s.sets).sum()
    }

    fn log(&self) {
        let mut total_create = Duration::ZERO;
        let mut total_set = Duration::ZERO;

        for (object_type, stats) in &self.per_type {
            info_log!(
                SOURCE,
                object_type = %object_type,
                creates = stats.creates,
                create_ms = stats.create_time.as_secs_f64() * 1000.0,
                sets = stats.sets,
                set_ms = stats.set_time.as_secs_f64() * 1000.0,
                "per-type timing"
            );
            total_create += stats.create_time;
            total_set += stats.set_time;
        }

        info_log!(
            SOURCE,
            create_ms = total_create.as_secs_f64() * 1000.0,
            set_ms = total_set.as_secs_f64() * 1000.0,
            matched = self.matched,
            set_failures = self.set_failures,
            skipped_create_only = self.skipped_create_only,
            "hard reinit totals"
        );
    }
}

/// Outcome of a successful pass.
#[derive(Debug)]
pub struct ReinitResult {
    pub translated: TranslationMap,
    /// `None` only for an empty snapshot.
    pub linecard: Option<LaiLinecard>,
    pub stats: ReinitStats,
}

/// What post-remove actions get to see.
#[derive(Debug)]
pub struct PostRemoveContext<'a> {
    pub linecard: &'a LaiLinecard,
    pub previous_vid_to_rid: &'a OidMap,
    pub previous_rid_to_vid: &'a OidMap,
    pub translated: &'a TranslationMap,
}

/// Hook that removes objects the new snapshot no longer contains.
pub trait PostRemoveActions: Send + Sync {
    fn post_remove(&self, api: &dyn LaiApi, ctx: &PostRemoveContext<'_>) -> Result<()>;
}

pub struct SingleReiniter {
    api: Arc<dyn LaiApi>,
    metadata: Arc<dyn LaiMetadata>,
    notifications: Arc<NotificationHandler>,
    board_mode: BoardModePoller,
    post_remove: Option<Arc<dyn PostRemoveActions>>,
}

impl SingleReiniter {
    pub fn new(
        api: Arc<dyn LaiApi>,
        metadata: Arc<dyn LaiMetadata>,
        notifications: Arc<NotificationHandler>,
    ) -> Self {
        Self {
            api,
            metadata,
            notifications,
            board_mode: BoardModePoller::from_config(&BoardModeConfig::default()),
            post_remove: None,
        }
    }

    pub fn with_board_mode_poller(mut self, poller: BoardModePoller) -> Self {
        self.board_mode = poller;
        self
    }

    pub fn with_post_remove_actions(mut self, actions: Arc<dyn PostRemoveActions>) -> Self {
        self.post_remove = Some(actions);
        self
    }

    /// Reads the persisted state and runs a pass over it.
    pub fn hard_reinit(&self, reader: &dyn AsicStateReader) -> Result<ReinitResult> {
        let records = read_records(reader, self.metadata.as_ref())?;
        let vid_to_rid = reader.vid_to_rid_map()?;
        let rid_to_vid = reader.rid_to_vid_map()?;
        self.run(records, &vid_to_rid, &rid_to_vid)
    }

    /// Runs one pass over already parsed records.
    pub fn run(
        &self,
        records: Vec<PersistedObjectRecord>,
        previous_vid_to_rid: &OidMap,
        previous_rid_to_vid: &OidMap,
    ) -> Result<ReinitResult> {
        let correlation_id = format!("hard-reinit-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let started = Instant::now();

        let result = self.run_pass(
            records,
            previous_vid_to_rid,
            previous_rid_to_vid,
            &correlation_id,
        );

        match &result {
            Ok(done) => {
                let mut record =
                    AuditRecord::new(AuditCategory::HardReinit, "hard_reinit", correlation_id.as_str())
                        .with_outcome(AuditOutcome::Success);
                if let Some(linecard) = &done.linecard {
                    record = record.with_object(
                        LaiObjectType::Linecard,
                        Some(linecard.vid()),
                        Some(linecard.rid()),
                    );
                }
                audit_log!(record.with_details(serde_json::json!({
                    "translated": done.translated.len(),
                    "creates": done.stats.total_creates(),
                    "sets": done.stats.total_sets(),
                    "matched": done.stats.matched,
                    "elapsed_ms": started.elapsed().as_millis() as u64,
                })));
            }
            Err(e) => {
                error_log!(SOURCE, error = %e, "hard reinit aborted");
                let mut record =
                    AuditRecord::new(AuditCategory::ErrorCondition, "hard_reinit", correlation_id.as_str());
                if let Some((object_type, vid)) = e.failed_object() {
                    record = record.with_object(object_type, Some(vid), None);
                }
                audit_log!(record.with_error(e.to_string()));
            }
        }

        result
    }

    fn run_pass(
        &self,
        records: Vec<PersistedObjectRecord>,
        previous_vid_to_rid: &OidMap,
        previous_rid_to_vid: &OidMap,
        correlation_id: &str,
    ) -> Result<ReinitResult> {
        let mut linecards = Vec::new();
        let mut objects = BTreeMap::new();
        for record in records {
            let non_object_id = self
                .metadata
                .object_type_info(record.object_type)
                .map_or(false, |info| info.is_non_object_id);
            if non_object_id {
                return Err(SyncdError::NonObjectIdRecord {
                    object_type: record.object_type,
                    vid: record.vid,
                });
            }
            if record.object_type == LaiObjectType::Linecard {
                linecards.push(record);
            } else {
                objects.insert(record.vid, record);
            }
        }

        if linecards.len() > 1 {
            return Err(SyncdError::MultipleLinecards {
                count: linecards.len(),
            });
        }

        let Some(linecard_record) = linecards.pop() else {
            if objects.is_empty() {
                info_log!(SOURCE, "empty ASIC state, nothing to reinit");
                return Ok(ReinitResult {
                    translated: TranslationMap::new(),
                    linecard: None,
                    stats: ReinitStats::default(),
                });
            }
            return Err(SyncdError::MissingLinecard {
                objects: objects.len(),
            });
        };

        if linecard_record.vid.is_null() {
            return Err(SyncdError::NullLinecardVid);
        }

        audit_log!(AuditRecord::new(AuditCategory::HardReinit, "hard_reinit", correlation_id)
            .with_object(LaiObjectType::Linecard, Some(linecard_record.vid), None)
            .with_details(serde_json::json!({
                "objects": objects.len() + 1,
                "previous_translations": previous_vid_to_rid.len(),
            })));

        let mut stats = ReinitStats::default();
        let (linecard, linecard_deferred) =
            self.process_linecard(linecard_record, &mut stats, correlation_id)?;

        let mut pass = Pass::new(self, objects, previous_vid_to_rid, linecard, stats)?;
        pass.deferred.push(linecard_deferred);

        pass.process_oids()?;
        pass.apply_deferred()?;

        self.set_pre_configuration(
            &pass.linecard,
            linecard_attr::STOP_PRE_CONFIGURATION,
            "stop",
            correlation_id,
        )?;

        if let Some(actions) = &self.post_remove {
            actions.post_remove(
                self.api.as_ref(),
                &PostRemoveContext {
                    linecard: &pass.linecard,
                    previous_vid_to_rid,
                    previous_rid_to_vid,
                    translated: &pass.translated,
                },
            )?;
        }

        check_all_ids(previous_vid_to_rid, &pass.translated)?;

        pass.stats.log();
        Ok(ReinitResult {
            translated: pass.translated,
            linecard: Some(pass.linecard),
            stats: pass.stats,
        })
    }

    /// Creates the line card and returns it with its deferred attributes.
    fn process_linecard(
        &self,
        record: PersistedObjectRecord,
        stats: &mut ReinitStats,
        correlation_id: &str,
    ) -> Result<(LaiLinecard, DeferredSets)> {
        let vid = record.vid;
        let mut attrs = record.attrs;
        self.notifications.update_notifications_pointers(
            self.metadata.as_ref(),
            LaiObjectType::Linecard,
            &mut attrs,
        )?;

        let mut create_attrs = Vec::new();
        let mut deferred = Vec::new();
        let mut board_mode = None;

        for attr in attrs {
            let meta = attr_metadata_for(self.metadata.as_ref(), LaiObjectType::Linecard, &attr)?;
            if meta.is_creation_required() {
                create_attrs.push(attr);
            } else if attr.id == linecard_attr::BOARD_MODE {
                board_mode = attr.value.as_s32();
            } else {
                deferred.push(attr);
            }
        }

        info_log!(SOURCE, vid = %vid, "creating linecard");

        let rid = self.create_object(
            LaiObjectType::Linecard,
            vid,
            LaiObjectId::NULL,
            &create_attrs,
            stats,
        )?;

        info_log!(SOURCE, vid = %vid, rid = %rid, "created linecard");
        audit_log!(AuditRecord::new(AuditCategory::ResourceCreate, "create_linecard", correlation_id)
            .with_outcome(AuditOutcome::Success)
            .with_object(LaiObjectType::Linecard, Some(vid), Some(rid)));

        let linecard = LaiLinecard::new(vid, rid, self.api.as_ref(), self.metadata.as_ref())?;

        self.set_pre_configuration(
            &linecard,
            linecard_attr::START_PRE_CONFIGURATION,
            "start",
            correlation_id,
        )?;

        if let Some(mode) = board_mode {
            stats.board_mode = Some(self.board_mode.converge(self.api.as_ref(), rid, mode));
        }

        Ok((
            linecard,
            DeferredSets {
                object_type: LaiObjectType::Linecard,
                vid,
                rid,
                attrs: deferred,
            },
        ))
    }

    fn set_pre_configuration(
        &self,
        linecard: &LaiLinecard,
        attr_id: i32,
        action: &'static str,
        correlation_id: &str,
    ) -> Result<()> {
        let rid = linecard.rid();
        let attr = LaiAttribute::new(attr_id, LaiAttributeValue::Bool(true));
        self.api
            .set(LaiObjectType::Linecard, rid, &attr)
            .map_err(|source| SyncdError::PreConfiguration {
                action,
                rid,
                source,
            })?;

        info_log!(SOURCE, rid = %rid, action, "pre-configuration");
        audit_log!(AuditRecord::new(
            AuditCategory::LaiOperation,
            format!("{}_pre_configuration", action),
            correlation_id,
        )
        .with_outcome(AuditOutcome::Success)
        .with_object(LaiObjectType::Linecard, Some(linecard.vid()), Some(rid)));
        Ok(())
    }

    fn create_object(
        &self,
        object_type: LaiObjectType,
        vid: LaiObjectId,
        linecard_rid: LaiObjectId,
        attrs: &[LaiAttribute],
        stats: &mut ReinitStats,
    ) -> Result<LaiObjectId> {
        let started = Instant::now();
        let result = self.api.create(object_type, linecard_rid, attrs);
        stats.record_create(object_type, started.elapsed());

        match result {
            Ok(rid) => {
                debug_log!(SOURCE, object_type = %object_type, vid = %vid, rid = %rid, "created");
                Ok(rid)
            }
            Err(source) => {
                self.list_failed_attributes(object_type, attrs);
                Err(SyncdError::CreateFailed {
                    object_type,
                    vid,
                    source,
                })
            }
        }
    }

    fn list_failed_attributes(&self, object_type: LaiObjectType, attrs: &[LaiAttribute]) {
        for attr in attrs {
            match self.metadata.attr_metadata(object_type, attr.id) {
                Some(meta) => {
                    error_log!(SOURCE, "{} = {}", meta.name, serialize_attr_value(meta, &attr.value));
                }
                None => {
                    error_log!(SOURCE, "attribute {} = {:?}", attr.id, attr.value);
                }
            }
        }
    }
}

/// Attributes applied after every object is materialized.
#[derive(Debug)]
struct DeferredSets {
    object_type: LaiObjectType,
    vid: LaiObjectId,
    rid: LaiObjectId,
    attrs: Vec<LaiAttribute>,
}

#[derive(Debug, Clone, Copy)]
enum Resolution {
    InProgress,
    Resolved(LaiObjectId),
}

/// Per-pass state for everything below the line card.
struct Pass<'r> {
    reiniter: &'r SingleReiniter,
    objects: BTreeMap<LaiObjectId, PersistedObjectRecord>,
    previous_vid_to_rid: &'r OidMap,
    linecard: LaiLinecard,
    memo: HashMap<LaiObjectId, Resolution>,
    translated: TranslationMap,
    deferred: Vec<DeferredSets>,
    stats: ReinitStats,
}

impl<'r> Pass<'r> {
    fn new(
        reiniter: &'r SingleReiniter,
        objects: BTreeMap<LaiObjectId, PersistedObjectRecord>,
        previous_vid_to_rid: &'r OidMap,
        linecard: LaiLinecard,
        stats: ReinitStats,
    ) -> Result<Self> {
        let mut translated = TranslationMap::new();
        translated.insert(linecard.vid(), linecard.rid())?;

        let mut memo = HashMap::with_capacity(objects.len() + 1);
        memo.insert(linecard.vid(), Resolution::Resolved(linecard.rid()));

        Ok(Self {
            reiniter,
            objects,
            previous_vid_to_rid,
            linecard,
            memo,
            translated,
            deferred: Vec::new(),
            stats,
        })
    }

    fn metadata(&self) -> &'r dyn LaiMetadata {
        let reiniter: &'r SingleReiniter = self.reiniter;
        reiniter.metadata.as_ref()
    }

    fn process_oids(&mut self) -> Result<()> {
        let vids: Vec<LaiObjectId> = self.objects.keys().copied().collect();
        for vid in vids {
            self.resolve(vid)?;
        }
        Ok(())
    }

    /// Materializes `root` after everything its creation depends on.
    fn resolve(&mut self, root: LaiObjectId) -> Result<LaiObjectId> {
        let mut stack = vec![root];

        while let Some(&vid) = stack.last() {
            match self.memo.get(&vid).copied() {
                Some(Resolution::Resolved(_)) => {
                    stack.pop();
                }
                Some(Resolution::InProgress) => {
                    self.materialize(vid)?;
                    stack.pop();
                }
                None => {
                    self.memo.insert(vid, Resolution::InProgress);

                    let mut waiting = false;
                    for dep in self.creation_dependencies(vid)? {
                        match self.memo.get(&dep) {
                            Some(Resolution::Resolved(_)) => {}
                            Some(Resolution::InProgress) => {
                                return Err(SyncdError::CyclicDependency { vid: dep });
                            }
                            None => {
                                stack.push(dep);
                                waiting = true;
                            }
                        }
                    }

                    if !waiting {
                        self.materialize(vid)?;
                        stack.pop();
                    }
                }
            }
        }

        self.resolved_rid(root)
    }

    fn resolved_rid(&self, vid: LaiObjectId) -> Result<LaiObjectId> {
        match self.memo.get(&vid) {
            Some(Resolution::Resolved(rid)) => Ok(*rid),
            _ => Err(SyncdError::VidNotFound { vid }),
        }
    }

    /// VIDs referenced by the creation-required attributes of `vid`.
    fn creation_dependencies(&self, vid: LaiObjectId) -> Result<Vec<LaiObjectId>> {
        let record = self
            .objects
            .get(&vid)
            .ok_or(SyncdError::VidNotFound { vid })?;

        let mut deps = Vec::new();
        for attr in &record.attrs {
            let meta = attr_metadata_for(self.metadata(), record.object_type, attr)?;
            if meta.is_creation_required() {
                deps.extend(referenced_ids(meta, &attr.value)?);
            }
        }
        Ok(deps)
    }

    fn materialize(&mut self, vid: LaiObjectId) -> Result<()> {
        let record = self
            .objects
            .get(&vid)
            .ok_or(SyncdError::VidNotFound { vid })?;
        let object_type = record.object_type;
        let mut attrs = record.attrs.clone();

        let metadata = self.metadata();
        self.reiniter
            .notifications
            .update_notifications_pointers(metadata, object_type, &mut attrs)?;

        let discovered_rid = self
            .previous_vid_to_rid
            .get(&vid)
            .copied()
            .filter(|rid| self.linecard.is_discovered_rid(*rid));

        let (rid, deferred) = match discovered_rid {
            Some(rid) => {
                let mut deferred = Vec::with_capacity(attrs.len());
                for attr in attrs {
                    let meta = attr_metadata_for(metadata, object_type, &attr)?;
                    if meta.is_create_only() {
                        warn_log!(
                            SOURCE,
                            attr = meta.name,
                            vid = %vid,
                            rid = %rid,
                            "skipping create only attribute on discovered object"
                        );
                        self.stats.skipped_create_only += 1;
                    } else {
                        deferred.push(attr);
                    }
                }
                self.stats.matched += 1;
                debug_log!(SOURCE, object_type = %object_type, vid = %vid, rid = %rid, "matched discovered object");
                (rid, deferred)
            }
            None => {
                let mut create_attrs = Vec::new();
                let mut deferred = Vec::new();
                for attr in attrs {
                    let meta = attr_metadata_for(metadata, object_type, &attr)?;
                    if meta.is_creation_required() {
                        create_attrs.push(attr);
                    } else {
                        deferred.push(attr);
                    }
                }

                let memo = &self.memo;
                rewrite_attrs(metadata, object_type, &mut create_attrs, |dep| match memo.get(&dep) {
                    Some(Resolution::Resolved(rid)) => Ok(*rid),
                    _ => Err(SyncdError::VidNotFound { vid: dep }),
                })?;

                let rid = self.reiniter.create_object(
                    object_type,
                    vid,
                    self.linecard.rid(),
                    &create_attrs,
                    &mut self.stats,
                )?;
                (rid, deferred)
            }
        };

        self.translated.insert(vid, rid)?;
        self.memo.insert(vid, Resolution::Resolved(rid));
        self.deferred.push(DeferredSets {
            object_type,
            vid,
            rid,
            attrs: deferred,
        });
        Ok(())
    }

    /// Translates and sets every deferred attribute. Rejected sets are logged.
    fn apply_deferred(&mut self) -> Result<()> {
        let reiniter: &'r SingleReiniter = self.reiniter;
        let api = reiniter.api.as_ref();
        let metadata = self.metadata();

        for mut entry in std::mem::take(&mut self.deferred) {
            let translated = &self.translated;
            rewrite_attrs(metadata, entry.object_type, &mut entry.attrs, |vid| {
                translated.rid(vid).ok_or(SyncdError::VidNotFound { vid })
            })?;

            for attr in &entry.attrs {
                let started = Instant::now();
                let result = api.set(entry.object_type, entry.rid, attr);
                self.stats.record_set(entry.object_type, started.elapsed());

                if let Err(e) = result {
                    let name = metadata
                        .attr_metadata(entry.object_type, attr.id)
                        .map_or("unknown", |meta| meta.name);
                    warn_log!(
                        SOURCE,
                        attr = name,
                        vid = %entry.vid,
                        rid = %entry.rid,
                        error = %e,
                        "failed to set attribute"
                    );
                    self.stats.set_failures += 1;
                }
            }
        }
        Ok(())
    }
}

/// Every VID translated by the previous run must be translated again.
fn check_all_ids(previous_vid_to_rid: &OidMap, translated: &TranslationMap) -> Result<()> {
    let missing: Vec<(LaiObjectId, LaiObjectType)> = previous_vid_to_rid
        .keys()
        .filter(|vid| !translated.contains_vid(**vid))
        .map(|vid| (*vid, oid::object_type_query(*vid)))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    for (vid, object_type) in &missing {
        error_log!(SOURCE, vid = %vid, object_type = %object_type, "vid not translated");
    }
    Err(SyncdError::UntranslatedVids { vids: missing })
}
