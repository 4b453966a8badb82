//! The mapping operation.
//!
//! Orchestrates one mapping run against a repository: precondition checks,
//! lazy iteration over the source subtrees, batched writes of the derived
//! features, the short-circuits, and the commit + log append. The derived
//! state is published the same way as any import — new trees first, a
//! single `WORK_HEAD` repoint last — so a failed run never leaves partial
//! state behind the pointers.

use strata_repo::Repository;
use strata_store::{EntryKind, Feature, ObjectStore, RevTree};
use strata_tree::{find_path, FeatureIterator};
use strata_types::ObjectId;
use tracing::{info, warn};

use crate::error::{MappingError, MappingResult};
use crate::flusher::FeatureFlusher;
use crate::log::{MappingLog, MappingLogEntry};
use crate::report::MappingReport;

/// How often (in processed source features) the progress callback fires.
const PROGRESS_INTERVAL: u64 = 1_000;

/// One derived feature produced by a transform.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedFeature {
    /// Destination subtree path (e.g. `"mapped/cafes"`).
    pub path: String,
    /// Entry name under the destination path.
    pub name: String,
    /// The derived feature.
    pub feature: Feature,
}

/// A caller-supplied transform from source features to derived features.
///
/// Implementations must be deterministic: the same source feature must
/// always produce the same derived features, or the idempotence
/// short-circuits break down.
pub trait Mapping: Send + Sync {
    /// Stable identifier of this mapping definition (typically the content
    /// hash of its serialized rules).
    fn id(&self) -> ObjectId;

    /// Source subtree paths this mapping reads (e.g. `["node", "way"]`).
    fn source_paths(&self) -> Vec<String>;

    /// Transform one source feature into zero or more derived features.
    fn map(&self, name: &str, feature: &Feature) -> Vec<MappedFeature>;
}

/// What a mapping run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapOutcome {
    /// The mapping log shows this mapping already applied to the current
    /// tree; nothing was read or written.
    AlreadyApplied,
    /// The transform ran but produced a tree identical to the current
    /// one; no commit was created and no log entry appended.
    Unchanged,
    /// Derived data was committed.
    Committed {
        commit: ObjectId,
        new_tree: ObjectId,
    },
}

/// A configured mapping run.
pub struct MapOp<'a> {
    repo: &'a Repository,
    mapping: &'a dyn Mapping,
    log: &'a dyn MappingLog,
    message: Option<String>,
    author: String,
    progress: Option<Box<dyn Fn(&MappingReport) + 'a>>,
}

impl<'a> MapOp<'a> {
    pub fn new(repo: &'a Repository, mapping: &'a dyn Mapping, log: &'a dyn MappingLog) -> Self {
        Self {
            repo,
            mapping,
            log,
            message: None,
            author: "strata-mapping".to_string(),
            progress: None,
        }
    }

    /// Message for the commit this run creates.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Author for the commit this run creates.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Callback invoked with the running counters every
    /// thousand processed features.
    pub fn progress(mut self, callback: impl Fn(&MappingReport) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Run the mapping.
    pub fn run(self) -> MappingResult<(MapOutcome, MappingReport)> {
        // Pure guards first: nothing below may write before these pass.
        let head_tree = self.repo.head_tree_id()?;
        let staged = self.repo.staging().count_staged(&head_tree)?;
        let unstaged = self.repo.work_tree().count_unstaged()?;
        if staged != 0 || unstaged != 0 {
            return Err(MappingError::DirtyWorkTree { staged, unstaged });
        }

        let mapping_id = self.mapping.id();
        let old_tree_id = self.repo.work_tree().tree_id()?;

        if let Some(latest) = self.log.latest_for(&mapping_id)? {
            if latest.mapped_tree == old_tree_id {
                info!(mapping = %mapping_id.short_hex(), "mapping already applied, skipping");
                return Ok((MapOutcome::AlreadyApplied, MappingReport::new()));
            }
        }

        // Snapshot the source root; the flusher's writes move WORK_HEAD
        // while the old nodes stay immutable under us.
        let old_root = self.repo.work_tree().tree()?;
        let mut report = MappingReport::new();
        let mut flusher = FeatureFlusher::new(self.repo.work_tree());

        for source in self.mapping.source_paths() {
            self.map_source(&old_root, &source, &mut flusher, &mut report)?;
        }
        flusher.flush_all()?;

        let new_tree_id = self.repo.work_tree().tree_id()?;
        if new_tree_id == old_tree_id {
            // The mapping regenerated exactly what already exists.
            return Ok((MapOutcome::Unchanged, report));
        }

        self.repo.staging().add()?;
        let message = self
            .message
            .unwrap_or_else(|| format!("apply mapping {}", mapping_id.short_hex()));
        let (commit, _) = self.repo.commit(&self.author, &message)?;
        self.log.append(MappingLogEntry {
            source_tree: old_tree_id,
            mapped_tree: new_tree_id,
            mapping: mapping_id,
        })?;

        info!(
            mapping = %mapping_id.short_hex(),
            commit = %commit.short_hex(),
            processed = report.processed,
            produced = report.produced,
            "mapping committed"
        );
        Ok((
            MapOutcome::Committed {
                commit,
                new_tree: new_tree_id,
            },
            report,
        ))
    }

    fn map_source(
        &self,
        old_root: &RevTree,
        source: &str,
        flusher: &mut FeatureFlusher<'_>,
        report: &mut MappingReport,
    ) -> MappingResult<()> {
        let store = self.repo.store().as_ref();
        let Some(entry) = find_path(store, old_root, source)? else {
            return Ok(());
        };
        if entry.kind != EntryKind::Tree {
            warn!(source, "mapping source is not a subtree, skipping");
            return Ok(());
        }

        let stored = store.get(&entry.target)?;
        let subtree = RevTree::from_stored_object(&stored)?;
        for item in FeatureIterator::over(store, subtree) {
            let (name, feature_entry) = item?;
            let stored = store.get(&feature_entry.target)?;
            let feature = Feature::from_stored_object(&stored)?;

            let mapped = self.mapping.map(&name, &feature);
            report.record(source, mapped.len());
            for derived in mapped {
                flusher.put(derived)?;
            }

            if report.processed % PROGRESS_INTERVAL == 0 {
                if let Some(callback) = &self.progress {
                    callback(report);
                }
            }
        }
        Ok(())
    }
}
