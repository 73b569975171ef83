//! Composed pack operations against one server and world.
//!
//! This module orchestrates the install workflow:
//! 1. Stage the source (extract an archive or copy a folder into scratch)
//! 2. Discover pack roots in the staged tree
//! 3. Resolve each pack's identity, repairing manifests in scratch
//! 4. Promote new packs into the managed pack directories
//! 5. Activate everything that is present, one write per pack type
//! 6. Write the report and release the scratch area

use std::fmt;
use std::path::{Path, PathBuf};

use super::confirm::Confirmation;
use super::install::{copy_tree, promote, InstallBatch, InstallFailure};
use super::report::write_report;
use super::session::SelectionIntent;
use crate::archive::{
    discover_packs, folder_name, ArchiveExtractor, ArchiveFormat, ScratchArea, SpaceProbe,
    StagedPack, ZipExtractor,
};
use crate::environment::ServerContext;
use crate::error::{ErrorKind, ManagerError, ManagerResult};
use crate::inventory::{CombinedView, PackInventory};
use crate::manifest::resolve_as;
use crate::pack::{is_system_pack, unique_folder, InstalledPack, PackType};
use crate::registry::{ActivationRef, ApplyOutcome, BatchApply, WorldRegistry};

/// Progress callback for install operations.
///
/// # Arguments
///
/// * `stage` - Current install stage
/// * `message` - Human-readable detail, usually a pack or file name
pub type InstallProgressCallback = Box<dyn Fn(InstallStage, &str) + Send + Sync>;

/// Install stages for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Unpacking an archive into scratch.
    Extracting,
    /// Copying a source folder into scratch.
    Staging,
    /// Reading or synthesizing a manifest.
    Resolving,
    /// Copying a pack into its pack directory.
    Installing,
    /// Updating the world's activation lists.
    Activating,
    /// Writing the report.
    Reporting,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extracting => "Extracting",
            Self::Staging => "Staging",
            Self::Resolving => "Resolving",
            Self::Installing => "Installing",
            Self::Activating => "Activating",
            Self::Reporting => "Writing report",
        }
    }
}

/// A pack that could not be deleted.
#[derive(Debug)]
pub struct DeleteFailure {
    pub pack: InstalledPack,
    pub error: ManagerError,
}

/// Result of a confirmed (or declined) delete.
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub deleted: Vec<InstalledPack>,
    pub failed: Vec<DeleteFailure>,
    /// The confirmation was not given; nothing was touched.
    pub cancelled: bool,
}

enum Placement {
    New(InstalledPack),
    Existing(InstalledPack),
}

/// Pack manager for one server and its target world.
///
/// Every operation reads the current state from disk; nothing is cached
/// between calls.
pub struct PackManager {
    ctx: ServerContext,
    registry: WorldRegistry,
    inventory: PackInventory,
    extractor: ZipExtractor,
    auto_activate: bool,
    progress: Option<InstallProgressCallback>,
}

impl fmt::Debug for PackManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackManager")
            .field("ctx", &self.ctx)
            .field("auto_activate", &self.auto_activate)
            .finish_non_exhaustive()
    }
}

impl PackManager {
    /// Create a manager for the given context.
    pub fn new(ctx: ServerContext) -> Self {
        Self {
            registry: WorldRegistry::new(ctx.world()),
            inventory: PackInventory::new(ctx.layout()),
            extractor: ZipExtractor::new(ctx.layout().scratch_dir()),
            ctx,
            auto_activate: true,
            progress: None,
        }
    }

    /// Whether installs activate their packs for the world. Defaults to true.
    pub fn with_auto_activate(mut self, enabled: bool) -> Self {
        self.auto_activate = enabled;
        self
    }

    /// Replace the free-space probe used before extraction.
    pub fn with_space_probe(mut self, probe: impl SpaceProbe + 'static) -> Self {
        self.extractor = ZipExtractor::new(self.ctx.layout().scratch_dir()).with_space_probe(probe);
        self
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: InstallProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn context(&self) -> &ServerContext {
        &self.ctx
    }

    pub fn registry(&self) -> &WorldRegistry {
        &self.registry
    }

    pub fn inventory(&self) -> &PackInventory {
        &self.inventory
    }

    /// Install a folder or an archive, depending on what `path` is.
    pub fn install_path(&self, path: &Path) -> ManagerResult<InstallBatch> {
        if path.is_dir() {
            self.install_from_directory(path)
        } else if !path.exists() {
            Err(ManagerError::InvalidPath(format!(
                "{} does not exist",
                path.display()
            )))
        } else {
            ArchiveFormat::from_path(path)?;
            self.install_from_archive(path)
        }
    }

    /// Install every pack found in a folder.
    ///
    /// The folder is copied into scratch first; the source is never modified.
    pub fn install_from_directory(&self, src: &Path) -> ManagerResult<InstallBatch> {
        let scratch = ScratchArea::acquire(&self.ctx.layout().scratch_dir())?;
        let found = discover_packs(src, &folder_name(src), &[]);

        let mut staged = Vec::with_capacity(found.len());
        for pack in found {
            self.report_progress(InstallStage::Staging, &pack.name);
            let dir = unique_folder(scratch.path(), &pack.name);
            copy_tree(&pack.dir, &dir)?;
            staged.push(StagedPack { dir, ..pack });
        }

        self.install_staged(&staged)
    }

    /// Extract an archive and install every pack inside it.
    pub fn install_from_archive(&self, archive: &Path) -> ManagerResult<InstallBatch> {
        self.report_progress(InstallStage::Extracting, &folder_name(archive));
        let staged = self.extractor.extract(archive)?;
        let batch = self.install_staged(staged.packs())?;
        tracing::info!(
            archive = %staged.source().display(),
            installed = batch.installed.len(),
            already_installed = batch.already_installed.len(),
            failed = batch.failed.len(),
            "Archive installed"
        );
        Ok(batch)
    }

    fn install_staged(&self, packs: &[StagedPack]) -> ManagerResult<InstallBatch> {
        let mut batch = InstallBatch::default();
        let mut present = self.inventory.scan()?;

        for staged in packs {
            if is_system_pack(&staged.name) {
                tracing::debug!(pack = %staged.name, "Skipping system pack");
                continue;
            }

            match self.install_one(staged, &present) {
                Ok(Placement::New(pack)) => {
                    present.push(pack.clone());
                    batch.installed.push(pack);
                }
                Ok(Placement::Existing(pack)) => batch.already_installed.push(pack),
                Err(error) => {
                    tracing::warn!(pack = %staged.name, kind = %error.kind(), error = %error, "Pack not installed");
                    batch.failed.push(InstallFailure {
                        name: staged.name.clone(),
                        error,
                    });
                }
            }
        }

        if self.auto_activate {
            self.activate_present(&mut batch)?;
        }

        self.report_progress(InstallStage::Reporting, "");
        let report = self
            .combined_view()
            .and_then(|view| write_report(&self.ctx, &view, Some(&batch)));
        if let Err(e) = report {
            tracing::warn!(error = %e, "Failed to write report");
        }

        Ok(batch)
    }

    fn install_one(
        &self,
        staged: &StagedPack,
        present: &[InstalledPack],
    ) -> ManagerResult<Placement> {
        self.report_progress(InstallStage::Resolving, &staged.name);
        let identity = resolve_as(&staged.dir, &staged.name, staged.hint)?.identity;

        let existing = present
            .iter()
            .find(|p| p.pack_type == identity.pack_type && p.matches_id(&identity.id));
        if let Some(existing) = existing {
            let notice = ManagerError::AlreadyInstalled {
                pack_id: existing.id.clone(),
                name: existing.folder_name(),
            };
            tracing::info!("{}", notice);
            return Ok(Placement::Existing(existing.clone()));
        }

        self.report_progress(InstallStage::Installing, &staged.name);
        let type_dir = self.ctx.layout().packs_dir(identity.pack_type);
        let target = promote(&staged.dir, &type_dir, &staged.name)?;
        tracing::info!(
            pack_id = %identity.id,
            pack_type = %identity.pack_type,
            dir = %target.display(),
            "Installed pack"
        );
        Ok(Placement::New(InstalledPack::new(identity, target)))
    }

    /// One merged write per type covering every pack the batch left present.
    fn activate_present(&self, batch: &mut InstallBatch) -> ManagerResult<()> {
        for pack_type in PackType::ALL {
            let apply = BatchApply {
                add: batch
                    .present(pack_type)
                    .map(|p| ActivationRef::from(&p.identity))
                    .collect(),
                ..BatchApply::default()
            };
            if apply.is_empty() {
                continue;
            }
            self.report_progress(InstallStage::Activating, pack_type.packs_dir_name());
            let outcome = self.registry.batch_apply(pack_type, &apply)?;
            batch.activated.extend(outcome.added);
        }
        Ok(())
    }

    /// Installed packs joined with the world's activation lists.
    pub fn combined_view(&self) -> ManagerResult<CombinedView> {
        CombinedView::build(self.inventory.scan()?, &self.registry)
    }

    /// Apply a manage selection, one write per type that changes.
    pub fn apply_selection(
        &self,
        intent: &SelectionIntent,
    ) -> ManagerResult<Vec<(PackType, ApplyOutcome)>> {
        let mut outcomes = Vec::new();
        for (pack_type, batch) in intent.batches() {
            if batch.is_empty() {
                continue;
            }
            outcomes.push((pack_type, self.registry.batch_apply(pack_type, batch)?));
        }
        Ok(outcomes)
    }

    /// Activate an installed pack by id.
    pub fn activate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        let pack = self.inventory.find(pack_id)?;
        self.registry.activate(pack.pack_type, &pack.id, pack.version)
    }

    /// Deactivate a pack by id. Files are not touched.
    ///
    /// Also accepts ids of dangling activation entries, so references to
    /// packs that are gone can be cleaned up.
    pub fn deactivate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        let packs = self.inventory.scan()?;
        let mut outcome = ApplyOutcome::default();
        let mut found = false;

        for pack_type in PackType::ALL {
            let installed = packs
                .iter()
                .find(|p| p.pack_type == pack_type && p.matches_id(pack_id));
            let target = match installed {
                Some(pack) => Some(pack.id.clone()),
                None => self
                    .registry
                    .read_entries(pack_type)?
                    .into_iter()
                    .find(|e| e.references(pack_id))
                    .map(|e| e.pack_id().to_string()),
            };

            if let Some(id) = target {
                found = true;
                outcome
                    .removed
                    .extend(self.registry.deactivate(pack_type, &id)?.removed);
            }
        }

        if !found {
            return Err(ManagerError::PackNotFound {
                pack_id: pack_id.to_string(),
            });
        }
        Ok(outcome)
    }

    /// Delete packs after explicit confirmation.
    ///
    /// Without confirmation nothing is touched. Per-pack failures are
    /// collected; a corrupt activation file aborts the whole delete.
    pub fn delete(
        &self,
        packs: &[InstalledPack],
        confirmation: Confirmation,
    ) -> ManagerResult<DeleteSummary> {
        let mut summary = DeleteSummary::default();
        if !confirmation.is_confirmed() {
            tracing::info!(packs = packs.len(), "Delete not confirmed, nothing changed");
            summary.cancelled = true;
            return Ok(summary);
        }

        for pack in packs {
            match self.registry.delete_pack(pack) {
                Ok(_) => summary.deleted.push(pack.clone()),
                Err(e) if e.kind() == ErrorKind::ActivationFileCorrupt => return Err(e),
                Err(error) => {
                    tracing::warn!(pack_id = %pack.id, error = %error, "Failed to delete pack");
                    summary.failed.push(DeleteFailure {
                        pack: pack.clone(),
                        error,
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Delete packs by id. Every id must resolve before anything is deleted.
    pub fn delete_by_ids(
        &self,
        pack_ids: &[String],
        confirmation: Confirmation,
    ) -> ManagerResult<DeleteSummary> {
        let installed = self.inventory.scan()?;
        let mut packs = Vec::with_capacity(pack_ids.len());
        for id in pack_ids {
            let matching: Vec<_> = installed.iter().filter(|p| p.matches_id(id)).collect();
            if matching.is_empty() {
                return Err(ManagerError::PackNotFound {
                    pack_id: id.clone(),
                });
            }
            packs.extend(matching.into_iter().cloned());
        }
        self.delete(&packs, confirmation)
    }

    /// Write the report for the current state, without a last operation.
    pub fn write_report(&self) -> ManagerResult<PathBuf> {
        let view = self.combined_view()?;
        write_report(&self.ctx, &view, None)
    }

    fn report_progress(&self, stage: InstallStage, message: &str) {
        if let Some(ref callback) = self.progress {
            callback(stage, message);
        }
    }
}
