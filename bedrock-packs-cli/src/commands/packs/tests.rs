//! Handler tests against mock services.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use bedrock_packs::inventory::{CombinedView, DanglingRef, PackView};
use bedrock_packs::orchestrator::{
    AutoScanSummary, Confirmation, DeleteSummary, InstallBatch, InstallFailure,
    InstallProgressCallback, ProcessedItem, QueueFailure, SelectionIntent,
};
use bedrock_packs::registry::ApplyOutcome;
use bedrock_packs::{
    ErrorKind, InstalledPack, ManagerError, ManagerResult, PackIdentity, PackType, PackVersion,
};

use super::args::{
    ActivateArgs, DeactivateArgs, DeleteArgs, InstallArgs, ListArgs, PackTypeArg, ReportArgs,
    ScanArgs, StatusArg,
};
use super::handlers::{
    ActivateHandler, DeactivateHandler, DeleteHandler, InstallHandler, ListHandler,
    ReportHandler, ScanHandler,
};
use super::traits::{CommandContext, CommandHandler, Output, PackService, UserInteraction};
use crate::error::CliError;

// ============================================================================
// Mocks
// ============================================================================

#[derive(Default)]
struct MockOutput {
    lines: RwLock<Vec<String>>,
}

impl MockOutput {
    fn contains(&self, needle: &str) -> bool {
        self.lines.read().unwrap().iter().any(|l| l.contains(needle))
    }
}

impl Output for MockOutput {
    fn println(&self, message: &str) {
        self.lines.write().unwrap().push(message.to_string());
    }

    fn print(&self, message: &str) {
        self.println(message);
    }
}

struct MockInteraction {
    answer: bool,
    prompts: RwLock<Vec<String>>,
}

impl MockInteraction {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: RwLock::new(Vec::new()),
        }
    }

    fn was_asked(&self) -> bool {
        !self.prompts.read().unwrap().is_empty()
    }
}

impl UserInteraction for MockInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.write().unwrap().push(message.to_string());
        self.answer
    }

    fn read_line(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
struct MockPackService {
    view: CombinedView,
    queue_failures: Vec<String>,
    processed: Vec<String>,
    failed_installs: Vec<String>,
    calls: RwLock<Vec<String>>,
}

impl MockPackService {
    fn with_packs(entries: Vec<PackView>) -> Self {
        Self {
            view: CombinedView {
                entries,
                dangling: Vec::new(),
            },
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.write().unwrap().push(call);
    }

    fn called(&self, call: &str) -> bool {
        self.calls.read().unwrap().iter().any(|c| c == call)
    }

    fn find(&self, pack_id: &str) -> ManagerResult<&PackView> {
        self.view
            .entries
            .iter()
            .find(|v| v.pack.matches_id(pack_id))
            .ok_or_else(|| ManagerError::PackNotFound {
                pack_id: pack_id.to_string(),
            })
    }
}

impl PackService for MockPackService {
    fn server_root(&self) -> &Path {
        Path::new("/srv/bedrock")
    }

    fn world_name(&self) -> &str {
        "Bedrock level"
    }

    fn install(
        &self,
        path: &Path,
        _on_progress: Option<InstallProgressCallback>,
    ) -> ManagerResult<InstallBatch> {
        self.record(format!("install {}", path.display()));
        let mut batch = InstallBatch::default();
        batch
            .installed
            .extend(self.view.entries.iter().map(|v| v.pack.clone()));
        for name in &self.failed_installs {
            batch.failed.push(InstallFailure {
                name: name.clone(),
                error: ManagerError::AmbiguousType {
                    path: PathBuf::from(name),
                },
            });
        }
        Ok(batch)
    }

    fn auto_scan(&self) -> ManagerResult<AutoScanSummary> {
        self.record("auto_scan".to_string());
        let queue = Path::new("/srv/bedrock/addons_auto_install");
        Ok(AutoScanSummary {
            processed: self
                .processed
                .iter()
                .map(|name| ProcessedItem {
                    archive: queue.join(name),
                    moved_to: queue.join("processed").join(name),
                    batch: InstallBatch::default(),
                })
                .collect(),
            failed: self
                .queue_failures
                .iter()
                .map(|name| QueueFailure {
                    archive: queue.join(name),
                    kind: ErrorKind::ArchiveCorrupt,
                    message: "invalid Zip archive".to_string(),
                })
                .collect(),
        })
    }

    fn combined_view(&self) -> ManagerResult<CombinedView> {
        Ok(self.view.clone())
    }

    fn activate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        self.record(format!("activate {}", pack_id));
        let view = self.find(pack_id)?;
        let mut outcome = ApplyOutcome::default();
        if !view.active {
            outcome.added.push(view.pack.id.clone());
        }
        Ok(outcome)
    }

    fn deactivate(&self, pack_id: &str) -> ManagerResult<ApplyOutcome> {
        self.record(format!("deactivate {}", pack_id));
        let view = self.find(pack_id)?;
        let mut outcome = ApplyOutcome::default();
        if view.active {
            outcome.removed.push(view.pack.id.clone());
        }
        Ok(outcome)
    }

    fn apply_selection(
        &self,
        _intent: &SelectionIntent,
    ) -> ManagerResult<Vec<(PackType, ApplyOutcome)>> {
        Ok(Vec::new())
    }

    fn delete(
        &self,
        pack_ids: &[String],
        confirmation: Confirmation,
    ) -> ManagerResult<DeleteSummary> {
        self.record(format!("delete {:?}", confirmation));
        let packs = pack_ids
            .iter()
            .map(|id| self.find(id).map(|v| v.pack.clone()))
            .collect::<ManagerResult<Vec<_>>>()?;

        let mut summary = DeleteSummary::default();
        if confirmation.is_confirmed() {
            summary.deleted = packs;
        } else {
            summary.cancelled = true;
        }
        Ok(summary)
    }

    fn write_report(&self) -> ManagerResult<PathBuf> {
        Ok(PathBuf::from("/srv/bedrock/world_packs_report.md"))
    }
}

fn pack(id: &str, name: &str, pack_type: PackType, active: bool) -> PackView {
    PackView {
        pack: InstalledPack::new(
            PackIdentity::new(id, pack_type, name, PackVersion([1, 0, 0])),
            format!("/srv/bedrock/{}/{}", pack_type.packs_dir_name(), name),
        ),
        active,
    }
}

fn sample_service() -> MockPackService {
    MockPackService::with_packs(vec![
        pack("aaaa-1111", "Mobs", PackType::Behavior, true),
        pack("bbbb-2222", "Mobs Textures", PackType::Resource, false),
    ])
}

// ============================================================================
// Scan
// ============================================================================

#[test]
fn test_scan_empty_queue() {
    let output = MockOutput::default();
    let service = MockPackService::default();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ScanHandler::execute(ScanArgs, &ctx).unwrap();

    assert!(output.contains("Nothing to install."));
}

#[test]
fn test_scan_failure_is_an_error() {
    let output = MockOutput::default();
    let service = MockPackService {
        processed: vec!["good.zip".to_string()],
        queue_failures: vec!["bad.zip".to_string()],
        ..MockPackService::default()
    };
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    let result = ScanHandler::execute(ScanArgs, &ctx);

    assert!(matches!(result, Err(CliError::ScanFailed { failed: 1 })));
    assert!(output.contains("processed/good.zip"));
    assert!(output.contains("bad.zip: invalid Zip archive (ArchiveCorrupt)"));
    assert!(output.contains("1 processed, 1 failed"));
}

// ============================================================================
// Install
// ============================================================================

#[test]
fn test_install_reports_packs() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    InstallHandler::execute(
        InstallArgs {
            path: PathBuf::from("/tmp/mobs.mcaddon"),
        },
        &ctx,
    )
    .unwrap();

    assert!(service.called("install /tmp/mobs.mcaddon"));
    assert!(output.contains("installed BP Mobs"));
    assert!(output.contains("2 installed, 0 already present"));
}

#[test]
fn test_install_with_failed_pack_is_incomplete() {
    let output = MockOutput::default();
    let service = MockPackService {
        failed_installs: vec!["mystery".to_string()],
        ..sample_service()
    };
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    let result = InstallHandler::execute(
        InstallArgs {
            path: PathBuf::from("/tmp/bundle.zip"),
        },
        &ctx,
    );

    assert!(matches!(
        result,
        Err(CliError::Incomplete {
            failed: 1,
            total: 3
        })
    ));
    assert!(output.contains("mystery"));
    assert!(output.contains("(AmbiguousType)"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_filters_by_type() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ListHandler::execute(
        ListArgs {
            pack_type: Some(PackTypeArg::Resource),
            status: StatusArg::All,
            search: None,
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("(2 installed, 1 active)"));
    assert!(output.contains("[ ] RP Mobs Textures"));
    assert!(!output.contains("[x] BP Mobs"));
}

#[test]
fn test_list_shows_dangling_references() {
    let output = MockOutput::default();
    let mut service = sample_service();
    service.view.dangling.push(DanglingRef {
        pack_type: PackType::Behavior,
        pack_id: "dead-beef".to_string(),
        version: None,
    });
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ListHandler::execute(
        ListArgs {
            pack_type: None,
            status: StatusArg::Active,
            search: None,
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("[x] BP Mobs"));
    assert!(!output.contains("Mobs Textures"));
    assert!(output.contains("BP dead-beef"));
}

#[test]
fn test_list_without_packs() {
    let output = MockOutput::default();
    let service = MockPackService::default();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ListHandler::execute(
        ListArgs {
            pack_type: None,
            status: StatusArg::All,
            search: None,
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("No packs installed."));
}

// ============================================================================
// Activate / Deactivate
// ============================================================================

#[test]
fn test_activate_inactive_pack() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ActivateHandler::execute(
        ActivateArgs {
            id: "BBBB-2222".to_string(),
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("activated BBBB-2222 in world 'Bedrock level'"));
}

#[test]
fn test_activate_unknown_pack() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    let result = ActivateHandler::execute(
        ActivateArgs {
            id: "nope".to_string(),
        },
        &ctx,
    );

    match result {
        Err(CliError::Manager(e)) => assert_eq!(e.kind(), ErrorKind::PackNotFound),
        other => panic!("expected PackNotFound, got {:?}", other),
    }
}

#[test]
fn test_deactivate_inactive_pack_is_a_no_op() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    DeactivateHandler::execute(
        DeactivateArgs {
            id: "bbbb-2222".to_string(),
        },
        &ctx,
    )
    .unwrap();

    assert!(output.contains("bbbb-2222 was not active"));
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_declined_changes_nothing() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    DeleteHandler::execute(
        DeleteArgs {
            ids: vec!["aaaa-1111".to_string()],
            yes: false,
        },
        &ctx,
    )
    .unwrap();

    assert!(interaction.was_asked());
    assert!(service.called("delete Declined"));
    assert!(output.contains("Delete cancelled, nothing changed."));
}

#[test]
fn test_delete_with_yes_skips_prompt() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    DeleteHandler::execute(
        DeleteArgs {
            ids: vec!["aaaa-1111".to_string(), "bbbb-2222".to_string()],
            yes: true,
        },
        &ctx,
    )
    .unwrap();

    assert!(!interaction.was_asked());
    assert!(service.called("delete Confirmed"));
    assert!(output.contains("deleted BP Mobs"));
    assert!(output.contains("2 pack(s) deleted"));
}

// ============================================================================
// Report
// ============================================================================

#[test]
fn test_report_prints_path() {
    let output = MockOutput::default();
    let service = sample_service();
    let interaction = MockInteraction::answering(false);
    let ctx = CommandContext::new(&output, &service, &interaction);

    ReportHandler::execute(ReportArgs, &ctx).unwrap();

    assert!(output.contains("/srv/bedrock/world_packs_report.md"));
}
