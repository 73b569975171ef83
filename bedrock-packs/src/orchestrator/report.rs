//! The `world_packs_report.md` artifact.

use std::fmt::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::install::InstallBatch;
use crate::environment::ServerContext;
use crate::error::ManagerResult;
use crate::inventory::CombinedView;
use crate::json::write_atomic;
use crate::pack::{InstalledPack, PackType};

/// Render the report as markdown.
pub fn render_report(
    world: &str,
    generated: DateTime<Local>,
    view: &CombinedView,
    last_batch: Option<&InstallBatch>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_into(&mut out, world, generated, view, last_batch);
    out
}

fn render_into<W: Write>(
    out: &mut W,
    world: &str,
    generated: DateTime<Local>,
    view: &CombinedView,
    last_batch: Option<&InstallBatch>,
) -> fmt::Result {
    writeln!(out, "# World packs report\n")?;
    writeln!(out, "World: `{}`\n", world)?;
    writeln!(out, "Generated: {}\n", generated.format("%Y-%m-%d %H:%M:%S %:z"))?;

    if let Some(batch) = last_batch {
        render_batch(out, batch)?;
    }
    for pack_type in PackType::ALL {
        render_table(out, view, pack_type)?;
    }
    render_dangling(out, view)
}

fn render_batch<W: Write>(out: &mut W, batch: &InstallBatch) -> fmt::Result {
    writeln!(out, "## Last operation\n")?;

    writeln!(out, "- Installed: {}", batch.installed.len())?;
    for pack in &batch.installed {
        render_pack_line(out, pack)?;
    }
    writeln!(out, "- Already installed: {}", batch.already_installed.len())?;
    for pack in &batch.already_installed {
        render_pack_line(out, pack)?;
    }
    writeln!(out, "- Activated: {}", batch.activated.len())?;
    for id in &batch.activated {
        writeln!(out, "  - `{}`", id)?;
    }
    writeln!(out, "- Failed: {}", batch.failed.len())?;
    for failure in &batch.failed {
        writeln!(
            out,
            "  - `{}`: {} ({})",
            failure.name,
            failure.kind(),
            failure.error
        )?;
    }
    writeln!(out)
}

fn render_pack_line<W: Write>(out: &mut W, pack: &InstalledPack) -> fmt::Result {
    writeln!(
        out,
        "  - [{}] `{}` `{}`",
        pack.pack_type.short_label(),
        pack.folder_name(),
        pack.id
    )
}

fn render_table<W: Write>(out: &mut W, view: &CombinedView, pack_type: PackType) -> fmt::Result {
    let title = match pack_type {
        PackType::Behavior => "Behavior packs",
        PackType::Resource => "Resource packs",
    };
    writeln!(out, "## {}\n", title)?;

    let mut rows: Vec<_> = view.of_type(pack_type).collect();
    if rows.is_empty() {
        return writeln!(out, "(none)\n");
    }
    rows.sort_by_key(|v| v.pack.folder_name().to_lowercase());

    writeln!(out, "| Status | Pack (folder) | UUID (pack_id) | Version |")?;
    writeln!(out, "|---|---|---|---|")?;
    for row in rows {
        let status = if row.active { "ACTIVE" } else { "inactive" };
        writeln!(
            out,
            "| {} | `{}` | `{}` | `{}` |",
            status,
            row.pack.folder_name(),
            row.pack.id,
            row.pack.version
        )?;
    }
    writeln!(out)
}

fn render_dangling<W: Write>(out: &mut W, view: &CombinedView) -> fmt::Result {
    writeln!(out, "## Dangling references\n")?;
    if view.dangling.is_empty() {
        return writeln!(out, "(none)");
    }

    writeln!(out, "| Type | UUID (pack_id) | Version |")?;
    writeln!(out, "|---|---|---|")?;
    for dangling in &view.dangling {
        let version = dangling
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "| {} | `{}` | `{}` |",
            dangling.pack_type.short_label(),
            dangling.pack_id,
            version
        )?;
    }
    Ok(())
}

/// Write the report to the server root.
pub fn write_report(
    ctx: &ServerContext,
    view: &CombinedView,
    last_batch: Option<&InstallBatch>,
) -> ManagerResult<PathBuf> {
    let path = ctx.layout().report_path();
    let text = render_report(ctx.world().name(), Local::now(), view, last_batch);
    write_atomic(&path, text.as_bytes())?;
    tracing::debug!(path = %path.display(), "Wrote report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManagerError;
    use crate::inventory::{DanglingRef, PackView};
    use crate::orchestrator::install::InstallFailure;
    use crate::pack::{InstalledPack, PackIdentity, PackVersion};
    use chrono::TimeZone;

    fn installed(id: &str, pack_type: PackType, folder: &str) -> InstalledPack {
        InstalledPack::new(
            PackIdentity::new(id, pack_type, folder, PackVersion::new(1, 2, 0)),
            format!("/srv/{}/{}", pack_type.packs_dir_name(), folder),
        )
    }

    #[test]
    fn test_render_report() {
        let view = CombinedView {
            entries: vec![
                PackView {
                    pack: installed("b-1", PackType::Behavior, "Mobs BP"),
                    active: true,
                },
                PackView {
                    pack: installed("b-2", PackType::Behavior, "Aardvark BP"),
                    active: false,
                },
            ],
            dangling: vec![DanglingRef {
                pack_type: PackType::Resource,
                pack_id: "r-gone".to_string(),
                version: None,
            }],
        };
        let batch = InstallBatch {
            installed: vec![installed("b-1", PackType::Behavior, "Mobs BP")],
            activated: vec!["b-1".to_string()],
            failed: vec![InstallFailure {
                name: "mystery".to_string(),
                error: ManagerError::AmbiguousType {
                    path: PathBuf::from("/scratch/mystery"),
                },
            }],
            ..Default::default()
        };
        let when = Local.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();

        let text = render_report("Bedrock level", when, &view, Some(&batch));

        assert!(text.contains("World: `Bedrock level`"));
        assert!(text.contains("Generated: 2026-03-01 12:30:00"));
        assert!(text.contains("- Installed: 1"));
        assert!(text.contains("`mystery`: AmbiguousType"));
        assert!(text.contains("| ACTIVE | `Mobs BP` | `b-1` | `1.2.0` |"));

        let aardvark = text.find("Aardvark BP").unwrap();
        let mobs = text.find("| ACTIVE | `Mobs BP`").unwrap();
        assert!(aardvark < mobs);

        assert!(text.contains("## Resource packs\n\n(none)"));
        assert!(text.contains("| RP | `r-gone` | `?` |"));
    }

    #[test]
    fn test_render_without_batch() {
        let text = render_report("w", Local::now(), &CombinedView::default(), None);
        assert!(!text.contains("Last operation"));
        assert!(text.ends_with("(none)\n"));
    }
}
