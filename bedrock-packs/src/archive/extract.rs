//! Zip-based extraction of add-on archives into the scratch area.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::discover::{discover_packs, StagedPack};
use super::format::ArchiveFormat;
use super::scratch::ScratchArea;
use super::space::{SpaceProbe, StatvfsProbe};
use crate::error::{ManagerError, ManagerResult};
use crate::pack::unique_folder;

/// Archives nested deeper than this are left unexpanded.
pub const MAX_NESTING: usize = 4;

/// Extra room reserved per byte of a nested archive, which expands later.
const NESTED_EXPANSION_FACTOR: u64 = 3;

/// Trait for turning an archive into staged pack directories.
pub trait ArchiveExtractor {
    /// Extract `archive_path` into a fresh scratch area.
    ///
    /// Nothing is left in the scratch root when this fails; on success the
    /// returned [`StagedArchive`] owns the staged content until dropped.
    fn extract(&self, archive_path: &Path) -> ManagerResult<StagedArchive>;
}

/// Content of one archive, staged and split into packs.
#[derive(Debug)]
pub struct StagedArchive {
    scratch: ScratchArea,
    source: PathBuf,
    packs: Vec<StagedPack>,
}

impl StagedArchive {
    /// The archive this content came from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory holding the unpacked tree.
    pub fn staging_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Pack roots discovered in the tree.
    pub fn packs(&self) -> &[StagedPack] {
        &self.packs
    }
}

/// Extractor for `.zip`, `.mcpack` and `.mcaddon` files.
pub struct ZipExtractor {
    scratch_root: PathBuf,
    probe: Box<dyn SpaceProbe>,
}

impl fmt::Debug for ZipExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipExtractor")
            .field("scratch_root", &self.scratch_root)
            .finish_non_exhaustive()
    }
}

impl ZipExtractor {
    /// Create an extractor staging under `scratch_root`.
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            probe: Box::new(StatvfsProbe),
        }
    }

    /// Replace the free-space probe.
    pub fn with_space_probe(mut self, probe: impl SpaceProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Bytes the scratch area needs to unpack `archive_path`, from the
    /// sizes declared in its central directory.
    pub fn estimate_required(&self, archive_path: &Path) -> ManagerResult<u64> {
        let mut archive = open(archive_path)?;
        declared_size(&mut archive, archive_path)
    }

    fn ensure_space(&self, required: u64) -> ManagerResult<()> {
        let Some(available) = self.probe.available_bytes(&self.scratch_root) else {
            return Ok(());
        };
        if required > available {
            return Err(ManagerError::InsufficientSpace {
                path: self.scratch_root.clone(),
                required,
                available,
            });
        }
        Ok(())
    }

    fn expand_nested(
        &self,
        outer: &Path,
        dir: &Path,
        level: usize,
        units: &mut Vec<PathBuf>,
    ) -> ManagerResult<()> {
        let mut nested = Vec::new();
        collect_archives(dir, &mut nested);

        for inner in nested {
            if level >= MAX_NESTING {
                tracing::warn!(archive = %inner.display(), "Nested archive too deep, left as is");
                continue;
            }

            let parent = inner.parent().unwrap_or(dir);
            let stem = inner
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "nested".to_string());
            let target = unique_folder(parent, &stem);

            tracing::debug!(archive = %inner.display(), target = %target.display(), "Expanding nested archive");

            let required = self
                .estimate_required(&inner)
                .map_err(|e| nested_error(outer, &inner, e))?;
            self.ensure_space(required)?;
            unpack(&inner, &target).map_err(|e| nested_error(outer, &inner, e))?;
            fs::remove_file(&inner).map_err(|e| ManagerError::write(&inner, e))?;

            units.push(target.clone());
            self.expand_nested(outer, &target, level + 1, units)?;
        }

        Ok(())
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path) -> ManagerResult<StagedArchive> {
        let format = ArchiveFormat::from_path(archive_path)?;

        let mut archive = open(archive_path)?;
        let required = declared_size(&mut archive, archive_path)?;
        drop(archive);

        let scratch = ScratchArea::acquire(&self.scratch_root)?;
        self.ensure_space(required)?;

        tracing::info!(
            archive = %archive_path.display(),
            format = %format,
            required_bytes = required,
            "Extracting archive"
        );

        let files = unpack(archive_path, scratch.path())?;
        let mut units = Vec::new();
        self.expand_nested(archive_path, scratch.path(), 0, &mut units)?;

        let stem = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "addon".to_string());
        let packs = discover_packs(scratch.path(), &stem, &units);

        tracing::debug!(
            archive = %archive_path.display(),
            files,
            nested = units.len(),
            packs = packs.len(),
            "Archive staged"
        );

        Ok(StagedArchive {
            scratch,
            source: archive_path.to_path_buf(),
            packs,
        })
    }
}

fn open(path: &Path) -> ManagerResult<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ManagerError::read(path, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| corrupt(path, e))
}

fn declared_size<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &Path) -> ManagerResult<u64> {
    let mut total = 0u64;
    let mut nested = 0u64;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(|e| corrupt(path, e))?;
        total = total.saturating_add(entry.size());
        if !entry.is_dir() && ArchiveFormat::detect(Path::new(entry.name())).is_some() {
            nested = nested.saturating_add(entry.size());
        }
    }
    Ok(total.saturating_add(nested.saturating_mul(NESTED_EXPANSION_FACTOR)))
}

/// Unpack every entry of `archive_path` below `dest`. Returns the file count.
fn unpack(archive_path: &Path, dest: &Path) -> ManagerResult<usize> {
    let mut archive = open(archive_path)?;
    fs::create_dir_all(dest).map_err(|e| ManagerError::create_dir(dest, e))?;

    let mut buffer = vec![0u8; 64 * 1024];
    let mut count = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| corrupt(archive_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(
                archive = %archive_path.display(),
                entry = entry.name(),
                "Skipping entry with unsafe path"
            );
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ManagerError::create_dir(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::create_dir(parent, e))?;
        }

        let mut out = File::create(&out_path).map_err(|e| ManagerError::write(&out_path, e))?;
        loop {
            let n = entry
                .read(&mut buffer)
                .map_err(|e| corrupt(archive_path, e))?;
            if n == 0 {
                break;
            }
            out.write_all(&buffer[..n])
                .map_err(|e| ManagerError::write(&out_path, e))?;
        }
        count += 1;
    }

    Ok(count)
}

fn collect_archives(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_archives(&path, out);
        } else if ArchiveFormat::is_archive(&path) {
            out.push(path);
        }
    }
}

fn corrupt(path: &Path, reason: impl fmt::Display) -> ManagerError {
    ManagerError::ArchiveCorrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// A broken nested archive fails the archive that contains it.
fn nested_error(outer: &Path, inner: &Path, err: ManagerError) -> ManagerError {
    match err {
        ManagerError::ArchiveCorrupt { reason, .. } => ManagerError::ArchiveCorrupt {
            path: outer.to_path_buf(),
            reason: format!(
                "nested archive {}: {}",
                inner
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                reason
            ),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::FixedSpace;
    use crate::pack::PackType;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        fs::write(path, zip_bytes(files)).unwrap();
    }

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let scratch = temp.path().join(".tmp_addon_extract");
        (temp, scratch)
    }

    #[test]
    fn test_extract_mcpack_with_manifest() {
        let (temp, scratch) = setup();
        let archive = temp.path().join("Mobs.mcpack");
        write_zip(
            &archive,
            &[
                ("manifest.json", &b"{}"[..]),
                ("entities/cow.json", &b"{}"[..]),
            ],
        );

        let staged = ZipExtractor::new(&scratch).extract(&archive).unwrap();
        assert_eq!(staged.packs().len(), 1);
        assert_eq!(staged.packs()[0].name, "Mobs");
        assert!(staged.packs()[0].dir.join("entities/cow.json").is_file());
        assert!(staged.staging_dir().starts_with(&scratch));

        drop(staged);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_extract_mcaddon_with_nested_packs() {
        let (temp, scratch) = setup();
        let bp = zip_bytes(&[("entities/cow.json", &b"{}"[..])]);
        let rp = zip_bytes(&[("textures/cow.png", &b"png"[..])]);
        let archive = temp.path().join("Farm.mcaddon");
        write_zip(
            &archive,
            &[("Farm_BP.mcpack", bp.as_slice()), ("Farm_RP.mcpack", rp.as_slice())],
        );

        let staged = ZipExtractor::new(&scratch).extract(&archive).unwrap();
        let packs = staged.packs();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].name, "Farm_BP");
        assert_eq!(packs[0].hint, Some(PackType::Behavior));
        assert_eq!(packs[1].name, "Farm_RP");
        assert!(packs[1].dir.join("textures/cow.png").is_file());
        assert!(!staged.staging_dir().join("Farm_BP.mcpack").exists());
    }

    #[test]
    fn test_truncated_archive_is_corrupt() {
        let (temp, scratch) = setup();
        let bytes = zip_bytes(&[("manifest.json", &b"{}"[..])]);
        let archive = temp.path().join("bad.zip");
        fs::write(&archive, &bytes[..bytes.len() / 2]).unwrap();

        let err = ZipExtractor::new(&scratch).extract(&archive).unwrap_err();
        assert!(matches!(err, ManagerError::ArchiveCorrupt { .. }));
        assert!(!scratch.exists());
    }

    #[test]
    fn test_corrupt_nested_archive_fails_whole_archive() {
        let (temp, scratch) = setup();
        let archive = temp.path().join("bundle.mcaddon");
        write_zip(
            &archive,
            &[
                ("good BP/manifest.json", &b"{}"[..]),
                ("broken.mcpack", &b"definitely not a zip"[..]),
            ],
        );

        let err = ZipExtractor::new(&scratch).extract(&archive).unwrap_err();
        match err {
            ManagerError::ArchiveCorrupt { path, reason } => {
                assert_eq!(path, archive);
                assert!(reason.contains("broken.mcpack"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!scratch.exists());
    }

    #[test]
    fn test_insufficient_space_checked_before_extraction() {
        let (temp, scratch) = setup();
        let archive = temp.path().join("big.zip");
        write_zip(&archive, &[("textures/a.png", &[0u8; 4096][..])]);

        let err = ZipExtractor::new(&scratch)
            .with_space_probe(FixedSpace(1024))
            .extract(&archive)
            .unwrap_err();

        match err {
            ManagerError::InsufficientSpace {
                required,
                available,
                ..
            } => {
                assert_eq!(required, 4096);
                assert_eq!(available, 1024);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!scratch.exists());
    }

    #[test]
    fn test_estimate_counts_nested_archives() {
        let (temp, scratch) = setup();
        let inner = zip_bytes(&[("a.txt", &b"hello"[..])]);
        let archive = temp.path().join("outer.zip");
        write_zip(&archive, &[("inner.mcpack", inner.as_slice()), ("b.txt", &b"xy"[..])]);

        let required = ZipExtractor::new(&scratch)
            .estimate_required(&archive)
            .unwrap();
        let inner_len = inner.len() as u64;
        assert_eq!(required, inner_len + 2 + inner_len * NESTED_EXPANSION_FACTOR);
    }

    #[test]
    fn test_unsupported_extension() {
        let (temp, scratch) = setup();
        let file = temp.path().join("pack.rar");
        fs::write(&file, b"rar").unwrap();

        let err = ZipExtractor::new(&scratch).extract(&file).unwrap_err();
        assert!(matches!(err, ManagerError::UnsupportedArchive { .. }));
    }
}
