//! Local filesystem operations on fetched bundles: staging, listing, archive
//! expansion, publishing into the working directory and metadata reading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::bundle::ArchiveKind;

/// Records which entries of a working directory came from the last pull.
pub const MANIFEST_FILE: &str = ".pullrun-bundle.json";

/// Sorted names of the entries directly inside `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or holds a name that is
/// not valid UTF-8.
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|n| anyhow::anyhow!("non UTF-8 file name {n:?} in {}", dir.display()))?;
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Expand `archive` into `into`.
///
/// When every entry sits under one top-level directory, that directory is
/// stripped. Entries with absolute paths or `..` components are rejected
/// before anything is moved into `into`.
///
/// # Errors
///
/// Returns an error for unknown formats, corrupt archives, escaping entries
/// and filesystem failures.
pub fn expand_archive(archive: &Path, into: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = ArchiveKind::from_file_name(&name)
        .ok_or_else(|| anyhow::anyhow!("{name} is not a supported archive"))?;

    let staging = tempfile::Builder::new()
        .prefix(".pullrun-expand-")
        .tempdir_in(into)
        .with_context(|| format!("creating staging directory in {}", into.display()))?;

    match kind {
        ArchiveKind::TarGz => {
            let file = open(archive)?;
            unpack_tar(tar::Archive::new(flate2::read::GzDecoder::new(file)), staging.path())
        }
        ArchiveKind::Tar => unpack_tar(tar::Archive::new(open(archive)?), staging.path()),
        ArchiveKind::Zip => unpack_zip(open(archive)?, staging.path()),
    }
    .with_context(|| format!("expanding {name}"))?;

    let root = single_root(staging.path())?.unwrap_or_else(|| staging.path().to_path_buf());
    let entries = list_dir(&root)?;
    for entry in &entries {
        anyhow::ensure!(
            !exists(&into.join(entry))?,
            "{name} holds {entry}, which is already in the bundle"
        );
    }
    for entry in &entries {
        std::fs::rename(root.join(entry), into.join(entry))
            .with_context(|| format!("moving {entry} into {}", into.display()))?;
    }
    Ok(())
}

/// Create a fresh, uniquely named directory inside `parent` to pull into.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn create_staging(parent: &Path) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix(".pullrun-pull-")
        .tempdir_in(parent)
        .with_context(|| format!("creating staging directory in {}", parent.display()))?;
    Ok(dir.keep())
}

/// Move `entries` from `staging` into `dest` and remove `staging`.
///
/// Entries recorded by the previous publish into `dest`, and anything named
/// like a new entry, are removed first. Nothing else in `dest` is touched.
///
/// # Errors
///
/// Returns an error if an old entry cannot be removed or a new one moved.
pub fn publish(staging: &Path, dest: &Path, entries: &[String]) -> Result<()> {
    let mut replaced = read_manifest(dest);
    replaced.extend(entries.iter().cloned());
    for name in &replaced {
        if is_plain_name(name) {
            remove_entry(&dest.join(name))?;
        }
    }
    for name in entries {
        std::fs::rename(staging.join(name), dest.join(name))
            .with_context(|| format!("moving {name} into {}", dest.display()))?;
    }
    let manifest = serde_json::to_vec_pretty(entries).context("encoding bundle manifest")?;
    std::fs::write(dest.join(MANIFEST_FILE), manifest)
        .with_context(|| format!("writing {MANIFEST_FILE} in {}", dest.display()))?;
    discard(staging)
}

/// Remove a staging directory and everything in it.
///
/// # Errors
///
/// Returns an error if the directory cannot be removed.
pub fn discard(staging: &Path) -> Result<()> {
    std::fs::remove_dir_all(staging).with_context(|| format!("removing {}", staging.display()))
}

/// Names published by the previous pull, empty when unknown.
fn read_manifest(dest: &Path) -> Vec<String> {
    let path = dest.join(MANIFEST_FILE);
    match std::fs::read(&path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable {}: {e}", path.display());
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

/// A single path component, so a manifest can only name direct children.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn remove_entry(path: &Path) -> Result<()> {
    let removed = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    removed.with_context(|| format!("replacing {}", path.display()))
}

fn exists(path: &Path) -> Result<bool> {
    path.try_exists()
        .with_context(|| format!("inspecting {}", path.display()))
}

/// Remove a file.
///
/// # Errors
///
/// Returns an error if the file cannot be removed.
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))
}

/// Parse a JSON file, `None` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_json(path: &Path) -> Result<Option<serde_json::Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .map(Some)
        .with_context(|| format!("parsing {}", path.display()))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .with_context(|| format!("opening {}", path.display()))
}

/// The lone top-level directory of `dir`, if that is all it holds.
fn single_root(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = list_dir(dir)?;
    if let [only] = entries.as_slice() {
        let path = dir.join(only);
        if path.is_dir() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Whether an archive entry path stays inside the destination.
pub(crate) fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn unpack_tar<R: Read>(mut archive: tar::Archive<R>, dest: &Path) -> Result<()> {
    for entry in archive.entries().context("reading tar entries")? {
        let mut entry = entry.context("reading tar entry")?;
        let path = entry.path().context("reading tar entry path")?.into_owned();
        anyhow::ensure!(
            is_contained(&path),
            "archive entry {} escapes the destination",
            path.display()
        );
        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("unpacking {}", path.display()))?;
        anyhow::ensure!(
            unpacked,
            "archive entry {} escapes the destination",
            path.display()
        );
    }
    Ok(())
}

fn unpack_zip<R: Read + std::io::Seek>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader).context("opening zip archive")?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).context("reading zip entry")?;
        let relative = file
            .enclosed_name()
            .ok_or_else(|| anyhow::anyhow!("archive entry {} escapes the destination", file.name()))?;
        let outpath = dest.join(relative);
        if file.is_dir() {
            std::fs::create_dir_all(&outpath)
                .with_context(|| format!("creating {}", outpath.display()))?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut out = File::create(&outpath)
            .with_context(|| format!("creating {}", outpath.display()))?;
        std::io::copy(&mut file, &mut out)
            .with_context(|| format!("writing {}", outpath.display()))?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting permissions on {}", outpath.display()))?;
        }
    }
    Ok(())
}
