//! Downloading pinned tool releases and placing their binary.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::domain::bundle::ArchiveKind;
use crate::domain::tools::{ToolSource, expected_checksum, hex_encode};

/// Largest release archive accepted.
const MAX_ASSET_BYTES: u64 = 200 * 1024 * 1024;

/// Download `source`, verify its SHA-256 and place its binary in `bin_dir`.
///
/// Blocking; callers on the async runtime go through `spawn_blocking`.
///
/// # Errors
///
/// Returns an error if a download fails, the checksum does not match, the
/// binary is missing from the archive, or it cannot be written.
pub fn download_and_place(source: &ToolSource, bin_dir: &Path) -> Result<PathBuf> {
    let data = download(&source.url).with_context(|| format!("downloading {}", source.url))?;

    let checksums = ureq::get(&source.checksum_url)
        .call()
        .with_context(|| format!("downloading {}", source.checksum_url))?
        .into_string()
        .context("failed to read checksum file")?;
    verify_checksum(&data, &checksums, &source.asset)?;

    let binary = extract_binary(&data, source.archive, &source.binary)?;
    place_binary(&binary, bin_dir, &source.binary)
}

fn download(url: &str) -> Result<Vec<u8>> {
    let response = ureq::get(url).call().context("request failed")?;
    let mut data = Vec::new();
    response
        .into_reader()
        .take(MAX_ASSET_BYTES)
        .read_to_end(&mut data)
        .context("failed to read release asset")?;
    Ok(data)
}

/// Compare the SHA-256 of `data` with the published checksum for `asset`.
///
/// # Errors
///
/// Returns an error if `checksums` has no entry for `asset` or the digests
/// differ.
pub fn verify_checksum(data: &[u8], checksums: &str, asset: &str) -> Result<()> {
    let expected = expected_checksum(checksums, asset)
        .ok_or_else(|| anyhow::anyhow!("no checksum published for {asset}"))?;
    let actual = hex_encode(&Sha256::digest(data));
    anyhow::ensure!(
        actual == expected,
        "checksum mismatch for {asset}: expected {expected}, got {actual}"
    );
    Ok(())
}

/// Pull the file named `binary` out of a release archive, wherever it sits.
///
/// # Errors
///
/// Returns an error if the archive is corrupt or holds no such file.
pub fn extract_binary(data: &[u8], kind: ArchiveKind, binary: &str) -> Result<Vec<u8>> {
    let is_binary = |path: &Path| path.file_name().is_some_and(|n| n == binary);
    match kind {
        ArchiveKind::Zip => {
            let mut archive = zip::ZipArchive::new(Cursor::new(data)).context("opening zip")?;
            for i in 0..archive.len() {
                let mut file = archive.by_index(i).context("reading zip entry")?;
                if !file.is_dir() && file.enclosed_name().is_some_and(|p| is_binary(&p)) {
                    let mut content = Vec::new();
                    file.read_to_end(&mut content).context("reading binary")?;
                    return Ok(content);
                }
            }
        }
        ArchiveKind::TarGz | ArchiveKind::Tar => {
            let reader: Box<dyn Read + '_> = if kind == ArchiveKind::TarGz {
                Box::new(flate2::read::GzDecoder::new(data))
            } else {
                Box::new(data)
            };
            let mut archive = tar::Archive::new(reader);
            for entry in archive.entries().context("reading tar entries")? {
                let mut entry = entry.context("reading tar entry")?;
                let path = entry.path().context("reading tar entry path")?.into_owned();
                if entry.header().entry_type().is_file() && is_binary(&path) {
                    let mut content = Vec::new();
                    entry.read_to_end(&mut content).context("reading binary")?;
                    return Ok(content);
                }
            }
        }
    }
    anyhow::bail!("{binary} not found in release archive")
}

/// Write `content` to `bin_dir/name` as an executable.
///
/// The file is written under a temporary name and renamed into place, so an
/// interrupted install never leaves a truncated binary behind.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn place_binary(content: &[u8], bin_dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(bin_dir)
        .with_context(|| format!("cannot create {}", bin_dir.display()))?;
    let mut staged = tempfile::NamedTempFile::new_in(bin_dir)
        .with_context(|| format!("cannot write to {}", bin_dir.display()))?;
    staged
        .write_all(content)
        .with_context(|| format!("cannot write to {}", bin_dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
            .context("cannot make binary executable")?;
    }

    let dest = bin_dir.join(name);
    staged
        .persist(&dest)
        .with_context(|| format!("cannot place {}", dest.display()))?;
    Ok(dest)
}
