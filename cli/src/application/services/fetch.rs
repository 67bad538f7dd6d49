//! Artifact fetching and bundle normalization.

use std::path::Path;

use anyhow::Result;
use pullrun_common::ArtifactCoordinate;

use crate::application::ports::{BundleFs, RegistryClient};
use crate::domain::LaunchError;
use crate::domain::bundle::{ArchiveKind, METADATA_FILE, is_recognizable};
use crate::domain::tools::ToolHandle;

/// Pull `coordinate` into `dest` and expand any bundled archives.
///
/// The pull and its normalization happen in a fresh staging directory inside
/// `dest`. Only once the bundle is recognized are its entries moved into
/// `dest`, replacing those of an earlier pull; other files in `dest` are left
/// alone. Returns the sorted names of the published entries.
///
/// # Errors
///
/// Returns `LaunchError::FetchFailed` if the pull, an archive expansion or
/// publishing fails, and `LaunchError::NoArtifactFound` if the normalized
/// bundle holds neither a reserved script nor a packaged-program file.
pub async fn fetch(
    coordinate: &ArtifactCoordinate,
    dest: &Path,
    client: &ToolHandle,
    host: &(impl RegistryClient + BundleFs),
) -> Result<Vec<String>> {
    let reference = coordinate.reference();
    let staging = host
        .stage(dest)
        .map_err(|e| LaunchError::fetch(&reference, e))?;
    tracing::debug!(%reference, staging = %staging.display(), "pulling artifact");

    let entries = match normalize(&reference, &staging, client, host).await {
        Ok(entries) => entries,
        Err(e) => {
            if let Err(cleanup) = host.discard(&staging) {
                tracing::warn!("leaving {}: {cleanup:#}", staging.display());
            }
            return Err(e);
        }
    };

    host.publish(&staging, dest, &entries)
        .map_err(|e| LaunchError::fetch(&reference, e))?;
    log_metadata(host, dest);
    Ok(entries)
}

async fn normalize(
    reference: &str,
    staging: &Path,
    client: &ToolHandle,
    host: &(impl RegistryClient + BundleFs),
) -> Result<Vec<String>> {
    host.pull(&client.program, reference, staging)
        .await
        .map_err(|e| LaunchError::fetch(reference, e))?;

    let pulled = host
        .list(staging)
        .map_err(|e| LaunchError::fetch(reference, e))?;
    for name in &pulled {
        if ArchiveKind::from_file_name(name).is_none() {
            continue;
        }
        let archive = staging.join(name);
        tracing::debug!(archive = %name, "expanding bundled archive");
        host.expand(&archive, staging)
            .and_then(|()| host.remove(&archive))
            .map_err(|e| LaunchError::fetch(reference, e))?;
    }

    let entries = host
        .list(staging)
        .map_err(|e| LaunchError::fetch(reference, e))?;
    if !is_recognizable(&entries) {
        return Err(LaunchError::NoArtifactFound {
            reference: reference.to_string(),
            entries,
        }
        .into());
    }
    Ok(entries)
}

/// Metadata is informational only; a broken file is logged and ignored.
fn log_metadata(host: &impl BundleFs, dest: &Path) {
    match host.read_json(&dest.join(METADATA_FILE)) {
        Ok(Some(metadata)) => tracing::info!(%metadata, "bundle metadata"),
        Ok(None) => {}
        Err(e) => tracing::warn!("ignoring unreadable {METADATA_FILE}: {e:#}"),
    }
}
