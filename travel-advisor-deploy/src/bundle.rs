//! Packs the agent's source packages into a reproducible `.tar.gz`.

use crate::error::{DeployError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

#[derive(Debug, Clone)]
pub struct Bundle {
    pub bytes: Vec<u8>,
    /// Hex sha256 of `bytes`.
    pub digest: String,
    /// Archive paths, in the order they were written.
    pub entries: Vec<String>,
}

impl Bundle {
    /// `agent_engine/<slug>/<digest prefix>/bundle.tar.gz`
    pub fn object_name(&self, slug: &str) -> String {
        format!("{}/bundle.tar.gz", self.object_prefix(slug))
    }

    pub fn object_prefix(&self, slug: &str) -> String {
        format!("agent_engine/{slug}/{}", &self.digest[..12])
    }
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

/// Files under `root`, sorted, skipping hidden entries and build output.
fn collect_files(root: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(root)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name();
        if is_skipped(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn archive_name(package: &Path, file: &Path) -> Result<String> {
    let package_name = package
        .canonicalize()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DeployError::Manifest(format!("cannot name package at {}", package.display()))
        })?;
    let relative = file.strip_prefix(package).map_err(|_| {
        DeployError::Manifest(format!("{} is outside {}", file.display(), package.display()))
    })?;
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(format!("{package_name}/{relative}"))
}

/// Builds a gzipped tarball of `packages`. Identical inputs give identical bytes.
#[tracing::instrument(skip_all, fields(packages = packages.len()))]
pub fn build_bundle(packages: &[PathBuf]) -> Result<Bundle> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let mut entries = Vec::new();

    for package in packages {
        let mut files = Vec::new();
        if package.is_file() {
            files.push(package.clone());
        } else {
            collect_files(package, &mut files)?;
        }

        for file in files {
            let name = if package.is_file() {
                package
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            } else {
                archive_name(package, &file)?
            };
            let data = fs::read(&file)?;

            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);
            header.set_cksum();
            builder.append_data(&mut header, &name, data.as_slice())?;
            entries.push(name);
        }
    }

    let bytes = builder.into_inner()?.finish()?;
    let digest = hex::encode(Sha256::digest(&bytes));
    tracing::info!(files = entries.len(), size = bytes.len(), %digest, "bundle built");
    Ok(Bundle { bytes, digest, entries })
}
