//! Workspace bundles: a zip holding `manifest.json` and the slot database.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const BUNDLE_FORMAT_V1: &str = "lessonlog-workspace-v1";
const MANIFEST_ENTRY: &str = "manifest.json";
const DB_ENTRY: &str = "db/lessonlog.sqlite3";
const DB_FILE_NAME: &str = "lessonlog.sqlite3";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    format: String,
    #[serde(default)]
    app_version: String,
    #[serde(default)]
    exported_at: String,
    db_sha256: String,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub checksum: String,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

pub fn export_workspace_bundle(workspace: &Path, out_path: &Path) -> anyhow::Result<ExportSummary> {
    let db_path = workspace.join(DB_FILE_NAME);
    let db_bytes = std::fs::read(&db_path)
        .with_context(|| format!("failed to read workspace database {}", db_path.display()))?;
    let manifest = Manifest {
        format: BUNDLE_FORMAT_V1.to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        exported_at: chrono::Utc::now().to_rfc3339(),
        db_sha256: sha256_hex(&db_bytes),
    };

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let out = File::create(out_path)
        .with_context(|| format!("failed to create bundle {}", out_path.display()))?;
    let mut zip = ZipWriter::new(out);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_ENTRY, opts)?;
    zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;
    zip.start_file(DB_ENTRY, opts)?;
    zip.write_all(&db_bytes)?;
    zip.finish().context("failed to finalize bundle")?;

    Ok(ExportSummary {
        bundle_format: manifest.format,
        entry_count: 2,
        checksum: manifest.db_sha256,
    })
}

/// Replaces the workspace database with the one in the bundle after checking
/// its checksum. The caller must have closed its connection.
pub fn import_workspace_bundle(in_path: &Path, workspace: &Path) -> anyhow::Result<ImportSummary> {
    let file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.display()))?;
    let mut archive = ZipArchive::new(file).context("bundle is not a zip archive")?;

    let manifest: Manifest = {
        let entry = archive
            .by_name(MANIFEST_ENTRY)
            .context("bundle has no manifest.json")?;
        serde_json::from_reader(entry).context("manifest.json is invalid")?
    };
    if manifest.format != BUNDLE_FORMAT_V1 {
        bail!("unsupported bundle format: {}", manifest.format);
    }

    let mut db_bytes = Vec::new();
    archive
        .by_name(DB_ENTRY)
        .with_context(|| format!("bundle has no {}", DB_ENTRY))?
        .read_to_end(&mut db_bytes)
        .context("failed to extract database")?;
    let actual = sha256_hex(&db_bytes);
    if actual != manifest.db_sha256 {
        bail!(
            "database checksum mismatch: manifest {}, bundle {}",
            manifest.db_sha256,
            actual
        );
    }

    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.display()))?;
    let staged = workspace.join(format!("{}.importing", DB_FILE_NAME));
    std::fs::write(&staged, &db_bytes)
        .with_context(|| format!("failed to stage database {}", staged.display()))?;
    let dst = workspace.join(DB_FILE_NAME);
    if dst.exists() {
        std::fs::remove_file(&dst)
            .with_context(|| format!("failed to remove old database {}", dst.display()))?;
    }
    std::fs::rename(&staged, &dst)
        .with_context(|| format!("failed to move restored database to {}", dst.display()))?;

    Ok(ImportSummary {
        bundle_format_detected: manifest.format,
    })
}
