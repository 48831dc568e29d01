// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};

/// `PO_YYYYMMDD_HHMMSS.html` for the given instant.
pub fn artifact_file_name(now: OffsetDateTime) -> String {
    let stamp = now
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "19700101_000000".to_owned());
    format!("PO_{stamp}.html")
}

/// Writes the document under `output_dir`, creating the directory first.
/// A second write in the same second replaces the earlier file.
pub fn write_artifact(output_dir: &Path, html: &str, now: OffsetDateTime) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let path = output_dir.join(artifact_file_name(now));
    fs::write(&path, html).with_context(|| format!("write order {}", path.display()))?;
    info!(path = %path.display(), bytes = html.len(), "wrote order");
    Ok(path)
}

pub trait ArtifactViewer {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Opens files with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl ArtifactViewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<()> {
        open::that(path).with_context(|| format!("open {} in the default viewer", path.display()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewer;

impl ArtifactViewer for NoopViewer {
    fn open(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Viewer failures never fail generation; the file is already on disk.
pub(crate) fn open_quietly(viewer: &dyn ArtifactViewer, path: &Path) {
    if let Err(error) = viewer.open(path) {
        warn!(path = %path.display(), error = %format!("{error:#}"), "cannot open generated order");
    }
}

#[cfg(test)]
mod tests {
    use super::artifact_file_name;
    use time::macros::datetime;

    #[test]
    fn file_name_pads_every_component() {
        assert_eq!(
            artifact_file_name(datetime!(2024-01-03 04:05:06 UTC)),
            "PO_20240103_040506.html"
        );
        assert_eq!(
            artifact_file_name(datetime!(2024-12-31 23:59:59 +8)),
            "PO_20241231_235959.html"
        );
    }
}
