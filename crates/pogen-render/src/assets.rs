// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use base64::{Engine, engine::general_purpose::STANDARD};
use pogen_app::PlaceholderName;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Optional images embedded into every generated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAssets {
    pub logo: PathBuf,
    pub stamp: PathBuf,
    pub sales_rep_stamp: PathBuf,
}

impl Default for ImageAssets {
    fn default() -> Self {
        Self {
            logo: PathBuf::from("logo.png"),
            stamp: PathBuf::from("stamp.png"),
            sales_rep_stamp: PathBuf::from("sales_rep_stamp.png"),
        }
    }
}

impl ImageAssets {
    /// Placeholder and data URI pairs, in substitution order.
    pub fn data_uris(&self) -> [(PlaceholderName, String); 3] {
        [
            (PlaceholderName::LOGO, image_data_uri(&self.logo)),
            (PlaceholderName::STAMP, image_data_uri(&self.stamp)),
            (
                PlaceholderName::SALES_REP_STAMP,
                image_data_uri(&self.sales_rep_stamp),
            ),
        ]
    }
}

/// Reads an image into `data:<mime>;base64,<payload>`.
///
/// A missing file yields an empty string so the template's `<img>` renders
/// nothing. A file that exists but cannot be read is logged and treated the
/// same way.
pub fn image_data_uri(path: &Path) -> String {
    if !path.exists() {
        debug!(path = %path.display(), "image not found, embedding nothing");
        return String::new();
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(path = %path.display(), %error, "cannot read image, embedding nothing");
            return String::new();
        }
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::{ImageAssets, image_data_uri};
    use anyhow::Result;
    use std::fs;
    use std::path::Path;

    #[test]
    fn missing_image_is_empty() {
        assert_eq!(image_data_uri(Path::new("/nonexistent/pogen/logo.png")), "");
    }

    #[test]
    fn mime_follows_extension() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let jpeg = dir.path().join("stamp.jpg");
        fs::write(&jpeg, b"abc")?;
        assert_eq!(image_data_uri(&jpeg), "data:image/jpeg;base64,YWJj");

        let unknown = dir.path().join("stamp.pogenblob");
        fs::write(&unknown, b"abc")?;
        assert_eq!(
            image_data_uri(&unknown),
            "data:application/octet-stream;base64,YWJj"
        );
        Ok(())
    }

    #[test]
    fn directory_in_place_of_image_is_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let assets = ImageAssets {
            logo: dir.path().to_path_buf(),
            ..ImageAssets::default()
        };
        assert_eq!(assets.data_uris()[0].1, "");
        Ok(())
    }
}
