// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod artifact;
pub mod assets;
pub mod document;

pub use artifact::*;
pub use assets::*;
pub use document::*;

use anyhow::Result;
use pogen_app::{OrderForm, local_now};
use std::path::PathBuf;
use tracing::debug;

/// Turns an order form into an HTML file on disk.
pub struct Renderer {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub images: ImageAssets,
    viewer: Box<dyn ArtifactViewer>,
}

impl Renderer {
    pub fn new(template_path: PathBuf, output_dir: PathBuf, images: ImageAssets) -> Self {
        Self {
            template_path,
            output_dir,
            images,
            viewer: Box::new(SystemViewer),
        }
    }

    pub fn with_viewer(mut self, viewer: Box<dyn ArtifactViewer>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Renders, writes `PO_<timestamp>.html` and hands it to the viewer.
    pub fn generate(&self, form: &OrderForm) -> Result<PathBuf> {
        let template = load_template(&self.template_path)?;
        debug!(template = %self.template_path.display(), "loaded template");
        let html = render_document(&template, form, &self.images);
        let path = write_artifact(&self.output_dir, &html, local_now())?;
        open_quietly(self.viewer.as_ref(), &path);
        Ok(path)
    }
}
