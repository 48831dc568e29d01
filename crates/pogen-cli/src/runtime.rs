// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use pogen_app::{OrderForm, OrderRuntime, Record, RecordId, RecordInput, RecordKind, RecordLabel};
use pogen_db::Store;
use pogen_render::Renderer;
use std::path::PathBuf;
use tracing::debug;

pub struct DbRuntime<'a> {
    store: &'a Store,
    renderer: Renderer,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a Store, renderer: Renderer) -> Self {
        Self { store, renderer }
    }
}

impl OrderRuntime for DbRuntime<'_> {
    fn load_all(&mut self, kind: RecordKind) -> Result<Vec<RecordLabel>> {
        let labels = self.store.list_labels(kind)?;
        debug!(kind = kind.as_str(), count = labels.len(), "loaded record labels");
        Ok(labels)
    }

    fn load_record(&mut self, kind: RecordKind, id: RecordId) -> Result<Record> {
        self.store.get_record(kind, id)
    }

    fn save(&mut self, input: &RecordInput) -> Result<RecordId> {
        self.store.create_record(input)
    }

    fn render(&mut self, form: &OrderForm) -> Result<PathBuf> {
        self.renderer.generate(form)
    }
}
