// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use crate::{FormCommand, FormEvent, OrderForm, Record, RecordId, RecordInput, RecordKind, RecordLabel};

/// Backend operations an editing surface calls into.
pub trait OrderRuntime {
    fn load_all(&mut self, kind: RecordKind) -> Result<Vec<RecordLabel>>;
    fn load_record(&mut self, kind: RecordKind, id: RecordId) -> Result<Record>;
    fn save(&mut self, input: &RecordInput) -> Result<RecordId>;
    fn render(&mut self, form: &OrderForm) -> Result<PathBuf>;

    /// Resolves a picker label (`"3 | Acme"` or `"3"`) and copies that record
    /// into the form.
    fn pick(
        &mut self,
        form: &mut OrderForm,
        kind: RecordKind,
        label: &str,
    ) -> Result<Vec<FormEvent>> {
        let id = RecordLabel::parse_id(label).ok_or_else(|| {
            anyhow!("cannot read a {} id from {label:?}; pick an entry like \"3 | name\"", kind.label())
        })?;
        let record = self.load_record(kind, id)?;
        form.dispatch(FormCommand::ApplyRecord(record))
    }

    /// Saves the form's current values for one record kind.
    fn save_from_form(&mut self, form: &OrderForm, kind: RecordKind) -> Result<RecordId> {
        self.save(&form.record_input(kind))
    }
}
