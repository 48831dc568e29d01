// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use pogen_app::{
    FieldKey, FieldKind, FormCommand, LineItem, OrderForm, OrderRuntime, RecordId, RecordKind,
    format_iso_date, parse_iso_date, today,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk shape of an order being prepared from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_date: Option<String>,
    #[serde(default)]
    pub records: BTreeMap<String, i64>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl FormDocument {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read form file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| {
            format!(
                "parse form file {} -- run `pogen new-form` for a valid starting point",
                path.display()
            )
        })
    }

    pub fn from_form(form: &OrderForm) -> Self {
        let fields = FieldKey::ALL
            .into_iter()
            .filter(|key| key.kind() != FieldKind::Date)
            .map(|key| (key.as_str().to_owned(), form.field(key).into_owned()))
            .collect();
        Self {
            fields,
            po_date: Some(format_iso_date(form.po_date())),
            records: BTreeMap::new(),
            items: form.items().to_vec(),
        }
    }

    pub fn blank() -> Self {
        Self::from_form(&OrderForm::blank_today())
    }

    /// Builds the form: saved records first, then explicit fields, then rows.
    pub fn into_form(self, runtime: &mut dyn OrderRuntime) -> Result<OrderForm> {
        let po_date = match self.po_date.as_deref() {
            Some(raw) => parse_iso_date(raw)?,
            None => today(),
        };
        let mut form = OrderForm::new(po_date);

        for (kind_name, id) in &self.records {
            let kind = RecordKind::parse(kind_name).ok_or_else(|| {
                anyhow!(
                    "unknown record kind {kind_name:?} in form file; expected one of: {}",
                    kind_names()
                )
            })?;
            let record = runtime.load_record(kind, RecordId::new(*id))?;
            form.dispatch(FormCommand::ApplyRecord(record))?;
        }

        for (name, value) in self.fields {
            let key = FieldKey::parse(&name).ok_or_else(|| {
                anyhow!(
                    "unknown field {name:?} in form file; expected one of: {}",
                    field_names()
                )
            })?;
            form.dispatch(FormCommand::SetField { key, value })?;
        }

        if !self.items.is_empty() {
            form.replace_items(self.items);
        }
        debug!(rows = form.items().len(), total = %form.total_amount(), "built form");
        Ok(form)
    }
}

fn kind_names() -> String {
    RecordKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_names() -> String {
    FieldKey::ALL
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::FormDocument;
    use crate::runtime::DbRuntime;
    use anyhow::Result;
    use pogen_app::{FieldKey, OrderForm, RecordInput, RecordKind};
    use pogen_db::Store;
    use pogen_render::{ImageAssets, NoopViewer, Renderer};
    use pogen_testkit::fixture_date;
    use std::path::PathBuf;

    fn runtime(store: &Store) -> DbRuntime<'_> {
        let renderer = Renderer::new(
            PathBuf::from("template.html"),
            PathBuf::from("output"),
            ImageAssets::default(),
        )
        .with_viewer(Box::new(NoopViewer));
        DbRuntime::new(store, renderer)
    }

    #[test]
    fn explicit_fields_override_referenced_records() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let id = store.create_record(&RecordInput::from_pairs(
            RecordKind::Supplier,
            [("supplier_name", "Acme"), ("supplier_tel", "555")],
        )?)?;

        let document: FormDocument = serde_json::from_str(&format!(
            r#"{{
              "fields": {{ "supplier_name": "Acme HK", "po_number": "PO-1" }},
              "po_date": "2024-01-03",
              "records": {{ "supplier": {} }},
              "items": [ {{ "item_no": "A1", "description": "Bolt", "quantity": "2", "unit_price": "3.00" }} ]
            }}"#,
            id.get()
        ))?;

        let form = document.into_form(&mut runtime(&store))?;
        assert_eq!(form.field(FieldKey::SupplierName), "Acme HK");
        assert_eq!(form.field(FieldKey::SupplierTel), "555");
        assert_eq!(form.field(FieldKey::PoNumber), "PO-1");
        assert_eq!(form.po_date(), fixture_date());
        assert_eq!(form.items()[0].total, "6.00");
        assert_eq!(form.total_amount(), "6.00");
        Ok(())
    }

    #[test]
    fn record_kind_accepts_dashed_spelling() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let id = store.create_record(&RecordInput::from_pairs(
            RecordKind::ShipTo,
            [("ship_to", "Dock 3")],
        )?)?;

        let document = FormDocument {
            records: [("ship-to".to_owned(), id.get())].into_iter().collect(),
            ..FormDocument::default()
        };
        let form = document.into_form(&mut runtime(&store))?;
        assert_eq!(form.field(FieldKey::ShipTo), "Dock 3");
        assert_eq!(form.items().len(), 1);
        Ok(())
    }

    #[test]
    fn unknown_field_is_rejected() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let document = FormDocument {
            fields: [("po_numbr".to_owned(), "PO-1".to_owned())]
                .into_iter()
                .collect(),
            ..FormDocument::default()
        };
        let error = document
            .into_form(&mut runtime(&store))
            .expect_err("typo should fail");
        let message = error.to_string();
        assert!(message.contains("\"po_numbr\""));
        assert!(message.contains("po_number"));
        Ok(())
    }

    #[test]
    fn missing_record_and_bad_date_are_errors() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;

        let document = FormDocument {
            records: [("footer_terms".to_owned(), 9)].into_iter().collect(),
            ..FormDocument::default()
        };
        assert!(document.into_form(&mut runtime(&store)).is_err());

        let document = FormDocument {
            po_date: Some("03/01/2024".to_owned()),
            ..FormDocument::default()
        };
        let error = document
            .into_form(&mut runtime(&store))
            .expect_err("bad date should fail");
        assert!(error.to_string().contains("YYYY-MM-DD"));
        Ok(())
    }

    #[test]
    fn blank_document_carries_defaults() -> Result<()> {
        let blank = FormDocument::from_form(&OrderForm::new(fixture_date()));
        assert_eq!(blank.fields.get("etd_date").map(String::as_str), Some("ASAP"));
        assert!(!blank.fields.contains_key("po_date"));
        assert_eq!(blank.po_date.as_deref(), Some("2024-01-03"));
        assert_eq!(blank.items.len(), 1);

        let json = serde_json::to_string_pretty(&blank)?;
        let parsed: FormDocument = serde_json::from_str(&json)?;
        assert_eq!(parsed.fields, blank.fields);
        Ok(())
    }
}
