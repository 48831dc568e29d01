// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use time::Date;

use crate::{
    FieldKey, FieldKind, Record, RecordKind, ZERO_AMOUNT, format_amount, format_iso_date,
    parse_amount, parse_iso_date, today,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub item_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    /// Display-only, rewritten by every recalculation.
    #[serde(default, skip_deserializing)]
    pub total: String,
}

impl LineItem {
    pub fn new(item_no: &str, description: &str, quantity: &str, unit_price: &str) -> Self {
        Self {
            item_no: item_no.to_owned(),
            description: description.to_owned(),
            quantity: quantity.to_owned(),
            unit_price: unit_price.to_owned(),
            total: ZERO_AMOUNT.to_owned(),
        }
    }

    pub fn amount(&self) -> f64 {
        parse_amount(&self.quantity) * parse_amount(&self.unit_price)
    }

    fn cell_mut(&mut self, column: ItemColumn) -> &mut String {
        match column {
            ItemColumn::ItemNo => &mut self.item_no,
            ItemColumn::Description => &mut self.description,
            ItemColumn::Quantity => &mut self.quantity,
            ItemColumn::UnitPrice => &mut self.unit_price,
        }
    }
}

/// Editable columns of an item row. The total column is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemColumn {
    ItemNo,
    Description,
    Quantity,
    UnitPrice,
}

impl ItemColumn {
    pub const fn triggers_recalc(self) -> bool {
        matches!(self, Self::Quantity | Self::UnitPrice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub row_totals: Vec<String>,
    pub grand_total: String,
}

/// Transient state of one purchase order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    fields: BTreeMap<FieldKey, String>,
    po_date: Date,
    items: Vec<LineItem>,
    total_amount: String,
}

impl OrderForm {
    /// A blank form: default field values and a single empty row.
    pub fn new(po_date: Date) -> Self {
        let fields = FieldKey::ALL
            .into_iter()
            .filter(|key| key.kind() != FieldKind::Date)
            .map(|key| (key, key.default_value().to_owned()))
            .collect();
        let mut form = Self {
            fields,
            po_date,
            items: Vec::new(),
            total_amount: ZERO_AMOUNT.to_owned(),
        };
        form.add_row();
        form
    }

    pub fn blank_today() -> Self {
        Self::new(today())
    }

    /// Current text of a field. The order date comes back as `YYYY-MM-DD`.
    pub fn field(&self, key: FieldKey) -> Cow<'_, str> {
        match key.kind() {
            FieldKind::Date => Cow::Owned(format_iso_date(self.po_date)),
            FieldKind::Line | FieldKind::Multiline => {
                Cow::Borrowed(self.fields.get(&key).map_or("", String::as_str))
            }
        }
    }

    pub fn set_field(&mut self, key: FieldKey, value: &str) -> Result<()> {
        match key.kind() {
            FieldKind::Date => self.po_date = parse_iso_date(value)?,
            FieldKind::Line | FieldKind::Multiline => {
                self.fields.insert(key, value.to_owned());
            }
        }
        Ok(())
    }

    pub fn po_date(&self) -> Date {
        self.po_date
    }

    pub fn set_po_date(&mut self, date: Date) {
        self.po_date = date;
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> &str {
        &self.total_amount
    }

    /// Appends an empty row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.items.push(LineItem::new("", "", "", ""));
        self.items.len() - 1
    }

    /// Replaces every row, then recalculates.
    pub fn replace_items(&mut self, items: Vec<LineItem>) -> Totals {
        self.items = items;
        self.recalculate()
    }

    /// Writes one cell. Returns the fresh totals when the edit touched a
    /// quantity or price, `None` otherwise.
    pub fn edit_cell(
        &mut self,
        row: usize,
        column: ItemColumn,
        value: &str,
    ) -> Result<Option<Totals>> {
        let Some(item) = self.items.get_mut(row) else {
            bail!(
                "item row {row} does not exist; the order has {} row(s)",
                self.items.len()
            );
        };
        *item.cell_mut(column) = value.to_owned();
        if column.triggers_recalc() {
            return Ok(Some(self.recalculate()));
        }
        Ok(None)
    }

    /// Removes a row; later rows move up by one and totals are recomputed.
    pub fn remove_row(&mut self, row: usize) -> Result<(LineItem, Totals)> {
        if row >= self.items.len() {
            bail!(
                "item row {row} does not exist; the order has {} row(s)",
                self.items.len()
            );
        }
        let removed = self.items.remove(row);
        let totals = self.recalculate();
        Ok((removed, totals))
    }

    /// Recomputes every row total and the grand total from scratch.
    pub fn recalculate(&mut self) -> Totals {
        let mut sum = 0.0;
        let mut row_totals = Vec::with_capacity(self.items.len());
        for item in &mut self.items {
            let amount = item.amount();
            item.total = format_amount(amount);
            row_totals.push(item.total.clone());
            sum += amount;
        }
        self.total_amount = format_amount(sum);
        Totals {
            row_totals,
            grand_total: self.total_amount.clone(),
        }
    }

    /// Copies a saved record's fields into the form.
    pub fn apply_record(&mut self, record: &Record) {
        for key in record.kind.fields() {
            self.fields.insert(*key, record.get(*key).to_owned());
        }
    }

    /// Collects the current values of one record kind's fields for saving.
    pub fn record_input(&self, kind: RecordKind) -> RecordInput {
        let fields = kind
            .fields()
            .iter()
            .map(|key| (*key, self.field(*key).into_owned()))
            .collect();
        RecordInput { kind, fields }
    }
}

/// Field values for a new saved record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    pub kind: RecordKind,
    pub fields: BTreeMap<FieldKey, String>,
}

impl RecordInput {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    /// Builds an input from `key=value` style pairs, rejecting keys that do not
    /// belong to `kind`.
    pub fn from_pairs<I, K, V>(kind: RecordKind, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut input = Self::new(kind);
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(field) = FieldKey::parse(key) else {
                bail!(
                    "unknown field {key:?} for {kind}; expected one of: {}",
                    kind.allowed_keys()
                );
            };
            input.fields.insert(field, value.into());
        }
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(stray) = self
            .fields
            .keys()
            .find(|key| !self.kind.fields().contains(key))
        {
            bail!(
                "field {stray} does not belong to {}; expected one of: {}",
                self.kind,
                self.kind.allowed_keys()
            );
        }
        Ok(())
    }

    /// Column values in table order. Missing fields are empty and multi-line
    /// values lose surrounding whitespace.
    pub fn column_values(&self) -> Vec<String> {
        self.kind
            .fields()
            .iter()
            .map(|key| {
                let raw = self.fields.get(key).map_or("", String::as_str);
                match key.kind() {
                    FieldKind::Multiline => raw.trim().to_owned(),
                    FieldKind::Line | FieldKind::Date => raw.to_owned(),
                }
            })
            .collect()
    }
}
