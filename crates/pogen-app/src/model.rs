// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Line,
    Multiline,
    Date,
}

/// Every field of the order form, declared in template order.
///
/// The serialized name of each variant is also its template placeholder name,
/// so `FieldKey::SupplierName` fills `{{supplier_name}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    SupplierName,
    SupplierAddress,
    SupplierAttn,
    SupplierTel,
    PoNumber,
    PoDate,
    InternalNo,
    EtdPort,
    EtdDate,
    ShipTo,
    ShipAddress,
    ShipAttn,
    ShipTel,
    DeliveryTerms,
    Forwarder,
    PaymentTerms,
    Currency,
    Packing,
    Remark,
    IssuerName,
}

impl FieldKey {
    pub const ALL: [Self; 20] = [
        Self::SupplierName,
        Self::SupplierAddress,
        Self::SupplierAttn,
        Self::SupplierTel,
        Self::PoNumber,
        Self::PoDate,
        Self::InternalNo,
        Self::EtdPort,
        Self::EtdDate,
        Self::ShipTo,
        Self::ShipAddress,
        Self::ShipAttn,
        Self::ShipTel,
        Self::DeliveryTerms,
        Self::Forwarder,
        Self::PaymentTerms,
        Self::Currency,
        Self::Packing,
        Self::Remark,
        Self::IssuerName,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SupplierName => "supplier_name",
            Self::SupplierAddress => "supplier_address",
            Self::SupplierAttn => "supplier_attn",
            Self::SupplierTel => "supplier_tel",
            Self::PoNumber => "po_number",
            Self::PoDate => "po_date",
            Self::InternalNo => "internal_no",
            Self::EtdPort => "etd_port",
            Self::EtdDate => "etd_date",
            Self::ShipTo => "ship_to",
            Self::ShipAddress => "ship_address",
            Self::ShipAttn => "ship_attn",
            Self::ShipTel => "ship_tel",
            Self::DeliveryTerms => "delivery_terms",
            Self::Forwarder => "forwarder",
            Self::PaymentTerms => "payment_terms",
            Self::Currency => "currency",
            Self::Packing => "packing",
            Self::Remark => "remark",
            Self::IssuerName => "issuer_name",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::SupplierAddress | Self::ShipAddress | Self::PaymentTerms | Self::Remark => {
                FieldKind::Multiline
            }
            Self::PoDate => FieldKind::Date,
            _ => FieldKind::Line,
        }
    }

    /// The record kind a field is saved with, or `None` for order header fields.
    pub fn record_kind(self) -> Option<RecordKind> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.fields().contains(&self))
    }

    pub const fn default_value(self) -> &'static str {
        match self {
            Self::EtdDate => "ASAP",
            _ => "",
        }
    }

    pub const fn placeholder(self) -> PlaceholderName {
        PlaceholderName(self.as_str())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{{name}}` token understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderName(&'static str);

impl PlaceholderName {
    pub const LOGO: Self = Self("logo_b64");
    pub const STAMP: Self = Self("stamp_b64");
    pub const SALES_REP_STAMP: Self = Self("sales_rep_stamp_b64");
    pub const ITEMS: Self = Self("items_html");
    pub const TOTAL: Self = Self("total_amount");

    pub const fn name(self) -> &'static str {
        self.0
    }

    pub fn token(self) -> String {
        format!("{{{{{}}}}}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Supplier,
    ShipTo,
    TradeTerms,
    FooterTerms,
}

impl RecordKind {
    pub const ALL: [Self; 4] = [
        Self::Supplier,
        Self::ShipTo,
        Self::TradeTerms,
        Self::FooterTerms,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::ShipTo => "ship_to",
            Self::TradeTerms => "trade_terms",
            Self::FooterTerms => "footer_terms",
        }
    }

    /// Accepts both `ship_to` and `ship-to` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    pub const fn table(self) -> &'static str {
        self.as_str()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::ShipTo => "ship to",
            Self::TradeTerms => "trade terms",
            Self::FooterTerms => "footer",
        }
    }

    pub const fn fields(self) -> &'static [FieldKey] {
        match self {
            Self::Supplier => &[
                FieldKey::SupplierName,
                FieldKey::SupplierAddress,
                FieldKey::SupplierAttn,
                FieldKey::SupplierTel,
            ],
            Self::ShipTo => &[
                FieldKey::ShipTo,
                FieldKey::ShipAddress,
                FieldKey::ShipAttn,
                FieldKey::ShipTel,
            ],
            Self::TradeTerms => &[
                FieldKey::DeliveryTerms,
                FieldKey::Forwarder,
                FieldKey::PaymentTerms,
                FieldKey::Currency,
            ],
            Self::FooterTerms => &[
                FieldKey::Packing,
                FieldKey::Remark,
                FieldKey::IssuerName,
            ],
        }
    }

    /// Column shown next to the id in selection labels.
    pub const fn label_field(self) -> FieldKey {
        match self {
            Self::Supplier => FieldKey::SupplierName,
            Self::ShipTo => FieldKey::ShipTo,
            Self::TradeTerms => FieldKey::DeliveryTerms,
            Self::FooterTerms => FieldKey::IssuerName,
        }
    }

    pub fn allowed_keys(self) -> String {
        self.fields()
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub fields: BTreeMap<FieldKey, String>,
}

impl Record {
    pub fn get(&self, key: FieldKey) -> &str {
        self.fields.get(&key).map_or("", String::as_str)
    }

    pub fn label(&self) -> RecordLabel {
        RecordLabel {
            id: self.id,
            name: self.get(self.kind.label_field()).to_owned(),
        }
    }
}

/// One entry of a record picker, shown as `"<id> | <name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLabel {
    pub id: RecordId,
    pub name: String,
}

impl RecordLabel {
    /// Reads the id back out of a picker label. A bare id is accepted too.
    pub fn parse_id(label: &str) -> Option<RecordId> {
        let head = label.split('|').next().unwrap_or_default().trim();
        head.parse::<i64>().ok().map(RecordId::new)
    }
}

impl fmt::Display for RecordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.id, self.name)
    }
}
