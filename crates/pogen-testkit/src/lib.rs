// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use pogen_app::{FieldKey, LineItem, OrderForm, RecordInput, RecordKind};
use std::path::PathBuf;
use time::{Date, Month};

const COMPANY_WORDS: [&str; 12] = [
    "Harbor", "Summit", "Pacific", "Northwind", "Granite", "Eagle", "Apex", "Meridian",
    "Cedar", "Bluewater", "Heritage", "Orion",
];

const COMPANY_TRADES: [&str; 8] = [
    "Fasteners",
    "Castings",
    "Plastics",
    "Electronics",
    "Textiles",
    "Packaging",
    "Hardware",
    "Assembly",
];

const COMPANY_SUFFIXES: [&str; 5] = ["Ltd.", "Co.", "Inc.", "GmbH", "Trading"];

const FIRST_NAMES: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Walker", "Martin", "Lee", "Evans", "Lopez", "Chan", "Ward", "Young", "Diaz", "Reed", "Wong",
    "Brooks",
];

const STREETS: [&str; 8] = [
    "Wharf Road",
    "Industrial Pkwy",
    "Harbour Street",
    "Canal Avenue",
    "Mill Lane",
    "Dock Road",
    "Factory Way",
    "Quarry Drive",
];

const CITIES: [&str; 8] = [
    "Hong Kong",
    "Shenzhen",
    "Rotterdam",
    "Columbus",
    "Hamburg",
    "Singapore",
    "Busan",
    "Antwerp",
];

const PORTS: [&str; 6] = [
    "Hong Kong",
    "Yantian",
    "Shanghai",
    "Ningbo",
    "Busan",
    "Kaohsiung",
];

const INCOTERMS: [&str; 5] = ["FOB", "CIF", "EXW", "DAP", "CFR"];
const CURRENCIES: [&str; 4] = ["USD", "EUR", "HKD", "GBP"];

const PRODUCTS: [&str; 10] = [
    "Hex bolt M8x40",
    "Flange nut M10",
    "Injection-molded housing",
    "Cable harness 1.2m",
    "Corrugated carton 40x30",
    "Steel bracket",
    "Rubber gasket",
    "PCB assembly rev C",
    "Woven label",
    "Aluminium extrusion 2m",
];

/// A one-pixel transparent PNG.
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Generates reproducible records and order forms for tests.
#[derive(Debug, Clone)]
pub struct OrderFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl OrderFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn record_input(&mut self, kind: RecordKind) -> RecordInput {
        let values = match kind {
            RecordKind::Supplier => vec![
                self.company_name(),
                self.address(),
                self.person(),
                self.phone(),
            ],
            RecordKind::ShipTo => vec![
                self.company_name(),
                self.address(),
                "Receiving".to_owned(),
                self.phone(),
            ],
            RecordKind::TradeTerms => vec![
                format!("{} {}", self.pick(&INCOTERMS), self.pick(&PORTS)),
                format!("{} Logistics", self.pick(&COMPANY_WORDS)),
                format!(
                    "{}% deposit with order\nBalance against copy of B/L",
                    10 * (1 + self.int_n(5))
                ),
                self.pick(&CURRENCIES).to_owned(),
            ],
            RecordKind::FooterTerms => vec![
                "Export carton, palletized".to_owned(),
                "Quote PO number on all documents.\nAdvise shipping schedule.".to_owned(),
                self.person(),
            ],
        };
        RecordInput {
            kind,
            fields: kind.fields().iter().copied().zip(values).collect(),
        }
    }

    pub fn line_item(&mut self, index: usize) -> LineItem {
        let quantity = 10 * (1 + self.int_n(50));
        let cents = 25 + self.int_n(50_000);
        LineItem::new(
            &format!("{:03}", index + 1),
            self.pick(&PRODUCTS),
            &quantity.to_string(),
            &format!("{}.{:02}", cents / 100, cents % 100),
        )
    }

    /// A filled order with every record kind applied and `rows` line items.
    pub fn order_form(&mut self, po_date: Date, rows: usize) -> OrderForm {
        let mut form = OrderForm::new(po_date);
        for kind in RecordKind::ALL {
            let input = self.record_input(kind);
            for (key, value) in &input.fields {
                form.set_field(*key, value)
                    .expect("faker sets text fields only");
            }
        }
        let header = [
            (FieldKey::PoNumber, format!("PO-{:05}", self.int_n(100_000))),
            (FieldKey::InternalNo, format!("INT-{}", self.int_n(1_000))),
            (FieldKey::EtdPort, self.pick(&PORTS).to_owned()),
        ];
        for (key, value) in header {
            form.set_field(key, &value)
                .expect("faker sets text fields only");
        }
        let items = (0..rows).map(|index| self.line_item(index)).collect();
        form.replace_items(items);
        form
    }

    fn company_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(&COMPANY_WORDS),
            self.pick(&COMPANY_TRADES),
            self.pick(&COMPANY_SUFFIXES)
        )
    }

    fn address(&mut self) -> String {
        format!(
            "{} {}\n{}",
            1 + self.int_n(400),
            self.pick(&STREETS),
            self.pick(&CITIES)
        )
    }

    fn person(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn phone(&mut self) -> String {
        format!(
            "+{} {:04} {:04}",
            1 + self.int_n(98),
            self.int_n(10_000),
            self.int_n(10_000)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("pogen.db");
    Ok((dir, db_path))
}

pub fn fixture_date() -> Date {
    Date::from_calendar_date(2024, Month::January, 3).expect("valid fixture date")
}

/// A compact template that uses every placeholder plus one nobody fills.
pub fn minimal_template() -> String {
    let mut template = String::from("<html><body>\n");
    template.push_str("<img src=\"{{logo_b64}}\"><img src=\"{{stamp_b64}}\">");
    template.push_str("<img src=\"{{sales_rep_stamp_b64}}\">\n");
    for key in FieldKey::ALL {
        template.push_str(&format!("<p id=\"{0}\">{{{{{0}}}}}</p>\n", key.as_str()));
    }
    template.push_str("<table>{{items_html}}</table>\n");
    template.push_str("<p id=\"total\">{{total_amount}}</p>\n");
    template.push_str("<p id=\"extra\">{{unknown_field}}</p>\n");
    template.push_str("</body></html>\n");
    template
}

#[cfg(test)]
mod tests {
    use super::{OrderFaker, fixture_date, minimal_template};
    use pogen_app::{FieldKey, RecordKind, parse_amount};

    #[test]
    fn new_deterministic_seed() {
        let mut first = OrderFaker::new(42);
        let mut second = OrderFaker::new(42);
        for kind in RecordKind::ALL {
            assert_eq!(first.record_input(kind), second.record_input(kind));
        }
        assert_eq!(OrderFaker::new(0).seed(), 1);
    }

    #[test]
    fn record_input_fills_every_field() {
        let mut faker = OrderFaker::new(7);
        for kind in RecordKind::ALL {
            let input = faker.record_input(kind);
            assert_eq!(input.fields.len(), kind.fields().len(), "kind {kind}");
            assert!(input.validate().is_ok());
        }
    }

    #[test]
    fn order_form_totals_match_rows() {
        let mut faker = OrderFaker::new(3);
        let form = faker.order_form(fixture_date(), 4);
        assert_eq!(form.items().len(), 4);
        let sum: f64 = form.items().iter().map(|item| item.amount()).sum();
        assert!((parse_amount(form.total_amount()) - sum).abs() < 0.01);
        assert!(!form.field(FieldKey::SupplierName).is_empty());
    }

    #[test]
    fn minimal_template_lists_every_field() {
        let template = minimal_template();
        for key in FieldKey::ALL {
            assert!(template.contains(&key.placeholder().token()), "key {key}");
        }
        assert!(template.contains("{{unknown_field}}"));
    }
}
