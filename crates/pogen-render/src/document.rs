// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use pogen_app::{FieldKey, FieldKind, LineItem, OrderForm, PlaceholderName, fmt_date, format_amount};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::ImageAssets;

pub const DEFAULT_TEMPLATE: &str = include_str!("../../../templates/template.html");

pub fn load_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| {
        format!(
            "read template {} -- create it (see `pogen --print-example-template`) or set [render].template_path",
            path.display()
        )
    })
}

/// Fills every known placeholder in `template`. Tokens nobody knows about are
/// left as written and no HTML escaping is applied.
pub fn render_document(template: &str, form: &OrderForm, images: &ImageAssets) -> String {
    let mut html = template.to_owned();

    for (placeholder, uri) in images.data_uris() {
        html = html.replace(&placeholder.token(), &uri);
    }

    for key in FieldKey::ALL {
        let value = field_html(form, key);
        html = html.replace(&key.placeholder().token(), &value);
    }

    let (rows, total) = items_table(form.items());
    debug!(rows = form.items().len(), total = %total, "rendered item table");
    html = html.replace(&PlaceholderName::ITEMS.token(), &rows);
    html.replace(&PlaceholderName::TOTAL.token(), &total)
}

fn field_html(form: &OrderForm, key: FieldKey) -> String {
    match key.kind() {
        FieldKind::Date => fmt_date(form.po_date()),
        FieldKind::Multiline => form.field(key).trim().replace('\n', "<br>"),
        FieldKind::Line => form.field(key).into_owned(),
    }
}

/// Table rows plus the grand total, computed fresh from quantities and prices.
fn items_table(items: &[LineItem]) -> (String, String) {
    let mut rows = String::new();
    let mut sum = 0.0;
    for item in items {
        let amount = item.amount();
        sum += amount;
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            item.item_no,
            item.description,
            item.quantity,
            item.unit_price,
            format_amount(amount)
        ));
    }
    (rows, format_amount(sum))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TEMPLATE, items_table};
    use pogen_app::{FieldKey, LineItem, PlaceholderName};

    #[test]
    fn default_template_uses_every_placeholder() {
        for key in FieldKey::ALL {
            assert!(
                DEFAULT_TEMPLATE.contains(&key.placeholder().token()),
                "key {key}"
            );
        }
        for placeholder in [
            PlaceholderName::LOGO,
            PlaceholderName::STAMP,
            PlaceholderName::SALES_REP_STAMP,
            PlaceholderName::ITEMS,
            PlaceholderName::TOTAL,
        ] {
            assert!(DEFAULT_TEMPLATE.contains(&placeholder.token()));
        }
    }

    #[test]
    fn items_table_uses_raw_text_and_formatted_totals() {
        let (rows, total) = items_table(&[
            LineItem::new("A1", "Bolt", "1,000", "1.5"),
            LineItem::new("A2", "Nut", "abc", "9"),
        ]);
        assert_eq!(
            rows,
            "<tr><td>A1</td><td>Bolt</td><td>1,000</td><td>1.5</td><td>1,500.00</td></tr>\n\
             <tr><td>A2</td><td>Nut</td><td>abc</td><td>9</td><td>0.00</td></tr>\n"
        );
        assert_eq!(total, "1,500.00");
    }

    #[test]
    fn empty_items_render_zero_total() {
        assert_eq!(items_table(&[]), (String::new(), "0.00".to_owned()));
    }
}
