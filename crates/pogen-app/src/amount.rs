// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Lenient money handling for line items.
//!
//! Quantities and prices are typed free-form, so parsing never fails: anything
//! that does not read as a finite decimal counts as zero.

pub const ZERO_AMOUNT: &str = "0.00";

/// `"1,234.56"` -> `1234.56`. Malformed, empty or non-finite input -> `0.0`.
pub fn parse_amount(input: &str) -> f64 {
    let clean = input.replace(',', "");
    match clean.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// `1234.5` -> `"1,234.50"`. Non-finite values render as `"0.00"`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return ZERO_AMOUNT.to_owned();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let Some((whole, frac)) = fixed.split_once('.') else {
        return ZERO_AMOUNT.to_owned();
    };
    format!("{sign}{}.{frac}", comma_format(whole))
}

fn comma_format(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let mut chars = digits.chars().collect::<Vec<_>>();
    let mut count = 0usize;
    while let Some(ch) = chars.pop() {
        if count == 3 {
            out.push(',');
            count = 0;
        }
        out.push(ch);
        count += 1;
    }
    out.chars().rev().collect()
}
