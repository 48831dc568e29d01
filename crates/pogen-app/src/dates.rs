// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";

/// Formats an order date as `"3rd Jan. 2024"`.
pub fn fmt_date(date: Date) -> String {
    let day = date.day();
    format!(
        "{day}{} {}. {:04}",
        ordinal_suffix(day),
        month_abbrev(date.month()),
        date.year()
    )
}

pub const fn ordinal_suffix(day: u8) -> &'static str {
    if day >= 11 && day <= 13 {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

pub const fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

pub fn parse_iso_date(input: &str) -> Result<Date> {
    Date::parse(input.trim(), &format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("invalid date {input:?}; use {DATE_LAYOUT}"))
}

pub fn format_iso_date(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_owned())
}

/// Local wall-clock time, falling back to UTC when the local offset is unknown.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn today() -> Date {
    local_now().date()
}
