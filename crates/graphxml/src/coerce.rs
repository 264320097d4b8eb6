// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute string <-> typed value conversion.
//!
//! Parsing never fails: a malformed attribute decodes to a fallback so a
//! single bad value cannot abort reconstruction of the surrounding object.

/// Parse a floating point attribute. Non-numeric or non-finite input yields `0.0`.
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::debug!("non-numeric attribute value {:?} decoded as 0", text);
            0.0
        }
    }
}

/// Parse an integer attribute.
///
/// Accepts decimal fractions (truncated toward zero); anything else yields `0`.
pub fn parse_int(text: &str) -> i64 {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return v;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() < i64::MAX as f64 => v.trunc() as i64,
        _ => {
            log::debug!("non-integer attribute value {:?} decoded as 0", text);
            0
        }
    }
}

/// Parse a boolean attribute: `1` and `true` (any case) are true, everything else false.
pub fn parse_bool(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed == "1" || trimmed.eq_ignore_ascii_case("true")
}

/// Match an enum attribute against its declared variants (case-insensitive).
///
/// Returns the canonical spelling of the variant, or `None` when nothing matches.
pub fn parse_enum<'a>(text: &str, variants: &'a [String]) -> Option<&'a str> {
    let trimmed = text.trim();
    variants
        .iter()
        .find(|v| v.as_str() == trimmed)
        .or_else(|| variants.iter().find(|v| v.eq_ignore_ascii_case(trimmed)))
        .map(String::as_str)
}

/// Format a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Format a boolean the way documents spell it (`1` / `0`).
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
