//! # Normalize Module
//!
//! Phone and CPF normalization, plus the CPF modulo-11 checksum.
//!
//! ## Identity Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  From user input to stored identity                     │
//! │                                                                         │
//! │  "(21) 99999-0000"          "529.982.247-25"                           │
//! │         │                          │                                    │
//! │         ▼                          ▼                                    │
//! │  normalize_phone()          normalize_tax_id()    keep ASCII digits     │
//! │         │                          │                                    │
//! │         ▼                          ▼                                    │
//! │  "21999990000"              "52998224725"                               │
//! │         │                          │                                    │
//! │         ▼                          ▼                                    │
//! │  parse_phone()              parse_tax_id()        >= 10 digits /        │
//! │                                                   11 digits + checksum  │
//! │         │                          │                                    │
//! │         └────────────┬─────────────┘                                    │
//! │                      ▼                                                  │
//! │         Identity Registry uniqueness check (pethub-db)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function: no allocation beyond the returned
//! strings and no panics on any input.

use crate::error::{CoreError, CoreResult};
use crate::MIN_PHONE_DIGITS;

/// Number of digits in a CPF.
pub const TAX_ID_LENGTH: usize = 11;

// =============================================================================
// Normalization
// =============================================================================

/// Keeps only the ASCII decimal digits of a phone number.
///
/// ## Example
/// ```rust
/// use pethub_core::normalize::normalize_phone;
///
/// assert_eq!(normalize_phone("(21) 99999-0000"), "21999990000");
/// assert_eq!(normalize_phone("   "), "");
/// ```
pub fn normalize_phone(raw: &str) -> String {
    digits_only(raw)
}

/// Keeps only the ASCII decimal digits of a CPF.
///
/// ## Example
/// ```rust
/// use pethub_core::normalize::normalize_tax_id;
///
/// assert_eq!(normalize_tax_id("529.982.247-25"), "52998224725");
/// ```
pub fn normalize_tax_id(raw: &str) -> String {
    digits_only(raw)
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// =============================================================================
// CPF Checksum
// =============================================================================

/// Computes the two CPF check digits for a 9-digit base.
///
/// Returns `None` when `base9` is not exactly nine ASCII digits.
///
/// ## Algorithm
/// ```text
/// first  = (Σ d[i] × (10 - i), i = 0..9 ) × 10 mod 11   (10 → 0)
/// second = (Σ d[i] × (11 - i), i = 0..10) × 10 mod 11   (10 → 0)
///          where d[9] = first
/// ```
pub fn tax_id_check_digits(base9: &str) -> Option<(u8, u8)> {
    if base9.len() != 9 || !base9.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits: Vec<u32> = base9.bytes().map(|b| (b - b'0') as u32).collect();

    let first = check_digit(&digits, 10);
    digits.push(first as u32);
    let second = check_digit(&digits, 11);

    Some((first, second))
}

fn check_digit(digits: &[u32], top_weight: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        r => r as u8,
    }
}

/// Appends the check digits to a 9-digit base.
///
/// ## Example
/// ```rust
/// use pethub_core::normalize::complete_tax_id;
///
/// assert_eq!(complete_tax_id("529982247").as_deref(), Some("52998224725"));
/// assert_eq!(complete_tax_id("12ab"), None);
/// ```
pub fn complete_tax_id(base9: &str) -> Option<String> {
    let (first, second) = tax_id_check_digits(base9)?;
    Some(format!("{}{}{}", base9, first, second))
}

/// Returns true when `digits` is a checksum-valid CPF.
///
/// ## Rules
/// - Exactly 11 ASCII digits (callers normalize first)
/// - Not all the same digit (`11111111111` passes the math but is not issued)
/// - Both check digits match
pub fn is_valid_tax_id(digits: &str) -> bool {
    if digits.len() != TAX_ID_LENGTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let first = digits.as_bytes()[0];
    if digits.bytes().all(|b| b == first) {
        return false;
    }

    let (base, check) = digits.split_at(9);
    match tax_id_check_digits(base) {
        Some((d1, d2)) => check == format!("{}{}", d1, d2),
        None => false,
    }
}

/// Renders an 11-digit CPF as `000.000.000-00`.
///
/// Anything that is not 11 digits is returned unchanged.
pub fn format_tax_id(digits: &str) -> String {
    if digits.len() != TAX_ID_LENGTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

// =============================================================================
// Parsing (normalize + validate)
// =============================================================================

/// Normalizes a phone and rejects it when it is empty or shorter than
/// area code plus subscriber. Long international numbers are accepted.
pub fn parse_phone(raw: &str) -> CoreResult<String> {
    let phone = normalize_phone(raw);

    if phone.is_empty() {
        return Err(CoreError::InvalidPhone {
            raw: raw.to_string(),
            reason: "phone is required".to_string(),
        });
    }

    if phone.len() < MIN_PHONE_DIGITS {
        return Err(CoreError::InvalidPhone {
            raw: raw.to_string(),
            reason: format!(
                "expected at least {} digits, got {}",
                MIN_PHONE_DIGITS,
                phone.len()
            ),
        });
    }

    Ok(phone)
}

/// Normalizes a CPF and rejects it unless the checksum holds.
pub fn parse_tax_id(raw: &str) -> CoreResult<String> {
    let tax_id = normalize_tax_id(raw);

    if !is_valid_tax_id(&tax_id) {
        return Err(CoreError::InvalidTaxId {
            raw: raw.to_string(),
        });
    }

    Ok(tax_id)
}

// =============================================================================
// Unit Tests
// =============================================================================
