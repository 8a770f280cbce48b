//! Field-level validation rules.
//!
//! Every rule returns the user-facing message for the offending field, or
//! `None` when the value passes. Messages are collected per field path in the
//! form model; they never abort an edit.

/// Required string: must be non-empty after trimming.
pub fn required(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Rellene el campo".to_string())
    } else {
        None
    }
}

/// Required string of exactly `len` ASCII digits.
pub fn exact_digits(value: &str, len: usize, message: &str) -> Option<String> {
    if let Some(missing) = required(value) {
        return Some(missing);
    }
    let trimmed = value.trim();
    if trimmed.len() == len && trimmed.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(message.to_string())
    }
}

pub fn postal_code(value: &str) -> Option<String> {
    exact_digits(value, 5, "El código postal debe tener 5 dígitos")
}

pub fn phone(value: &str) -> Option<String> {
    exact_digits(value, 9, "El teléfono debe tener 9 dígitos")
}

pub fn line_description(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("El concepto es obligatorio".to_string())
    } else {
        None
    }
}

pub fn line_amount(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("El importe en euros es obligatorio".to_string())
    } else {
        None
    }
}
