//! Validation of incoming report payloads
//!
//! Payloads arrive as loosely typed JSON objects (tool arguments, form
//! posts), so every field is checked here and normalized into a
//! `ReportInput`. All failing fields are reported together.

use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::domain::{Money, ReportInput, ValidationError};

/// Longest allowed `notes` text, counted in characters
pub const NOTES_MAX_CHARS: usize = 1000;

/// Rules for one integer field
struct IntegerRule {
    field: &'static str,
    label: &'static str,
    required: &'static str,
    min: i64,
    max: i64,
    /// Message when the value is below `min` or (for ranged fields) above `max`
    out_of_range: &'static str,
    /// Whether exceeding `max` is a range failure or a "too large" failure
    ranged: bool,
}

const MONTH: IntegerRule = IntegerRule {
    field: "month",
    label: "month",
    required: "Please select a reporting month.",
    min: 1,
    max: 12,
    out_of_range: "Month must be between 1 and 12.",
    ranged: true,
};

const YEAR: IntegerRule = IntegerRule {
    field: "year",
    label: "year",
    required: "Please enter a reporting year.",
    min: 2000,
    max: 2100,
    out_of_range: "Year must be between 2000 and 2100.",
    ranged: true,
};

const fn count_rule(
    field: &'static str,
    label: &'static str,
    required: &'static str,
    negative: &'static str,
) -> IntegerRule {
    IntegerRule {
        field,
        label,
        required,
        min: 0,
        max: u32::MAX as i64,
        out_of_range: negative,
        ranged: false,
    }
}

const NEW_BOOKS: IntegerRule = count_rule(
    "new_books",
    "new books",
    "Please enter the number of new books.",
    "New books cannot be negative.",
);

const BOOKS_BORROWED: IntegerRule = count_rule(
    "books_borrowed",
    "books borrowed",
    "Please enter the number of books borrowed.",
    "Books borrowed cannot be negative.",
);

const NEW_MEMBERS: IntegerRule = count_rule(
    "new_members",
    "new members",
    "Please enter the number of new members.",
    "New members cannot be negative.",
);

const TOTAL_VISITORS: IntegerRule = count_rule(
    "total_visitors",
    "total visitors",
    "Please enter the total number of visitors.",
    "Total visitors cannot be negative.",
);

/// Why a raw value could not be read as the requested type
enum ReadIssue {
    Missing,
    WrongType,
    TooLarge,
    Negative,
}

/// Validate a report payload and return the normalized input
///
/// Unknown keys (such as a `report_id` riding along with an update) are
/// ignored.
pub fn validate_report(payload: &Map<String, Value>) -> Result<ReportInput, ValidationError> {
    let mut errors = ValidationError::default();

    let month = check_integer(payload, &MONTH, &mut errors);
    let year = check_integer(payload, &YEAR, &mut errors);
    let new_books = check_integer(payload, &NEW_BOOKS, &mut errors);
    let books_borrowed = check_integer(payload, &BOOKS_BORROWED, &mut errors);
    let new_members = check_integer(payload, &NEW_MEMBERS, &mut errors);
    let total_visitors = check_integer(payload, &TOTAL_VISITORS, &mut errors);
    let fine_collections = check_fine_collections(payload, &mut errors);
    let notes = check_notes(payload, &mut errors);

    if let (
        Some(month),
        Some(year),
        Some(new_books),
        Some(books_borrowed),
        Some(new_members),
        Some(total_visitors),
        Some(fine_collections),
        Some(notes),
    ) = (
        month,
        year,
        new_books,
        books_borrowed,
        new_members,
        total_visitors,
        fine_collections,
        notes,
    ) {
        if errors.is_empty() {
            // Every value was range-checked above, so the narrowing casts are lossless.
            return Ok(ReportInput {
                month: month as u32,
                year: year as i32,
                new_books: new_books as u32,
                books_borrowed: books_borrowed as u32,
                new_members: new_members as u32,
                total_visitors: total_visitors as u32,
                fine_collections,
                notes,
            });
        }
    }

    Err(errors)
}

fn check_integer(
    payload: &Map<String, Value>,
    rule: &IntegerRule,
    errors: &mut ValidationError,
) -> Option<i64> {
    let value = match read_integer(payload.get(rule.field)) {
        Ok(value) => value,
        Err(ReadIssue::Missing) => {
            errors.insert(rule.field, rule.required);
            return None;
        }
        Err(ReadIssue::WrongType) => {
            errors.insert(
                rule.field,
                format!("The {} field must be an integer.", rule.label),
            );
            return None;
        }
        Err(ReadIssue::TooLarge) => {
            errors.insert(rule.field, too_large(rule));
            return None;
        }
        Err(ReadIssue::Negative) => {
            errors.insert(rule.field, rule.out_of_range);
            return None;
        }
    };

    if value < rule.min {
        errors.insert(rule.field, rule.out_of_range);
        return None;
    }
    if value > rule.max {
        errors.insert(rule.field, too_large(rule));
        return None;
    }

    Some(value)
}

fn too_large(rule: &IntegerRule) -> String {
    if rule.ranged {
        rule.out_of_range.to_string()
    } else {
        format!("The {} field is too large.", rule.label)
    }
}

fn check_fine_collections(
    payload: &Map<String, Value>,
    errors: &mut ValidationError,
) -> Option<Money> {
    const FIELD: &str = "fine_collections";

    let amount = match read_number(payload.get(FIELD)) {
        Ok(amount) => amount,
        Err(ReadIssue::Missing) => {
            errors.insert(FIELD, "Please enter the fine collections amount.");
            return None;
        }
        Err(ReadIssue::WrongType) => {
            errors.insert(FIELD, "The fine collections field must be a number.");
            return None;
        }
        Err(ReadIssue::TooLarge) => {
            errors.insert(FIELD, exceeds_money_max());
            return None;
        }
        Err(ReadIssue::Negative) => {
            errors.insert(FIELD, NEGATIVE_FINES);
            return None;
        }
    };

    if amount.is_negative() {
        errors.insert(FIELD, NEGATIVE_FINES);
        return None;
    }
    if amount > Money::MAX {
        errors.insert(FIELD, exceeds_money_max());
        return None;
    }

    Some(amount)
}

const NEGATIVE_FINES: &str = "Fine collections cannot be negative.";

fn exceeds_money_max() -> String {
    format!("Fine collections cannot exceed {}.", Money::MAX)
}

/// Returns `Some(None)` when notes are absent and `None` when they are invalid
fn check_notes(payload: &Map<String, Value>, errors: &mut ValidationError) -> Option<Option<String>> {
    const FIELD: &str = "notes";

    match payload.get(FIELD) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(text)) if text.trim().is_empty() => Some(None),
        Some(Value::String(text)) => {
            if text.chars().count() > NOTES_MAX_CHARS {
                errors.insert(FIELD, "Notes cannot exceed 1000 characters.");
                None
            } else {
                Some(Some(text.clone()))
            }
        }
        Some(_) => {
            errors.insert(FIELD, "The notes field must be a string.");
            None
        }
    }
}

fn read_integer(value: Option<&Value>) -> Result<i64, ReadIssue> {
    match value {
        None | Some(Value::Null) => Err(ReadIssue::Missing),
        Some(Value::Number(number)) => {
            if let Some(int) = number.as_i64() {
                Ok(int)
            } else if number.is_u64() {
                Err(ReadIssue::TooLarge)
            } else {
                whole_float(number.as_f64())
            }
        }
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ReadIssue::Missing);
            }
            text.parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ReadIssue::TooLarge,
                _ => ReadIssue::WrongType,
            })
        }
        Some(_) => Err(ReadIssue::WrongType),
    }
}

/// Accept a float only when it holds a whole number, e.g. `3.0`
fn whole_float(value: Option<f64>) -> Result<i64, ReadIssue> {
    match value {
        Some(float) if float.is_finite() && float.fract() == 0.0 => {
            if float.abs() < i64::MAX as f64 {
                Ok(float as i64)
            } else {
                Err(ReadIssue::TooLarge)
            }
        }
        _ => Err(ReadIssue::WrongType),
    }
}

fn read_number(value: Option<&Value>) -> Result<Money, ReadIssue> {
    let amount = match value {
        None | Some(Value::Null) => return Err(ReadIssue::Missing),
        Some(Value::Number(number)) => number.as_f64().ok_or(ReadIssue::WrongType)?,
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ReadIssue::Missing);
            }
            // Exact decimal text keeps every cent; anything else goes through f64.
            if let Ok(money) = text.parse::<Money>() {
                return Ok(money);
            }
            text.parse::<f64>().map_err(|_| ReadIssue::WrongType)?
        }
        Some(_) => return Err(ReadIssue::WrongType),
    };

    if !amount.is_finite() {
        return Err(ReadIssue::WrongType);
    }
    // Checked before rounding, so -0.004 can't round to zero and pass
    if amount < 0.0 {
        return Err(ReadIssue::Negative);
    }
    Money::from_f64(amount).ok_or(ReadIssue::TooLarge)
}
