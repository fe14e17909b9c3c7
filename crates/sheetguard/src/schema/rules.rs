//! Field predicates and formatters.
//!
//! Each schema field is bound to a [`FieldKind`]. The kind decides whether a
//! cell conforms (`check`) and, when it does not, what conforming value to
//! propose (`format`).

use serde_json::Value;

use crate::input::value::{
    all_tokens_present, cell_text, cell_to_number, is_integer, is_integer_value, is_truthy,
    number_value, parse_json_cell, parse_numeric_text, split_list, Blank,
};

/// Largest phase range that is expanded into an explicit list.
pub const MAX_PHASE_SPAN: i64 = 1000;

/// Default priority when a priority cannot be read.
pub const DEFAULT_PRIORITY: f64 = 3.0;

/// Shape a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty text identifier.
    Identifier,
    /// Integer priority from 1 to 5.
    Priority,
    /// Comma-separated list of non-empty tokens.
    TokenList {
        /// Whether a blank cell is invalid.
        required: bool,
    },
    /// Embedded JSON document.
    Json,
    /// JSON array of integers.
    IntegerArray,
    /// Whole number greater than zero.
    PositiveInteger,
    /// Number of at least one.
    AtLeastOne,
    /// JSON integer array or a `"start-end"` range.
    PhaseWindow,
}

impl FieldKind {
    /// Whether a cell conforms to this kind.
    pub fn check(&self, value: Option<&Value>) -> bool {
        match self {
            FieldKind::Identifier => matches!(value, Some(Value::String(s)) if !s.is_empty()),
            FieldKind::Priority => {
                let n = cell_to_number(value);
                (1..=5).any(|level: i32| f64::from(level) == n)
            }
            FieldKind::TokenList { required } => {
                if !is_truthy(value) {
                    return !required;
                }
                all_tokens_present(value)
            }
            FieldKind::Json => parse_json_cell(value, Blank::Verbatim).is_ok(),
            FieldKind::IntegerArray => matches!(
                parse_json_cell(value, Blank::Verbatim),
                Ok(Value::Array(items)) if items.iter().all(is_integer_value)
            ),
            FieldKind::PositiveInteger => {
                let n = cell_to_number(value);
                is_integer(n) && n > 0.0
            }
            FieldKind::AtLeastOne => cell_to_number(value) >= 1.0,
            FieldKind::PhaseWindow => {
                if !is_truthy(value) {
                    return true;
                }
                match parse_json_cell(value, Blank::Verbatim) {
                    Ok(Value::Array(items)) => items.iter().all(is_integer_value),
                    Ok(_) => false,
                    Err(_) => match value {
                        Some(Value::String(s)) if s.contains('-') => {
                            let (start, end) = parse_range(s);
                            start <= end
                        }
                        _ => false,
                    },
                }
            }
        }
    }

    /// Conforming replacement for a cell, `None` when no value can be proposed.
    pub fn format(&self, value: Option<&Value>) -> Option<Value> {
        match self {
            FieldKind::Identifier => {
                let text = cell_text(value);
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
            }
            FieldKind::Priority => {
                let n = cell_to_number(value);
                let level = if n.is_nan() {
                    DEFAULT_PRIORITY
                } else {
                    n.clamp(1.0, 5.0).round()
                };
                Some(number_value(level))
            }
            FieldKind::TokenList { required } => {
                let tokens = split_list(value);
                if tokens.is_empty() && *required {
                    None
                } else {
                    Some(Value::String(tokens.join(", ")))
                }
            }
            FieldKind::Json => {
                let text = parse_json_cell(value, Blank::Verbatim)
                    .ok()
                    .and_then(|doc| serde_json::to_string_pretty(&doc).ok())
                    .unwrap_or_else(|| "{}".to_string());
                Some(Value::String(text))
            }
            FieldKind::IntegerArray => {
                let slots = match parse_json_cell(value, Blank::Verbatim) {
                    Ok(Value::Array(items)) => integer_elements(&items).unwrap_or_else(|| vec![1]),
                    _ => vec![1],
                };
                Some(array_text(&slots))
            }
            FieldKind::PositiveInteger => {
                let n = cell_to_number(value);
                let n = if n.is_finite() && n != 0.0 {
                    n.round().max(1.0)
                } else {
                    1.0
                };
                Some(number_value(n))
            }
            FieldKind::AtLeastOne => {
                let n = cell_to_number(value);
                let n = if n.is_finite() && n != 0.0 { n.max(1.0) } else { 1.0 };
                Some(number_value(n))
            }
            FieldKind::PhaseWindow => Some(array_text(&format_phases(value))),
        }
    }
}

/// Start and end of a `"start-end"` range, `NaN` where a bound is unreadable.
pub fn parse_range(text: &str) -> (f64, f64) {
    let mut parts = text.split('-');
    let start = parts.next().map(parse_numeric_text).unwrap_or(f64::NAN);
    let end = parts.next().map(parse_numeric_text).unwrap_or(f64::NAN);
    (start, end)
}

fn format_phases(value: Option<&Value>) -> Vec<i64> {
    match parse_json_cell(value, Blank::Verbatim) {
        Ok(Value::Array(items)) => integer_elements(&items).unwrap_or_else(|| vec![1]),
        Ok(single) if is_integer_value(&single) => {
            vec![single.as_f64().map(|n| n as i64).unwrap_or(1)]
        }
        Ok(_) => vec![1],
        Err(_) => match value {
            Some(Value::String(s)) if s.contains('-') => expand_range(s).unwrap_or_else(|| vec![1]),
            _ => vec![1],
        },
    }
}

fn expand_range(text: &str) -> Option<Vec<i64>> {
    let (start, end) = parse_range(text);
    if !is_integer(start) || !is_integer(end) || start > end {
        return None;
    }
    let (start, end) = (start as i64, end as i64);
    if end - start >= MAX_PHASE_SPAN {
        return None;
    }
    Some((start..=end).collect())
}

/// Integer elements of an array. `None` when a non-empty array has none.
fn integer_elements(items: &[Value]) -> Option<Vec<i64>> {
    let ints: Vec<i64> = items
        .iter()
        .filter(|item| is_integer_value(item))
        .filter_map(Value::as_f64)
        .map(|n| n as i64)
        .collect();
    if ints.is_empty() && !items.is_empty() {
        None
    } else {
        Some(ints)
    }
}

fn array_text(values: &[i64]) -> Value {
    Value::String(Value::from(values.to_vec()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority() {
        let kind = FieldKind::Priority;
        assert!(kind.check(Some(&json!(3))));
        assert!(kind.check(Some(&json!("5"))));
        assert!(!kind.check(Some(&json!("7"))));
        assert!(!kind.check(Some(&json!(2.5))));

        assert_eq!(kind.format(Some(&json!("7"))), Some(json!(5)));
        assert_eq!(kind.format(Some(&json!(-2))), Some(json!(1)));
        assert_eq!(kind.format(Some(&json!("high"))), Some(json!(3)));
        assert_eq!(kind.format(Some(&json!(2.4))), Some(json!(2)));
    }

    #[test]
    fn test_token_lists() {
        let optional = FieldKind::TokenList { required: false };
        let required = FieldKind::TokenList { required: true };

        assert!(optional.check(Some(&json!(""))));
        assert!(optional.check(None));
        assert!(!optional.check(Some(&json!("T1,,T2"))));
        assert_eq!(optional.format(Some(&json!("T1,,T2 "))), Some(json!("T1, T2")));

        assert!(!required.check(Some(&json!(""))));
        assert!(required.check(Some(&json!("welding, painting"))));
        assert_eq!(required.format(Some(&json!(" , "))), None);
    }

    #[test]
    fn test_json_document() {
        let kind = FieldKind::Json;
        assert!(kind.check(Some(&json!(r#"{"tier": "gold"}"#))));
        assert!(!kind.check(Some(&json!("{broken"))));
        assert_eq!(kind.format(Some(&json!("{broken"))), Some(json!("{}")));
        assert_eq!(
            kind.format(Some(&json!(r#"{"a":1}"#))),
            Some(json!("{\n  \"a\": 1\n}"))
        );
    }

    #[test]
    fn test_integer_array() {
        let kind = FieldKind::IntegerArray;
        assert!(kind.check(Some(&json!("[1, 2, 3]"))));
        assert!(kind.check(Some(&json!("[]"))));
        assert!(!kind.check(Some(&json!("[1.5]"))));
        assert!(!kind.check(Some(&json!("1,2"))));

        assert_eq!(kind.format(Some(&json!("nope"))), Some(json!("[1]")));
        assert_eq!(kind.format(Some(&json!("[1, 2.5, 3]"))), Some(json!("[1,3]")));
        assert_eq!(kind.format(Some(&json!("[\"a\"]"))), Some(json!("[1]")));
    }

    #[test]
    fn test_positive_integer() {
        let kind = FieldKind::PositiveInteger;
        assert!(kind.check(Some(&json!("2"))));
        assert!(!kind.check(Some(&json!(0))));
        assert!(!kind.check(Some(&json!(1.5))));
        assert_eq!(kind.format(Some(&json!(0))), Some(json!(1)));
        assert_eq!(kind.format(Some(&json!(-4))), Some(json!(1)));
        assert_eq!(kind.format(Some(&json!(2.6))), Some(json!(3)));
    }

    #[test]
    fn test_at_least_one() {
        let kind = FieldKind::AtLeastOne;
        assert!(kind.check(Some(&json!(1))));
        assert!(kind.check(Some(&json!("2.5"))));
        assert!(!kind.check(Some(&json!(0.5))));
        assert!(!kind.check(Some(&json!("long"))));
        assert_eq!(kind.format(Some(&json!(0.5))), Some(json!(1)));
        assert_eq!(kind.format(Some(&json!("long"))), Some(json!(1)));
    }

    #[test]
    fn test_phase_windows() {
        let kind = FieldKind::PhaseWindow;
        assert!(kind.check(None));
        assert!(kind.check(Some(&json!("[1,2]"))));
        assert!(kind.check(Some(&json!("2-4"))));
        assert!(!kind.check(Some(&json!("4-2"))));
        assert!(!kind.check(Some(&json!("3"))));
        assert!(!kind.check(Some(&json!("soon"))));

        assert_eq!(kind.format(Some(&json!("2-4"))), Some(json!("[2,3,4]")));
        assert_eq!(kind.format(Some(&json!("3"))), Some(json!("[3]")));
        assert_eq!(kind.format(Some(&json!("soon"))), Some(json!("[1]")));
        assert_eq!(kind.format(Some(&json!("1-5000"))), Some(json!("[1]")));
    }

    #[test]
    fn test_identifier() {
        let kind = FieldKind::Identifier;
        assert!(kind.check(Some(&json!("C1"))));
        assert!(!kind.check(Some(&json!(""))));
        assert!(!kind.check(Some(&json!(42))));
        assert_eq!(kind.format(Some(&json!(42))), Some(json!("42")));
        assert_eq!(kind.format(Some(&json!("  "))), None);
    }

    #[test]
    fn test_formatted_values_conform() {
        let cases = [
            (FieldKind::Priority, json!("9")),
            (FieldKind::TokenList { required: false }, json!("a,,b")),
            (FieldKind::Json, json!("{")),
            (FieldKind::IntegerArray, json!("[x]")),
            (FieldKind::PositiveInteger, json!("-3")),
            (FieldKind::AtLeastOne, json!(0)),
            (FieldKind::PhaseWindow, json!("1-3")),
            (FieldKind::Identifier, json!(7)),
        ];
        for (kind, value) in cases {
            let fixed = kind.format(Some(&value)).unwrap();
            assert!(kind.check(Some(&fixed)), "{:?} -> {:?}", kind, fixed);
        }
    }
}
