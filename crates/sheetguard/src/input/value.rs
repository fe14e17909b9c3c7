//! Coercion rules for untyped spreadsheet cells.
//!
//! Cells arrive as loosely typed JSON scalars, and a column that is numeric in
//! one row may hold text in the next. These helpers apply the coercions a
//! spreadsheet front end uses (string conversion, numeric parsing, truthiness)
//! so that every schema predicate tolerates any cell type.
//!
//! An absent cell (`None`) and a `null` cell are different:
//! an absent cell is not a number, while `null` coerces to zero.

use serde_json::{Number, Value};

/// String form of a cell. Absent cells render as `"undefined"`, nulls as `"null"`.
pub fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => value_to_string(v),
    }
}

/// String form of a cell where absent and null cells become the empty string.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => value_to_string(v),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => format_number(f),
        _ => n.to_string(),
    }
}

/// Format a number the way a spreadsheet displays it (`3` rather than `3.0`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= EXPONENT_THRESHOLD {
        exponent_form(n)
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Magnitude from which numbers are shown in exponent form.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// `1.5e+300` style, with an explicit sign on positive exponents.
fn exponent_form(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Numeric value of a cell, `NaN` when it cannot be read as a number.
pub fn cell_to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_numeric_text(&value_to_string(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Parse numeric text. Blank text is zero; anything unparsable is `NaN`.
pub fn parse_numeric_text(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }

    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // Rust also accepts "inf" and "nan", which are not numbers in a sheet.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// Whether a cell counts as filled in. Empty text, zero, false, null and
/// absent cells do not.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Whether a number is a finite whole number.
pub fn is_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

/// Whether a JSON value is a whole number.
pub fn is_integer_value(value: &Value) -> bool {
    value.as_f64().is_some_and(is_integer)
}

/// JSON value for a number, integral when the number is whole.
pub fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if is_integer(n) && n.abs() <= MAX_SAFE {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// How absent and null cells are read when parsing embedded JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blank {
    /// Absent and null cells are read as empty text (which is not JSON).
    Empty,
    /// Absent and null cells are read as the given JSON literal.
    Literal(&'static str),
    /// Cells are converted with [`cell_to_string`] (`"null"` parses, absent does not).
    Verbatim,
}

/// Parse a cell holding embedded JSON.
///
/// Cells that already hold arrays or objects are returned as they are.
pub fn parse_json_cell(value: Option<&Value>, blank: Blank) -> Result<Value, String> {
    let text = match (value, blank) {
        (Some(Value::Array(_)) | Some(Value::Object(_)), _) => {
            return Ok(value.cloned().unwrap_or(Value::Null));
        }
        (None | Some(Value::Null), Blank::Empty) => String::new(),
        (None | Some(Value::Null), Blank::Literal(literal)) => literal.to_string(),
        (v, _) => cell_to_string(v),
    };
    serde_json::from_str::<Value>(&text).map_err(|e| e.to_string())
}

/// Comma-separated tokens of a cell, trimmed, with empty tokens dropped.
pub fn split_list(value: Option<&Value>) -> Vec<String> {
    cell_text(value)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Whether every comma-separated token of a cell is non-empty after trimming.
pub fn all_tokens_present(value: Option<&Value>) -> bool {
    cell_to_string(value)
        .split(',')
        .all(|token| !token.trim().is_empty())
}
