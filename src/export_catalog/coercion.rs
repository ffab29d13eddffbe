//! Per-column coercion of untyped graph property values.
//!
//! Graph properties arrive as whatever the loader happened to store: term ids
//! as `202515.0`, flags as `"TRUE"`, ratings as strings. Every exported column
//! declares one [`Coercion`] and the coercion decides both the target type and
//! the fallback for missing or malformed input. Fallbacks never fail the run;
//! they produce an empty field (or `false` for flags).

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveTime;
use serde_json::Value;

/// Target type of an exported column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Verbatim text. Numbers and booleans are rendered, null stays empty.
    Text,
    /// 64-bit integer, truncating floats toward zero. Booleans map to 1/0.
    Integer,
    /// Finite 64-bit float.
    Float,
    /// Strict boolean: `true` iff the lower-cased text form is `"true"`.
    Flag,
    /// Time of day, normalized to `HH:MM:SS[.fff]`.
    TimeOfDay,
}

/// A coerced scalar ready to be written as one CSV field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Time(NaiveTime),
}

impl Coercion {
    pub fn apply(self, value: &Value) -> Cell {
        match self {
            Coercion::Text => to_text(value),
            Coercion::Integer => to_integer(value),
            Coercion::Float => to_float(value),
            Coercion::Flag => Cell::Boolean(to_flag(value)),
            Coercion::TimeOfDay => to_time(value),
        }
    }

    /// Whether the projection should read the property through `toString()`.
    ///
    /// Temporal values have no portable decoded form, so they are fetched as
    /// their ISO text and parsed here.
    pub fn reads_as_string(self) -> bool {
        matches!(self, Coercion::TimeOfDay)
    }
}

fn to_text(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::String(s) => Cell::Text(s.clone()),
        Value::Bool(b) => Cell::Text(b.to_string()),
        Value::Number(n) => Cell::Text(n.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

fn to_integer(value: &Value) -> Cell {
    let coerced = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().and_then(truncate),
        },
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    match coerced {
        Some(i) => Cell::Integer(i),
        None => fallback("integer", value),
    }
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn to_float(value: &Value) -> Cell {
    let coerced = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match coerced.filter(|f| f.is_finite()) {
        Some(f) => Cell::Float(f),
        None => fallback("float", value),
    }
}

fn to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.to_lowercase() == "true",
        _ => false,
    }
}

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

fn to_time(value: &Value) -> Cell {
    let Value::String(raw) = value else {
        return fallback("time", value);
    };
    // Zoned times carry `Z` or `±HH:MM`; a TIME column keeps only the local part.
    let raw = strip_offset(raw.trim());
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return Cell::Time(time);
        }
    }
    log::warn!("Dropping unparseable time of day `{}`", raw);
    Cell::Null
}

fn strip_offset(raw: &str) -> &str {
    if let Some(local) = raw.strip_suffix('Z') {
        return local;
    }
    let bytes = raw.as_bytes();
    for width in [6, 5] {
        if bytes.len() <= width || !raw.is_char_boundary(bytes.len() - width) {
            continue;
        }
        let (local, offset) = raw.split_at(bytes.len() - width);
        let mut chars = offset.chars();
        let sign = chars.next();
        let digits: String = chars.filter(|c| *c != ':').collect();
        let colon_ok = width == 5 || offset.as_bytes()[3] == b':';
        if matches!(sign, Some('+') | Some('-'))
            && colon_ok
            && digits.len() == 4
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            return local;
        }
    }
    raw
}

fn fallback(target: &str, value: &Value) -> Cell {
    if !value.is_null() {
        log::debug!("Cannot coerce {} to {}, writing empty field", value, target);
    }
    Cell::Null
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Total order used to make exports deterministic.
    ///
    /// Nulls sort first; values of different kinds order by kind.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Boolean(a), Cell::Boolean(b)) => a.cmp(b),
            (Cell::Time(a), Cell::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Null => 0,
            Cell::Boolean(_) => 1,
            Cell::Integer(_) => 2,
            Cell::Float(_) => 3,
            Cell::Time(_) => 4,
            Cell::Text(_) => 5,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing `.0` on whole numbers (`3.0`, not `3`).
            Cell::Float(x) => write!(f, "{:?}", x),
            Cell::Boolean(b) => write!(f, "{}", b),
            Cell::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
        }
    }
}
