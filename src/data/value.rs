//! Attribute values.

use std::fmt;

/// A scalar or text attribute payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl AttributeValue {
    /// Classify edited text as an integer, a float, or plain text.
    ///
    /// Surrounding whitespace is ignored when looking for a number; text that
    /// is not numeric is kept exactly as typed.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(v) = trimmed.parse::<i64>() {
            return Self::Integer(v);
        }

        // `f64::from_str` also accepts "inf" and "nan"; those stay text.
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(v) = trimmed.parse::<f64>() {
                return Self::Float(v);
            }
        }

        Self::Text(raw.to_string())
    }

    /// Truthiness used for the junk marker.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Get the value as a float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}
