//! Values produced by tag suppliers and their text renderings.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

/// A resolved tag value.
///
/// `None` stands for an absent or platform-unavailable fact and renders as an
/// empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Local>),
}

impl TagValue {
    pub fn is_none(&self) -> bool {
        matches!(self, TagValue::None)
    }

    /// Default text rendering.
    pub fn render(&self) -> String {
        match self {
            TagValue::None => String::new(),
            TagValue::Bool(value) => value.to_string(),
            TagValue::Int(value) => value.to_string(),
            TagValue::Float(value) => value.to_string(),
            TagValue::Text(value) => value.clone(),
            TagValue::Timestamp(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Pattern-based rendering.
    ///
    /// Timestamps take chrono strftime patterns; integers and floats take
    /// `0`/`#` digit patterns such as `000` or `0.00`. Any variant/pattern
    /// combination that is not supported falls back to [`TagValue::render`],
    /// so this never fails.
    pub fn render_with(&self, pattern: &str) -> String {
        match self {
            TagValue::Timestamp(value) => {
                let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
                if items.iter().any(|item| matches!(item, Item::Error)) {
                    self.render()
                } else {
                    value.format_with_items(items.into_iter()).to_string()
                }
            }
            TagValue::Int(value) => match NumericPattern::parse(pattern) {
                Some(numeric) => numeric.render_int(*value),
                None => self.render(),
            },
            TagValue::Float(value) => match NumericPattern::parse(pattern) {
                Some(numeric) => numeric.render_float(*value),
                None => self.render(),
            },
            _ => self.render(),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

/// Digit pattern made of `0`/`#` with an optional decimal part, e.g. `000`
/// or `0.00`. The count of `0`s before the point sets the zero-pad width;
/// the length after the point sets the decimal places.
struct NumericPattern {
    width: usize,
    decimals: Option<usize>,
}

impl NumericPattern {
    fn parse(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }
        let (integral, fractional) = match pattern.split_once('.') {
            Some((integral, fractional)) => (integral, Some(fractional)),
            None => (pattern, None),
        };
        let digits_only = |part: &str| part.chars().all(|c| c == '0' || c == '#');
        if !digits_only(integral) || !fractional.is_none_or(digits_only) {
            return None;
        }
        Some(Self {
            width: integral.chars().filter(|c| *c == '0').count(),
            decimals: fractional.map(str::len),
        })
    }

    fn render_int(&self, value: i64) -> String {
        match self.decimals {
            Some(decimals) => format!("{:.decimals$}", value as f64),
            None => {
                let width = self.width;
                format!("{value:0width$}")
            }
        }
    }

    fn render_float(&self, value: f64) -> String {
        let decimals = self.decimals.unwrap_or(0);
        // Truncates toward zero; the pattern never rounds past the value.
        let scale = 10f64.powi(decimals as i32);
        let truncated = (value * scale).trunc() / scale;
        format!("{truncated:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> TagValue {
        let when = Local
            .with_ymd_and_hms(2024, 5, 1, 13, 30, 9)
            .single()
            .expect("unambiguous local time");
        TagValue::Timestamp(when)
    }

    #[test]
    fn none_renders_empty() {
        assert_eq!(TagValue::None.render(), "");
        assert_eq!(TagValue::None.render_with("0.00"), "");
    }

    #[test]
    fn timestamp_takes_strftime_patterns() {
        assert_eq!(stamp().render_with("%Y/%m/%d"), "2024/05/01");
        assert_eq!(stamp().render_with("%H:%M"), "13:30");
    }

    #[test]
    fn invalid_strftime_falls_back_to_default() {
        assert_eq!(stamp().render_with("%Q"), stamp().render());
    }

    #[test]
    fn float_pattern_truncates_toward_zero() {
        assert_eq!(TagValue::Float(999.9999).render_with("0.00"), "999.99");
        assert_eq!(TagValue::Float(-999.9999).render_with("0.00"), "-999.99");
        assert_eq!(TagValue::Float(1.5).render_with("0"), "1");
    }

    #[test]
    fn int_patterns() {
        assert_eq!(TagValue::Int(7).render_with("000"), "007");
        assert_eq!(TagValue::Int(42).render_with("0.00"), "42.00");
    }

    #[test]
    fn unsupported_pattern_uses_default_rendering() {
        assert_eq!(TagValue::Float(1.25).render_with("money"), "1.25");
        assert_eq!(TagValue::Text("x".into()).render_with("0.00"), "x");
        assert_eq!(TagValue::Bool(true).render_with("0"), "true");
    }
}
