use std::fmt;

use chrono::NaiveDateTime;

/// Display format for date values. No timezone conversion is applied.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Days from the OLE Automation epoch (1899-12-30) to the Unix epoch.
const OLE_EPOCH_DAYS: f64 = 25569.0;

/// Seconds between 1601-01-01 (FILETIME epoch) and the Unix epoch.
const FILETIME_UNIX_OFFSET_SECS: u64 = 11_644_473_600;

/// A property value as produced by a data source adapter.
///
/// The same type carries normalized values: transcoding rules that produce
/// labels return [`Value::String`], everything else passes through.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Value {
    Empty,
    Null,
    Bool(bool),
    Int(i64),
    #[cfg_attr(feature = "serde", serde(rename = "uint"))]
    UInt(u64),
    Float(f64),
    /// 64-bit fixed-point currency, scaled by 10 000 (`VT_CY`).
    Currency(i64),
    Date(NaiveDateTime),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Converts an OLE Automation date (days since 1899-12-30, fraction =
    /// time of day) into a [`Value::Date`].
    ///
    /// Returns `None` when the date falls outside chrono's range.
    ///
    /// # Examples
    /// ```
    /// use opc_da_properties::Value;
    ///
    /// let v = Value::from_ole_date(25569.5).unwrap();
    /// assert_eq!(v.to_string(), "1970-01-01 12:00:00");
    /// ```
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_ole_date(ole_date: f64) -> Option<Self> {
        if !ole_date.is_finite() {
            return None;
        }
        let total_secs = ((ole_date - OLE_EPOCH_DAYS) * 86_400.0).round();
        if total_secs.abs() > i64::MAX as f64 {
            return None;
        }
        chrono::DateTime::from_timestamp(total_secs as i64, 0).map(|utc| Self::Date(utc.naive_utc()))
    }

    /// Converts a FILETIME (100 ns intervals since 1601-01-01) into a
    /// [`Value::Date`]. A zero FILETIME means "never" and maps to
    /// [`Value::Empty`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_filetime(intervals: u64) -> Option<Self> {
        if intervals == 0 {
            return Some(Self::Empty);
        }
        let unix_secs = (intervals / 10_000_000).checked_sub(FILETIME_UNIX_OFFSET_SECS)?;
        let nanos = ((intervals % 10_000_000) * 100) as u32;
        chrono::DateTime::from_timestamp(unix_secs as i64, nanos)
            .map(|utc| Self::Date(utc.naive_utc()))
    }

    /// Returns the value as a signed integer when it holds one.
    ///
    /// Floats are not coerced; code-valued properties are integral by
    /// contract.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Currency(_) => "currency",
            Self::Date(_) => "date",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Currency(raw) => {
                let sign = if *raw < 0 { "-" } else { "" };
                let abs = raw.unsigned_abs();
                write!(f, "{sign}{}.{:04}", abs / 10_000, abs % 10_000)
            }
            Self::Date(dt) => write!(f, "{}", dt.format(DATE_FORMAT)),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => write!(f, "Array[{}]", items.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Empty.to_string(), "Empty");
        assert_eq!(Value::Null.to_string(), "Null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::UInt(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::from("Good").to_string(), "Good");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "Array[2]"
        );
    }

    #[test]
    fn test_display_currency() {
        assert_eq!(Value::Currency(123_456_789).to_string(), "12345.6789");
        assert_eq!(Value::Currency(-500_001).to_string(), "-50.0001");
        assert_eq!(Value::Currency(-1).to_string(), "-0.0001");
    }

    #[test]
    fn test_display_date_has_no_timezone_shift() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        assert_eq!(Value::Date(dt).to_string(), "2024-05-01 12:30:05");
    }

    #[test]
    fn test_from_ole_date() {
        assert_eq!(
            Value::from_ole_date(0.0).unwrap().to_string(),
            "1899-12-30 00:00:00"
        );
        assert_eq!(
            Value::from_ole_date(45_413.25).unwrap().to_string(),
            "2024-05-01 06:00:00"
        );
        assert_eq!(Value::from_ole_date(f64::NAN), None);
    }

    #[test]
    fn test_from_filetime() {
        assert_eq!(Value::from_filetime(0), Some(Value::Empty));
        // 2024-05-01 00:00:00 UTC
        let intervals = (1_714_521_600 + FILETIME_UNIX_OFFSET_SECS) * 10_000_000;
        assert_eq!(
            Value::from_filetime(intervals).unwrap().to_string(),
            "2024-05-01 00:00:00"
        );
        // Before the Unix epoch is out of range for this conversion.
        assert_eq!(Value::from_filetime(1), None);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::UInt(192).as_i64(), Some(192));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Float(3.0).as_i64(), None);
        assert_eq!(Value::from("3").as_i64(), None);
    }
}
