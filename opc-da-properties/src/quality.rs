//! Fixed label tables for access-rights and quality codes.

use crate::errors::{OpcError, OpcResult};

/// Labels for the `Item Access Rights` property, indexed by code.
pub const ACCESS_RIGHTS: [&str; 4] = ["(none)", "Read", "Write", "Read/Write"];

/// Labels for OPC quality codes, indexed by code.
pub const OPC_QUALITY: [&str; 4] = ["Bad", "Uncertain", "Unknown", "Good"];

/// Map an access-rights code to its label.
///
/// # Errors
/// Returns [`OpcError::Conversion`] for codes outside `0..=3`.
pub fn access_rights_label(code: i64) -> OpcResult<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|idx| ACCESS_RIGHTS.get(idx).copied())
        .ok_or_else(|| OpcError::Conversion(format!("access rights code {code} is out of range")))
}

/// Map an isolated quality code to its label. Codes are clamped to `0..=3`.
///
/// # Examples
/// ```
/// use opc_da_properties::quality_label;
///
/// assert_eq!(quality_label(0), "Bad");
/// assert_eq!(quality_label(7), "Good");
/// assert_eq!(quality_label(-1), "Bad");
/// ```
pub const fn quality_label(code: i64) -> &'static str {
    let idx = match code {
        ..=0 => 0,
        1 => 1,
        2 => 2,
        _ => 3,
    };
    OPC_QUALITY[idx]
}

/// Map a packed OPC status word to a quality label.
///
/// Only bits 6–7 are considered; sub-status and limit bits are ignored.
pub const fn quality_to_string(status: u16) -> &'static str {
    OPC_QUALITY[((status >> 6) & 0b11) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_rights_labels() {
        assert_eq!(access_rights_label(0).unwrap(), "(none)");
        assert_eq!(access_rights_label(1).unwrap(), "Read");
        assert_eq!(access_rights_label(2).unwrap(), "Write");
        assert_eq!(access_rights_label(3).unwrap(), "Read/Write");
    }

    #[test]
    fn test_access_rights_out_of_range() {
        assert!(matches!(access_rights_label(4), Err(OpcError::Conversion(_))));
        assert!(matches!(access_rights_label(-1), Err(OpcError::Conversion(_))));
    }

    #[test]
    fn test_quality_label_clamps() {
        assert_eq!(quality_label(0), "Bad");
        assert_eq!(quality_label(1), "Uncertain");
        assert_eq!(quality_label(2), "Unknown");
        assert_eq!(quality_label(3), "Good");
        assert_eq!(quality_label(7), "Good");
        assert_eq!(quality_label(192), "Good");
        assert_eq!(quality_label(-1), "Bad");
        assert_eq!(quality_label(i64::MIN), "Bad");
    }

    #[test]
    fn test_quality_to_string_all_cases() {
        assert_eq!(quality_to_string(0xC0), "Good");
        assert_eq!(quality_to_string(0x00), "Bad");
        assert_eq!(quality_to_string(0x40), "Uncertain");
        assert_eq!(quality_to_string(0x80), "Unknown");
        assert_eq!(quality_to_string(0xC4), "Good"); // sub-status bits ignored
        assert_eq!(quality_to_string(0x04), "Bad");
        assert_eq!(quality_to_string(0x01D8), "Good"); // vendor bits above 7 ignored
    }
}
