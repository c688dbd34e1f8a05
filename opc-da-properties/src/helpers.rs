use crate::errors::OpcError;

/// Maps known COM/DCOM and OPC status codes to actionable user hints.
///
/// # Examples
/// ```
/// use opc_da_properties::friendly_hresult_hint;
///
/// assert_eq!(
///     friendly_hresult_hint(0x8004_0154),
///     Some("Server is not registered on this machine"),
/// );
/// assert_eq!(friendly_hresult_hint(0), None);
/// ```
pub const fn friendly_hresult_hint(code: u32) -> Option<&'static str> {
    match code {
        0x8004_0112 => Some("Server license does not permit OPC client connections"),
        0x8008_0005 => Some("Server process failed to start: check if it is installed and running"),
        0x8007_0005 => {
            Some("Access denied: DCOM launch/activation permissions not configured for this user")
        }
        0x8007_06BA => {
            Some("RPC server unavailable: the target host may be offline or blocking RPC")
        }
        0x8007_06F4 => Some("COM marshalling error: try restarting the OPC server"),
        0x8004_0154 => Some("Server is not registered on this machine"),
        0x8007_0057 => Some("Invalid argument (E_INVALIDARG)"),
        0xC004_0004 => Some("Server rejected write: the item may be read-only (OPC_E_BADRIGHTS)"),
        0xC004_0006 => {
            Some("Data type mismatch: server cannot convert the value (OPC_E_BADTYPE)")
        }
        0xC004_0007 => Some("Item ID not found in server address space (OPC_E_UNKNOWNITEMID)"),
        0xC004_0008 => Some("Item ID syntax is invalid for this server (OPC_E_INVALIDITEMID)"),
        0xC004_0203 => Some("Property ID is not valid for this item (OPC_E_INVALID_PID)"),
        _ => None,
    }
}

/// Formats a status code as hex, followed by its hint when one is known.
///
/// # Examples
/// ```
/// use opc_da_properties::format_status;
///
/// assert_eq!(format_status(0x1), "0x00000001");
/// assert!(format_status(0xC004_0203).ends_with("(OPC_E_INVALID_PID)"));
/// ```
pub fn format_status(code: u32) -> String {
    let hex = format!("0x{code:08X}");
    match friendly_hresult_hint(code) {
        Some(hint) => format!("{hex}: {hint}"),
        None => hex,
    }
}

/// Maps an [`OpcError`] to a friendly hint if it carries a status code.
pub fn friendly_com_hint(error: &OpcError) -> Option<&'static str> {
    match error {
        OpcError::Server(_, code) => friendly_hresult_hint(*code),
        _ => None,
    }
}
