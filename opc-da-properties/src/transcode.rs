//! Per-property value transcoding, dispatched on the property description.

use crate::catalog::WellKnownProperty;
use crate::errors::{OpcError, OpcResult};
use crate::quality::{access_rights_label, quality_label};
use crate::value::Value;
use crate::variant::VariantType;

const CANONICAL_DATATYPE: &str = WellKnownProperty::CanonicalDataType.description();
const TIMESTAMP: &str = WellKnownProperty::Timestamp.description();
const ACCESS_RIGHTS: &str = WellKnownProperty::AccessRights.description();
const QUALITY: &str = WellKnownProperty::Quality.description();

/// Turn a raw property value into its display-ready form.
///
/// | description               | result                                  |
/// |---------------------------|-----------------------------------------|
/// | `Item Canonical DataType` | variant type name, e.g. `VT_R8`         |
/// | `Item Timestamp`          | the value rendered as a string          |
/// | `Item Access Rights`      | `(none)`, `Read`, `Write`, `Read/Write` |
/// | `Item Quality`            | `Bad`, `Uncertain`, `Unknown`, `Good`   |
/// | anything else             | unchanged                               |
///
/// `Empty` and `Null` carry no code, so the code-valued rules pass them
/// through unchanged. Servers answer a failed slot that way.
///
/// # Examples
/// ```
/// use opc_da_properties::{transcode, Value};
///
/// let v = transcode("Item Quality", Value::Int(7)).unwrap();
/// assert_eq!(v, Value::from("Good"));
///
/// let v = transcode("Item Description", Value::Int(7)).unwrap();
/// assert_eq!(v, Value::Int(7));
/// ```
///
/// # Errors
/// Returns [`OpcError::UnknownVariantType`] for an unrecognized canonical
/// datatype and [`OpcError::Conversion`] when a code-valued property holds a
/// non-integer or out-of-range value.
pub fn transcode(description: &str, raw: Value) -> OpcResult<Value> {
    if matches!(raw, Value::Empty | Value::Null) && description != TIMESTAMP {
        return Ok(raw);
    }
    match description {
        CANONICAL_DATATYPE => {
            let code = u16::try_from(integer_code(description, &raw)?)
                .map_err(|_| OpcError::Conversion(format!("{description}: {raw} is not a variant type code")))?;
            Ok(Value::String(VariantType::try_from(code)?.to_string()))
        }
        TIMESTAMP => Ok(Value::String(raw.to_string())),
        ACCESS_RIGHTS => Ok(access_rights_label(integer_code(description, &raw)?)?.into()),
        QUALITY => Ok(quality_label(integer_code(description, &raw)?).into()),
        _ => Ok(raw),
    }
}

fn integer_code(description: &str, raw: &Value) -> OpcResult<i64> {
    raw.as_i64().ok_or_else(|| {
        OpcError::Conversion(format!(
            "{description}: expected an integer code, got {} value '{raw}'",
            raw.kind()
        ))
    })
}
