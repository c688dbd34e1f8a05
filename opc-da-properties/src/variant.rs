//! Automation variant type codes (`VARENUM`) and their symbolic names.
//!
//! The table is closed: any code it does not cover is rejected with
//! [`OpcError::UnknownVariantType`], since it means the adapter speaks a
//! different protocol revision than this core.

use std::fmt;
use std::str::FromStr;

use crate::errors::{OpcError, OpcResult};

/// `VT_ARRAY` modifier flag, OR-ed onto a base type code.
pub const VT_ARRAY: u16 = 0x2000;

/// Scalar automation variant types.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarEnum {
    Empty = 0,
    Null = 1,
    I2 = 2,
    I4 = 3,
    R4 = 4,
    R8 = 5,
    Cy = 6,
    Date = 7,
    Bstr = 8,
    Dispatch = 9,
    Error = 10,
    Bool = 11,
    Variant = 12,
    Unknown = 13,
    Decimal = 14,
    I1 = 16,
    Ui1 = 17,
    Ui2 = 18,
    Ui4 = 19,
    I8 = 20,
    Ui8 = 21,
    Int = 22,
    Uint = 23,
}

impl VarEnum {
    /// Every supported scalar type, in code order.
    pub const ALL: [Self; 23] = [
        Self::Empty,
        Self::Null,
        Self::I2,
        Self::I4,
        Self::R4,
        Self::R8,
        Self::Cy,
        Self::Date,
        Self::Bstr,
        Self::Dispatch,
        Self::Error,
        Self::Bool,
        Self::Variant,
        Self::Unknown,
        Self::Decimal,
        Self::I1,
        Self::Ui1,
        Self::Ui2,
        Self::Ui4,
        Self::I8,
        Self::Ui8,
        Self::Int,
        Self::Uint,
    ];

    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "VT_EMPTY",
            Self::Null => "VT_NULL",
            Self::I2 => "VT_I2",
            Self::I4 => "VT_I4",
            Self::R4 => "VT_R4",
            Self::R8 => "VT_R8",
            Self::Cy => "VT_CY",
            Self::Date => "VT_DATE",
            Self::Bstr => "VT_BSTR",
            Self::Dispatch => "VT_DISPATCH",
            Self::Error => "VT_ERROR",
            Self::Bool => "VT_BOOL",
            Self::Variant => "VT_VARIANT",
            Self::Unknown => "VT_UNKNOWN",
            Self::Decimal => "VT_DECIMAL",
            Self::I1 => "VT_I1",
            Self::Ui1 => "VT_UI1",
            Self::Ui2 => "VT_UI2",
            Self::Ui4 => "VT_UI4",
            Self::I8 => "VT_I8",
            Self::Ui8 => "VT_UI8",
            Self::Int => "VT_INT",
            Self::Uint => "VT_UINT",
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|vt| vt.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|vt| vt.name() == name)
    }

    /// Checks that every table entry maps back to itself by code and by name.
    ///
    /// # Errors
    /// Returns [`OpcError::Internal`] naming the first entry that does not
    /// round-trip.
    pub fn verify_table() -> OpcResult<()> {
        for vt in Self::ALL {
            if Self::from_code(vt.code()) != Some(vt) || Self::from_name(vt.name()) != Some(vt) {
                return Err(OpcError::Internal(format!(
                    "variant type table entry {} ({}) does not round-trip",
                    vt.name(),
                    vt.code()
                )));
            }
        }
        Ok(())
    }
}

/// A resolved variant type: a scalar base, optionally under `VT_ARRAY`.
///
/// # Examples
/// ```
/// use opc_da_properties::{VarEnum, VariantType};
///
/// let vt = VariantType::try_from(8209_u16).unwrap();
/// assert_eq!(vt, VariantType::array_of(VarEnum::Ui1));
/// assert_eq!(vt.to_string(), "VT_ARRAY | VT_UI1");
/// assert_eq!("VT_ARRAY | VT_UI1".parse::<VariantType>().unwrap().code(), 8209);
///
/// assert!(VariantType::try_from(15_u16).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantType {
    base: VarEnum,
    array: bool,
}

impl VariantType {
    pub const fn scalar(base: VarEnum) -> Self {
        Self { base, array: false }
    }

    pub const fn array_of(base: VarEnum) -> Self {
        Self { base, array: true }
    }

    pub const fn base(self) -> VarEnum {
        self.base
    }

    pub const fn is_array(self) -> bool {
        self.array
    }

    pub const fn code(self) -> u16 {
        if self.array {
            self.base.code() | VT_ARRAY
        } else {
            self.base.code()
        }
    }
}

impl From<VarEnum> for VariantType {
    fn from(base: VarEnum) -> Self {
        Self::scalar(base)
    }
}

impl TryFrom<u16> for VariantType {
    type Error = OpcError;

    fn try_from(code: u16) -> OpcResult<Self> {
        let array = code & VT_ARRAY != 0;
        VarEnum::from_code(code & !VT_ARRAY)
            .map(|base| Self { base, array })
            .ok_or(OpcError::UnknownVariantType(code))
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.array, self.base) {
            (true, VarEnum::Empty) => f.write_str("VT_ARRAY"),
            (true, base) => write!(f, "VT_ARRAY | {}", base.name()),
            (false, base) => f.write_str(base.name()),
        }
    }
}

impl FromStr for VariantType {
    type Err = OpcError;

    fn from_str(s: &str) -> OpcResult<Self> {
        let unknown = || OpcError::Conversion(format!("unknown variant type name '{s}'"));
        let s = s.trim();
        if s == "VT_ARRAY" {
            return Ok(Self::array_of(VarEnum::Empty));
        }
        match s.split_once('|') {
            Some((flag, base)) if flag.trim() == "VT_ARRAY" => VarEnum::from_name(base.trim())
                .map(Self::array_of)
                .ok_or_else(unknown),
            Some(_) => Err(unknown()),
            None => VarEnum::from_name(s).map(Self::scalar).ok_or_else(unknown),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VariantType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
