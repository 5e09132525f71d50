use serde::{Deserialize, Serialize};

use crate::cas::Addr;

/// Value of a named feature on a feature structure
///
/// Primitive variants mirror the primitive feature ranges of an annotation
/// type system. `Ref` points at another feature structure in the same
/// document (an annotation or a plain structure such as a link record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Ref(Addr),
    Array(Vec<FeatureValue>),
}

impl FeatureValue {
    /// String content, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Referenced address, if this is a reference
    pub fn as_addr(&self) -> Option<Addr> {
        match self {
            FeatureValue::Ref(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Elements, if this is an array
    pub fn as_array(&self) -> Option<&[FeatureValue]> {
        match self {
            FeatureValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Short name of the value kind, used when logging kind mismatches
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureValue::Null => "null",
            FeatureValue::Bool(_) => "bool",
            FeatureValue::Byte(_) => "byte",
            FeatureValue::Short(_) => "short",
            FeatureValue::Int(_) => "int",
            FeatureValue::Long(_) => "long",
            FeatureValue::Float(_) => "float",
            FeatureValue::Double(_) => "double",
            FeatureValue::Str(_) => "string",
            FeatureValue::Ref(_) => "ref",
            FeatureValue::Array(_) => "array",
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Str(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Str(s)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

impl From<i32> for FeatureValue {
    fn from(i: i32) -> Self {
        FeatureValue::Int(i)
    }
}

impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self {
        FeatureValue::Long(i)
    }
}

impl From<f64> for FeatureValue {
    fn from(d: f64) -> Self {
        FeatureValue::Double(d)
    }
}

impl From<Addr> for FeatureValue {
    fn from(addr: Addr) -> Self {
        FeatureValue::Ref(addr)
    }
}

impl<T: Into<FeatureValue>> From<Vec<T>> for FeatureValue {
    fn from(items: Vec<T>) -> Self {
        FeatureValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FeatureValue>> From<Option<T>> for FeatureValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FeatureValue::Null)
    }
}
