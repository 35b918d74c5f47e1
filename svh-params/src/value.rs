//! Dynamically typed configuration values.
//!
//! Parameter documents arrive as a loosely typed tree (YAML on disk, an
//! `XmlRpcValue` on a ROS parameter server). Everything that reads such a
//! tree goes through [`ParamValue`] so that the one place that turns
//! untyped data into hand settings is the resolver's conversion step.

use std::collections::BTreeMap;
use std::fmt;

/// A mapping of string keys to values. Ordered so that iteration, and
/// therefore every report produced while walking a record, is stable.
pub type Record = BTreeMap<String, ParamValue>;

/// The type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array,
    Record,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Double => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Record => write!(f, "record"),
        }
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(std::string::String),
    Array(Vec<ParamValue>),
    Record(Record),
}

impl ParamValue {
    /// Returns the parameter type of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Null => ParamType::Null,
            Self::Bool(_) => ParamType::Bool,
            Self::Integer(_) => ParamType::Integer,
            Self::Double(_) => ParamType::Double,
            Self::String(_) => ParamType::String,
            Self::Array(_) => ParamType::Array,
            Self::Record(_) => ParamType::Record,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ParamValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`; booleans and
    /// strings are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Look up `key` if this value is a record.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.as_record().and_then(|r| r.get(key))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<Record> for ParamValue {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}
