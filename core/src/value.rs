//! Property value types.
//!
//! A property holds either a single typed value or an ordered sequence of
//! values. Reference values point at nodes by Identifier; hard references
//! take part in referential integrity, weak ones do not.

use crate::Identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A typed value that can be stored in a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Binary(Vec<u8>),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit floating point.
    Double(f64),
    /// Boolean value.
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    /// A qualified name.
    Name(String),
    /// A repository path.
    Path(String),
    /// A URI.
    Uri(String),
    /// Hard reference, checked for referential integrity.
    Reference(Identifier),
    /// Weak reference, may dangle.
    WeakReference(Identifier),
}

impl Value {
    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Binary(_) => "Binary",
            Value::Long(_) => "Long",
            Value::Double(_) => "Double",
            Value::Boolean(_) => "Boolean",
            Value::Date(_) => "Date",
            Value::Name(_) => "Name",
            Value::Path(_) => "Path",
            Value::Uri(_) => "URI",
            Value::Reference(_) => "Reference",
            Value::WeakReference(_) => "WeakReference",
        }
    }

    /// Get as string slice for the textual types.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Name(s) | Value::Path(s) | Value::Uri(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer if this is a Long value.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as boolean if this is a Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The target of a hard reference.
    pub fn hard_reference(&self) -> Option<Identifier> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// The target of a hard or weak reference.
    pub fn any_reference(&self) -> Option<Identifier> {
        match self {
            Value::Reference(id) | Value::WeakReference(id) => Some(*id),
            _ => None,
        }
    }

    /// Rewrite a reference target; other values are returned unchanged.
    pub fn with_reference(&self, target: Identifier) -> Value {
        match self {
            Value::Reference(_) => Value::Reference(target),
            Value::WeakReference(_) => Value::WeakReference(target),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Binary(b) => write!(f, "<{} bytes>", b.len()),
            Value::Long(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(ms) => write!(f, "date:{}", ms),
            Value::Name(n) => write!(f, "{}", n),
            Value::Path(p) => write!(f, "{}", p),
            Value::Uri(u) => write!(f, "<{}>", u),
            Value::Reference(id) => write!(f, "ref:{}", id),
            Value::WeakReference(id) => write!(f, "weakref:{}", id),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Long(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// The content of a property: one value or an ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Single(Value),
    Multiple(Vec<Value>),
}

impl PropertyValue {
    pub fn is_multiple(&self) -> bool {
        matches!(self, PropertyValue::Multiple(_))
    }

    /// The single value, or `None` for a multi-valued property.
    pub fn single(&self) -> Option<&Value> {
        match self {
            PropertyValue::Single(v) => Some(v),
            PropertyValue::Multiple(_) => None,
        }
    }

    /// All values in order.
    pub fn values(&self) -> &[Value] {
        match self {
            PropertyValue::Single(v) => std::slice::from_ref(v),
            PropertyValue::Multiple(vs) => vs,
        }
    }

    /// Hard reference targets held by this property.
    pub fn hard_references(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.values().iter().filter_map(Value::hard_reference)
    }

    /// Apply `f` to every value.
    pub fn map_values(&self, mut f: impl FnMut(&Value) -> Value) -> PropertyValue {
        match self {
            PropertyValue::Single(v) => PropertyValue::Single(f(v)),
            PropertyValue::Multiple(vs) => PropertyValue::Multiple(vs.iter().map(f).collect()),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::Single(value)
    }
}

impl From<Vec<Value>> for PropertyValue {
    fn from(values: Vec<Value>) -> Self {
        PropertyValue::Multiple(values)
    }
}

macro_rules! single_value_from {
    ($($t:ty),+) => {
        $(
            impl From<$t> for PropertyValue {
                fn from(value: $t) -> Self {
                    PropertyValue::Single(Value::from(value))
                }
            }
        )+
    };
}

single_value_from!(bool, i64, i32, f64, String, &str);

/// Properties of a node keyed by name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Helper macro to create property maps.
#[macro_export]
macro_rules! props {
    () => {
        std::collections::BTreeMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = std::collections::BTreeMap::new();
            $(
                map.insert($key.to_string(), $crate::PropertyValue::from($value));
            )+
            map
        }
    };
}
