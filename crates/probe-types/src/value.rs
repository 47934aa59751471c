//! Host-independent structured values.
//!
//! A [`StructuredValue`] is what a host state blob looks like once it has been
//! converted out of the host's own representation. The resolver only ever asks
//! one question of it (is the compound empty?), but downstream consumers read
//! and edit entity state through it, so it carries a small tag-like model:
//! scalars, lists and string-keyed compounds.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key/value container backing [`StructuredValue::Compound`].
pub type Compound = BTreeMap<String, StructuredValue>;

/// A structured state value.
///
/// Serialized untagged so that plain JSON documents map onto it directly:
/// objects become compounds, arrays become lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<StructuredValue>),
    Compound(Compound),
}

impl StructuredValue {
    /// A compound with no entries. Every probe starts from one of these.
    pub fn empty_compound() -> Self {
        StructuredValue::Compound(Compound::new())
    }

    /// Whether the value carries no entries.
    ///
    /// Only containers and strings can be empty; scalars never are.
    pub fn is_empty(&self) -> bool {
        match self {
            StructuredValue::Compound(map) => map.is_empty(),
            StructuredValue::List(items) => items.is_empty(),
            StructuredValue::String(s) => s.is_empty(),
            StructuredValue::Bool(_) | StructuredValue::Int(_) | StructuredValue::Double(_) => {
                false
            }
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, StructuredValue::Compound(_))
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            StructuredValue::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            StructuredValue::Compound(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a compound.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.as_compound().and_then(|map| map.get(key))
    }

    /// Insert into a compound, returning the previous value.
    ///
    /// Returns `None` without inserting when this value is not a compound.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: StructuredValue,
    ) -> Option<StructuredValue> {
        self.as_compound_mut()
            .and_then(|map| map.insert(key.into(), value))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StructuredValue::Bool(_) => "bool",
            StructuredValue::Int(_) => "int",
            StructuredValue::Double(_) => "double",
            StructuredValue::String(_) => "string",
            StructuredValue::List(_) => "list",
            StructuredValue::Compound(_) => "compound",
        }
    }
}

impl Default for StructuredValue {
    fn default() -> Self {
        Self::empty_compound()
    }
}

impl From<Compound> for StructuredValue {
    fn from(map: Compound) -> Self {
        StructuredValue::Compound(map)
    }
}

impl From<bool> for StructuredValue {
    fn from(v: bool) -> Self {
        StructuredValue::Bool(v)
    }
}

impl From<i64> for StructuredValue {
    fn from(v: i64) -> Self {
        StructuredValue::Int(v)
    }
}

impl From<f64> for StructuredValue {
    fn from(v: f64) -> Self {
        StructuredValue::Double(v)
    }
}

impl From<&str> for StructuredValue {
    fn from(v: &str) -> Self {
        StructuredValue::String(v.to_string())
    }
}

impl From<String> for StructuredValue {
    fn from(v: String) -> Self {
        StructuredValue::String(v)
    }
}

impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredValue::Bool(v) => write!(f, "{}", v),
            StructuredValue::Int(v) => write!(f, "{}", v),
            StructuredValue::Double(v) => write!(f, "{:?}", v),
            StructuredValue::String(s) => write!(f, "{:?}", s),
            StructuredValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            StructuredValue::Compound(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
