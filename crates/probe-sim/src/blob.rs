//! The simulated host's tagged state format and its converter.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use state_probe_resolver::StateBlobConverter;
use state_probe_types::StructuredValue;

/// A host-side tagged value, shaped like a classic binary tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SimBlob {
    /// Terminator tag. Carries no value.
    End,
    Byte(i8),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    /// Elements must all share one tag.
    List(Vec<SimBlob>),
    Compound(BTreeMap<String, SimBlob>),
}

impl SimBlob {
    pub fn empty_compound() -> Self {
        SimBlob::Compound(BTreeMap::new())
    }

    pub fn tag_id(&self) -> u8 {
        match self {
            SimBlob::End => 0,
            SimBlob::Byte(_) => 1,
            SimBlob::Int(_) => 3,
            SimBlob::Long(_) => 4,
            SimBlob::Double(_) => 6,
            SimBlob::String(_) => 8,
            SimBlob::List(_) => 9,
            SimBlob::Compound(_) => 10,
        }
    }

    pub fn as_compound(&self) -> Option<&BTreeMap<String, SimBlob>> {
        match self {
            SimBlob::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut BTreeMap<String, SimBlob>> {
        match self {
            SimBlob::Compound(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for SimBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimBlob::End => f.write_str("END"),
            SimBlob::Byte(v) => write!(f, "{v}b"),
            SimBlob::Int(v) => write!(f, "{v}"),
            SimBlob::Long(v) => write!(f, "{v}L"),
            SimBlob::Double(v) => write!(f, "{v}d"),
            SimBlob::String(v) => write!(f, "{v:?}"),
            SimBlob::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            SimBlob::Compound(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Converts between [`SimBlob`] and [`StructuredValue`].
///
/// Booleans travel as bytes and integers as longs. Only a compound root
/// yields a structured value; any other root reads as "no value".
#[derive(Debug, Clone, Copy, Default)]
pub struct SimBlobConverter;

impl SimBlobConverter {
    fn encode(value: &StructuredValue) -> Result<SimBlob> {
        Ok(match value {
            StructuredValue::Bool(v) => SimBlob::Byte(i8::from(*v)),
            StructuredValue::Int(v) => SimBlob::Long(*v),
            StructuredValue::Double(v) => SimBlob::Double(*v),
            StructuredValue::String(v) => SimBlob::String(v.clone()),
            StructuredValue::List(items) => {
                let items = items.iter().map(Self::encode).collect::<Result<Vec<_>>>()?;
                if let Some(first) = items.first() {
                    if items.iter().any(|item| item.tag_id() != first.tag_id()) {
                        bail!("list elements must share one tag");
                    }
                }
                SimBlob::List(items)
            }
            StructuredValue::Compound(map) => SimBlob::Compound(
                map.iter()
                    .map(|(key, value)| Ok((key.clone(), Self::encode(value)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    fn decode(blob: &SimBlob) -> Option<StructuredValue> {
        Some(match blob {
            SimBlob::End => return None,
            SimBlob::Byte(v @ (0 | 1)) => StructuredValue::Bool(*v == 1),
            SimBlob::Byte(v) => StructuredValue::Int(i64::from(*v)),
            SimBlob::Int(v) => StructuredValue::Int(i64::from(*v)),
            SimBlob::Long(v) => StructuredValue::Int(*v),
            SimBlob::Double(v) => StructuredValue::Double(*v),
            SimBlob::String(v) => StructuredValue::String(v.clone()),
            SimBlob::List(items) => StructuredValue::List(items.iter().filter_map(Self::decode).collect()),
            SimBlob::Compound(map) => StructuredValue::Compound(
                map.iter()
                    .filter_map(|(key, value)| Some((key.clone(), Self::decode(value)?)))
                    .collect(),
            ),
        })
    }
}

impl StateBlobConverter for SimBlobConverter {
    type Blob = SimBlob;

    fn to_opaque(&self, value: &StructuredValue) -> Result<SimBlob> {
        Self::encode(value)
    }

    fn from_opaque(&self, blob: &SimBlob) -> Option<StructuredValue> {
        match blob {
            SimBlob::Compound(_) => Self::decode(blob),
            _ => None,
        }
    }
}
