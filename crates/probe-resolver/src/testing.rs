//! In-crate mock host used by the unit tests.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use state_probe_types::{
    HostVersion, MethodShape, MethodSignature, StructuredValue, TypeHandle, TypeRef,
};

use crate::host::{
    CandidateEnumerator, CandidateOperation, HostEnvironment, SampleProvider, StateBlobConverter,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MockBlob {
    Map(BTreeMap<String, i64>),
    Junk,
}

impl MockBlob {
    fn len(&self) -> usize {
        match self {
            MockBlob::Map(map) => map.len(),
            MockBlob::Junk => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockInstance {
    pub state: BTreeMap<String, i64>,
    /// Size of every blob handed to an operation, in call order.
    pub seen_sizes: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Reader,
    Writer,
    Clobber,
    Failing,
    ReturningWriter,
    ReturningNull,
    ReturningEcho,
    ReturningWritesArgumentOnly,
}

#[derive(Debug, Clone)]
pub struct MockOp {
    signature: MethodSignature,
    behavior: Behavior,
}

impl MockOp {
    fn void(name: &str, behavior: Behavior) -> Self {
        Self {
            signature: MethodSignature::public(name, TypeRef::Void, vec![TypeRef::StateBlob]),
            behavior,
        }
    }

    fn returning(name: &str, behavior: Behavior) -> Self {
        Self {
            signature: MethodSignature::public(
                name,
                TypeRef::StateBlob,
                vec![TypeRef::StateBlob],
            ),
            behavior,
        }
    }

    /// Reads the blob into the instance, leaving it untouched.
    pub fn void_reader(name: &str) -> Self {
        Self::void(name, Behavior::Reader)
    }

    /// Writes the instance state (plus a marker) into the blob.
    pub fn void_writer(name: &str) -> Self {
        Self::void(name, Behavior::Writer)
    }

    /// Replaces the blob with something that is not a container.
    pub fn void_clobber(name: &str) -> Self {
        Self::void(name, Behavior::Clobber)
    }

    pub fn failing(name: &str) -> Self {
        Self::void(name, Behavior::Failing)
    }

    pub fn returning_writer(name: &str) -> Self {
        Self::returning(name, Behavior::ReturningWriter)
    }

    pub fn returning_null(name: &str) -> Self {
        Self::returning(name, Behavior::ReturningNull)
    }

    /// Returns its argument unchanged.
    pub fn returning_echo(name: &str) -> Self {
        Self::returning(name, Behavior::ReturningEcho)
    }

    pub fn returning_writes_argument_only(name: &str) -> Self {
        Self::returning(name, Behavior::ReturningWritesArgumentOnly)
    }
}

fn write_state(instance: &MockInstance, blob: &mut MockBlob) {
    let mut map = instance.state.clone();
    map.insert("marker".to_string(), 1);
    *blob = MockBlob::Map(map);
}

impl CandidateOperation for MockOp {
    type Instance = MockInstance;
    type Blob = MockBlob;

    fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    fn invoke(&self, instance: &mut MockInstance, blob: &mut MockBlob) -> Result<Option<MockBlob>> {
        instance.seen_sizes.push(blob.len());
        match self.behavior {
            Behavior::Reader => {
                if let MockBlob::Map(map) = blob {
                    instance.state.extend(map.iter().map(|(k, v)| (k.clone(), *v)));
                }
                Ok(None)
            }
            Behavior::Writer => {
                write_state(instance, blob);
                Ok(None)
            }
            Behavior::Clobber => {
                *blob = MockBlob::Junk;
                Ok(None)
            }
            Behavior::Failing => Err(anyhow!("host exception")),
            Behavior::ReturningWriter => {
                let mut out = MockBlob::Map(BTreeMap::new());
                write_state(instance, &mut out);
                Ok(Some(out))
            }
            Behavior::ReturningNull => Ok(None),
            Behavior::ReturningEcho => Ok(Some(blob.clone())),
            Behavior::ReturningWritesArgumentOnly => {
                write_state(instance, blob);
                Ok(Some(MockBlob::Map(BTreeMap::new())))
            }
        }
    }
}

pub struct MockEnumerator {
    ops: Vec<MockOp>,
}

impl MockEnumerator {
    pub fn new(ops: Vec<MockOp>) -> Self {
        Self { ops }
    }

    pub fn owner() -> TypeHandle {
        TypeHandle::new("MockEntity")
    }
}

impl CandidateEnumerator for MockEnumerator {
    type Operation = MockOp;

    fn find_methods(&self, owner: &TypeHandle, shape: &MethodShape) -> Vec<MockOp> {
        if *owner != Self::owner() {
            return Vec::new();
        }
        self.ops
            .iter()
            .filter(|op| shape.matches(&op.signature))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Copy)]
pub struct MockConverter;

impl StateBlobConverter for MockConverter {
    type Blob = MockBlob;

    fn to_opaque(&self, value: &StructuredValue) -> Result<MockBlob> {
        let map = value
            .as_compound()
            .ok_or_else(|| anyhow!("not a compound"))?;
        let mut out = BTreeMap::new();
        for (key, value) in map {
            match value {
                StructuredValue::Int(v) => {
                    out.insert(key.clone(), *v);
                }
                other => return Err(anyhow!("unsupported {} entry '{}'", other.kind(), key)),
            }
        }
        Ok(MockBlob::Map(out))
    }

    fn from_opaque(&self, blob: &MockBlob) -> Option<StructuredValue> {
        match blob {
            MockBlob::Map(map) => Some(StructuredValue::Compound(
                map.iter()
                    .map(|(k, v)| (k.clone(), StructuredValue::Int(*v)))
                    .collect(),
            )),
            MockBlob::Junk => None,
        }
    }
}

pub struct MockHost {
    pub contexts: usize,
    pub version: HostVersion,
}

impl MockHost {
    pub fn ready(version: HostVersion) -> Self {
        Self {
            contexts: 1,
            version,
        }
    }
}

impl HostEnvironment for MockHost {
    fn active_contexts(&self) -> usize {
        self.contexts
    }

    fn version(&self) -> HostVersion {
        self.version
    }
}

#[derive(Default)]
pub struct MockProvider {
    pub spawned: usize,
    pub removed: usize,
    pub fail_spawn: bool,
}

impl SampleProvider for MockProvider {
    type Instance = MockInstance;

    fn spawn(&mut self) -> Result<MockInstance> {
        if self.fail_spawn {
            return Err(anyhow!("no room to spawn"));
        }
        self.spawned += 1;
        Ok(MockInstance::default())
    }

    fn remove(&mut self) {
        self.removed += 1;
    }

    fn base_type(&self) -> TypeHandle {
        MockEnumerator::owner()
    }
}
