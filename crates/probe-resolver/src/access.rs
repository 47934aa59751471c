//! Reading and writing entity state through resolved capabilities.

use std::sync::Arc;

use state_probe_types::value::Compound;
use state_probe_types::StructuredValue;
use tracing::debug;

use crate::capabilities::{ResolvedCapabilities, Role, SaveConvention};
use crate::error::AccessError;
use crate::host::{CandidateOperation, StateBlobConverter};

/// Loads, saves and edits the state of live instances.
///
/// Cheap to clone; every clone shares the same resolved capabilities.
pub struct EntityStateAccess<Op, C> {
    capabilities: Arc<ResolvedCapabilities<Op>>,
    converter: C,
}

impl<Op, C: Clone> Clone for EntityStateAccess<Op, C> {
    fn clone(&self) -> Self {
        Self {
            capabilities: Arc::clone(&self.capabilities),
            converter: self.converter.clone(),
        }
    }
}

impl<Op, C> EntityStateAccess<Op, C>
where
    Op: CandidateOperation,
    C: StateBlobConverter<Blob = Op::Blob>,
{
    pub fn new(capabilities: Arc<ResolvedCapabilities<Op>>, converter: C) -> Self {
        Self {
            capabilities,
            converter,
        }
    }

    pub fn capabilities(&self) -> &Arc<ResolvedCapabilities<Op>> {
        &self.capabilities
    }

    /// Replace the instance's state with `state`.
    pub fn load(&self, instance: &mut Op::Instance, state: &StructuredValue) -> Result<(), AccessError> {
        if !state.is_compound() {
            return Err(AccessError::NotCompound(state.kind()));
        }
        let mut blob = self
            .converter
            .to_opaque(state)
            .map_err(AccessError::Conversion)?;
        let op = self.capabilities.load_operation();
        op.invoke(instance, &mut blob)
            .map_err(|source| AccessError::Invocation {
                role: Role::Load,
                operation: op.signature().to_string(),
                source,
            })?;
        Ok(())
    }

    /// Extract the instance's current state.
    pub fn save(&self, instance: &mut Op::Instance) -> Result<StructuredValue, AccessError> {
        let mut scratch = self
            .converter
            .to_opaque(&StructuredValue::empty_compound())
            .map_err(AccessError::Conversion)?;
        let op = self.capabilities.save_operation();
        let returned = op
            .invoke(instance, &mut scratch)
            .map_err(|source| AccessError::Invocation {
                role: Role::Save,
                operation: op.signature().to_string(),
                source,
            })?;

        let value = match self.capabilities.save_convention() {
            SaveConvention::Argument => self.converter.from_opaque(&scratch),
            SaveConvention::Returned => returned
                .as_ref()
                .and_then(|blob| self.converter.from_opaque(blob)),
        };
        value
            .filter(StructuredValue::is_compound)
            .ok_or_else(|| AccessError::NoState(op.signature().to_string()))
    }

    /// Save, edit the top-level compound with `edit`, and load the result back.
    ///
    /// Returns the state that was loaded.
    pub fn modify<F>(&self, instance: &mut Op::Instance, edit: F) -> Result<StructuredValue, AccessError>
    where
        F: FnOnce(&mut Compound),
    {
        let mut state = self.save(instance)?;
        if let Some(compound) = state.as_compound_mut() {
            edit(compound);
        }
        debug!(state = %state, "loading modified state");
        self.load(instance, &state)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::CapabilityResolver;
    use crate::testing::{MockConverter, MockEnumerator, MockHost, MockInstance, MockOp, MockProvider};
    use state_probe_types::HostVersion;

    fn access(version: HostVersion, ops: Vec<MockOp>) -> EntityStateAccess<MockOp, MockConverter> {
        let enumerator = MockEnumerator::new(ops);
        let resolved = CapabilityResolver::new(&enumerator, &MockConverter)
            .resolve(&MockHost::ready(version), &mut MockProvider::default())
            .unwrap();
        EntityStateAccess::new(Arc::new(resolved), MockConverter)
    }

    fn int(value: &StructuredValue, key: &str) -> Option<i64> {
        match value.get(key) {
            Some(StructuredValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    #[test]
    fn test_load_then_save_argument_convention() {
        let access = access(
            HostVersion::new(1, 8, 3),
            vec![MockOp::void_reader("load"), MockOp::void_writer("save")],
        );
        let mut instance = MockInstance::default();
        let mut state = StructuredValue::empty_compound();
        state.insert("health", StructuredValue::Int(20));
        access.load(&mut instance, &state).unwrap();

        let saved = access.save(&mut instance).unwrap();
        assert_eq!(int(&saved, "health"), Some(20));
        assert_eq!(int(&saved, "marker"), Some(1));
    }

    #[test]
    fn test_save_returned_convention() {
        let access = access(
            HostVersion::new(1, 12, 1),
            vec![MockOp::void_reader("load"), MockOp::returning_writer("save")],
        );
        let mut instance = MockInstance::default();
        instance.state.insert("level".to_string(), 3);
        let saved = access.save(&mut instance).unwrap();
        assert_eq!(int(&saved, "level"), Some(3));
    }

    #[test]
    fn test_load_rejects_non_compound() {
        let access = access(
            HostVersion::new(1, 8, 3),
            vec![MockOp::void_reader("load"), MockOp::void_writer("save")],
        );
        let err = access
            .load(&mut MockInstance::default(), &StructuredValue::Int(4))
            .unwrap_err();
        assert!(matches!(err, AccessError::NotCompound("int")));
    }

    #[test]
    fn test_load_conversion_failure() {
        let access = access(
            HostVersion::new(1, 8, 3),
            vec![MockOp::void_reader("load"), MockOp::void_writer("save")],
        );
        let mut state = StructuredValue::empty_compound();
        state.insert("name", StructuredValue::from("zombie"));
        let err = access.load(&mut MockInstance::default(), &state).unwrap_err();
        assert!(matches!(err, AccessError::Conversion(_)));
    }

    #[test]
    fn test_modify_round_trips_through_instance() {
        let access = access(
            HostVersion::new(1, 8, 3),
            vec![MockOp::void_reader("load"), MockOp::void_writer("save")],
        );
        let mut instance = MockInstance::default();
        instance.state.insert("health".to_string(), 10);

        let loaded = access
            .modify(&mut instance, |state| {
                state.insert("health".to_string(), StructuredValue::Int(1));
            })
            .unwrap();
        assert_eq!(int(&loaded, "health"), Some(1));
        assert_eq!(instance.state.get("health"), Some(&1));
    }

    #[test]
    fn test_clones_share_capabilities() {
        let access = access(
            HostVersion::new(1, 8, 3),
            vec![MockOp::void_reader("load"), MockOp::void_writer("save")],
        );
        let other = access.clone();
        assert!(Arc::ptr_eq(access.capabilities(), other.capabilities()));
    }
}
