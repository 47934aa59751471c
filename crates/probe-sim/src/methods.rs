//! Obfuscated entity methods and what each one does when invoked.

use anyhow::{bail, Result};
use state_probe_resolver::CandidateOperation;
use state_probe_types::{MethodSignature, TypeRef, Visibility};

use crate::blob::SimBlob;
use crate::entity::SimEntity;

/// The effect a simulated method has on the entity and the blob it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimBehavior {
    /// Read the blob into the entity, leaving the blob untouched.
    LoadState,
    /// Write the entity's state into the blob passed in.
    SaveInto,
    /// Return a new blob holding the entity's state.
    SaveReturning,
    /// Return the argument unchanged.
    Passthrough,
    /// Overwrite the argument with a terminator tag.
    Clobber,
    /// Return nothing.
    ReturnsNothing,
    /// Raise a host error.
    Fail,
    /// Do nothing at all.
    Noop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimMethod {
    signature: MethodSignature,
    behavior: SimBehavior,
}

impl SimMethod {
    pub fn new(signature: MethodSignature, behavior: SimBehavior) -> Self {
        Self {
            signature,
            behavior,
        }
    }

    /// `public void name(StateBlob)`
    pub fn void(name: &str, behavior: SimBehavior) -> Self {
        Self::new(
            MethodSignature::public(name, TypeRef::Void, vec![TypeRef::StateBlob]),
            behavior,
        )
    }

    /// `public StateBlob name(StateBlob)`
    pub fn returning(name: &str, behavior: SimBehavior) -> Self {
        Self::new(
            MethodSignature::public(name, TypeRef::StateBlob, vec![TypeRef::StateBlob]),
            behavior,
        )
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.signature = self.signature.with_visibility(visibility);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.signature = self.signature.as_static();
        self
    }

    pub fn behavior(&self) -> SimBehavior {
        self.behavior
    }
}

impl CandidateOperation for SimMethod {
    type Instance = SimEntity;
    type Blob = SimBlob;

    fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    fn invoke(&self, entity: &mut SimEntity, blob: &mut SimBlob) -> Result<Option<SimBlob>> {
        match self.behavior {
            SimBehavior::LoadState => {
                if let Some(state) = blob.as_compound() {
                    entity.read_state(state);
                }
                Ok(None)
            }
            SimBehavior::SaveInto => {
                let Some(out) = blob.as_compound_mut() else {
                    bail!("{}: expected a compound tag, got tag {}", self.signature.name, blob.tag_id());
                };
                entity.write_state(out);
                Ok(None)
            }
            SimBehavior::SaveReturning => {
                let mut out = SimBlob::empty_compound();
                if let Some(map) = out.as_compound_mut() {
                    entity.write_state(map);
                }
                Ok(Some(out))
            }
            SimBehavior::Passthrough => Ok(Some(blob.clone())),
            SimBehavior::Clobber => {
                *blob = SimBlob::End;
                Ok(None)
            }
            SimBehavior::ReturnsNothing | SimBehavior::Noop => Ok(None),
            SimBehavior::Fail => bail!("{}: entity is not in a valid state", self.signature.name),
        }
    }
}
