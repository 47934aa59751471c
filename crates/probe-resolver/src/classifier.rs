//! Behavioral classification of candidate operations.
//!
//! Candidates are never matched by name. Each one is invoked on the sample
//! with a fresh, empty probe blob and classified by what the blob looks like
//! afterwards:
//!
//! | Scan | Blob read | Empty | Non-empty | No structured value |
//! |---|---|---|---|---|
//! | void-procedure | mutated argument | load | save | skipped |
//! | returning | returned blob | skipped | save | skipped |
//!
//! The returning scan only runs under [`ProbeProtocol::Returning`], after a
//! full void-procedure scan, and its save replaces the one the void scan found.
//!
//! A same-shaped method with unrelated side effects that happens to leave the
//! blob non-empty is indistinguishable from a real save; no further checks
//! are attempted.

use serde::{Deserialize, Serialize};
use state_probe_types::{MethodShape, MethodSignature, StructuredValue, TypeHandle, TypeRef};
use tracing::debug;

use crate::capabilities::{PartialCapabilities, Role};
use crate::error::{Ambiguity, ResolveError};
use crate::host::{CandidateEnumerator, CandidateOperation, StateBlobConverter};
use crate::protocol::ProbeProtocol;

/// Which blob a probe inspects after invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeRead {
    Argument,
    Returned,
}

/// What a single probe observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The blob is no longer a structured container (or nothing was returned).
    NoValue,
    Empty,
    NonEmpty,
}

/// Runs probes against one sample instance.
pub struct Classifier<'c, C> {
    converter: &'c C,
}

impl<'c, C: StateBlobConverter> Classifier<'c, C> {
    pub fn new(converter: &'c C) -> Self {
        Self { converter }
    }

    /// Classify the candidates of `owner` under `protocol`.
    pub fn classify<E>(
        &self,
        protocol: ProbeProtocol,
        enumerator: &E,
        owner: &TypeHandle,
        instance: &mut <E::Operation as CandidateOperation>::Instance,
    ) -> Result<PartialCapabilities<E::Operation>, ResolveError>
    where
        E: CandidateEnumerator,
        E::Operation: CandidateOperation<Blob = C::Blob>,
    {
        match protocol {
            ProbeProtocol::VoidProcedure => self.void_scan(enumerator, owner, instance),
            ProbeProtocol::Returning => {
                let partial = self.void_scan(enumerator, owner, instance)?;
                let returning_save = self.returning_scan(enumerator, owner, instance)?;
                if let (Some(old), Some(new)) = (&partial.save, &returning_save) {
                    debug!(
                        replaced = %old.signature(),
                        save = %new.signature(),
                        "returning save replaces void-procedure save"
                    );
                }
                Ok(partial.overlay_save(returning_save))
            }
        }
    }

    /// Scan `void m(blob)` candidates for both roles.
    fn void_scan<E>(
        &self,
        enumerator: &E,
        owner: &TypeHandle,
        instance: &mut <E::Operation as CandidateOperation>::Instance,
    ) -> Result<PartialCapabilities<E::Operation>, ResolveError>
    where
        E: CandidateEnumerator,
        E::Operation: CandidateOperation<Blob = C::Blob>,
    {
        let candidates = enumerator.find_methods(owner, &MethodShape::void_procedure());
        debug!(
            owner = %owner,
            count = candidates.len(),
            "scanning void-procedure candidates"
        );

        let mut partial = PartialCapabilities::default();
        for candidate in candidates {
            let role = match self.probe(&candidate, instance, ProbeRead::Argument)? {
                ProbeOutcome::NoValue => {
                    debug!(candidate = %candidate.signature(), "skipping: no structured value");
                    continue;
                }
                ProbeOutcome::Empty => Role::Load,
                ProbeOutcome::NonEmpty => Role::Save,
            };
            debug!(candidate = %candidate.signature(), role = %role, "classified candidate");
            partial
                .assign(ProbeProtocol::VoidProcedure, role, candidate)
                .map_err(ResolveError::AmbiguousCapability)?;
        }
        Ok(partial)
    }

    /// Scan `blob m(blob)` candidates for the save role.
    fn returning_scan<E>(
        &self,
        enumerator: &E,
        owner: &TypeHandle,
        instance: &mut <E::Operation as CandidateOperation>::Instance,
    ) -> Result<Option<E::Operation>, ResolveError>
    where
        E: CandidateEnumerator,
        E::Operation: CandidateOperation<Blob = C::Blob>,
    {
        let candidates = enumerator.find_methods(owner, &MethodShape::returning_blob());
        debug!(
            owner = %owner,
            count = candidates.len(),
            "scanning returning candidates"
        );

        let mut save: Option<E::Operation> = None;
        for candidate in candidates {
            match self.probe(&candidate, instance, ProbeRead::Returned)? {
                ProbeOutcome::NoValue | ProbeOutcome::Empty => {
                    debug!(candidate = %candidate.signature(), "skipping: nothing returned");
                    continue;
                }
                ProbeOutcome::NonEmpty => {}
            }
            if let Some(existing) = &save {
                return Err(ResolveError::AmbiguousCapability(Ambiguity {
                    protocol: ProbeProtocol::Returning,
                    role: Role::Save,
                    first: existing.signature().to_string(),
                    second: candidate.signature().to_string(),
                }));
            }
            debug!(candidate = %candidate.signature(), role = %Role::Save, "classified candidate");
            save = Some(candidate);
        }
        Ok(save)
    }

    /// Probe every candidate of every shape `protocol` scans, without assigning roles.
    pub fn survey<E>(
        &self,
        protocol: ProbeProtocol,
        enumerator: &E,
        owner: &TypeHandle,
        instance: &mut <E::Operation as CandidateOperation>::Instance,
    ) -> Result<Vec<SurveyEntry>, ResolveError>
    where
        E: CandidateEnumerator,
        E::Operation: CandidateOperation<Blob = C::Blob>,
    {
        let mut entries = Vec::new();
        for shape in protocol.shapes() {
            let read = if shape.return_type == TypeRef::StateBlob {
                ProbeRead::Returned
            } else {
                ProbeRead::Argument
            };
            for candidate in enumerator.find_methods(owner, &shape) {
                let outcome = self.probe(&candidate, instance, read)?;
                let role = match (read, outcome) {
                    (_, ProbeOutcome::NoValue) => None,
                    (ProbeRead::Argument, ProbeOutcome::Empty) => Some(Role::Load),
                    (ProbeRead::Returned, ProbeOutcome::Empty) => None,
                    (_, ProbeOutcome::NonEmpty) => Some(Role::Save),
                };
                entries.push(SurveyEntry {
                    shape: shape.clone(),
                    signature: candidate.signature().clone(),
                    outcome,
                    role,
                });
            }
        }
        Ok(entries)
    }

    /// Invoke one candidate on a fresh empty blob and inspect the result.
    fn probe<Op>(
        &self,
        candidate: &Op,
        instance: &mut Op::Instance,
        read: ProbeRead,
    ) -> Result<ProbeOutcome, ResolveError>
    where
        Op: CandidateOperation<Blob = C::Blob>,
    {
        let mut probe = self
            .converter
            .to_opaque(&StructuredValue::empty_compound())
            .map_err(ResolveError::ProbeConstruction)?;

        let returned = candidate
            .invoke(instance, &mut probe)
            .map_err(|source| ResolveError::InvocationFailed {
                candidate: candidate.signature().to_string(),
                source,
            })?;

        let derived = match read {
            ProbeRead::Argument => self.converter.from_opaque(&probe),
            ProbeRead::Returned => returned
                .as_ref()
                .and_then(|blob| self.converter.from_opaque(blob)),
        };

        Ok(match derived.filter(StructuredValue::is_compound) {
            None => ProbeOutcome::NoValue,
            Some(value) if self.converter.is_empty(&value) => ProbeOutcome::Empty,
            Some(_) => ProbeOutcome::NonEmpty,
        })
    }
}

/// One probed candidate, as reported by [`Classifier::survey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub shape: MethodShape,
    pub signature: MethodSignature,
    pub outcome: ProbeOutcome,
    /// The role this probe alone would suggest.
    pub role: Option<Role>,
}
