//! The simulated host: worlds, a version, and an entity type whose method
//! table changes between eras.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use state_probe_resolver::{
    CandidateEnumerator, CandidateOperation, HostEnvironment, SampleProvider,
};
use state_probe_types::{HostVersion, MethodShape, MethodSignature, TypeHandle, TypeRef, Visibility};
use tracing::debug;

use crate::entity::SimEntity;
use crate::methods::{SimBehavior, SimMethod};

/// Name of the simulated base entity type.
pub const ENTITY_TYPE: &str = "net.sim.Entity";

/// Preset method tables modelled on successive host releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEra {
    /// Save writes into its argument.
    Legacy,
    /// Save returns a new blob; the old void save is still present.
    Modern,
    /// Save listed before load, surrounded by decoys.
    Shuffled,
}

impl HostEra {
    pub const ALL: [HostEra; 3] = [HostEra::Legacy, HostEra::Modern, HostEra::Shuffled];

    pub fn default_version(self) -> HostVersion {
        match self {
            HostEra::Legacy => HostVersion::new(1, 8, 3),
            HostEra::Modern => HostVersion::new(1, 12, 1),
            HostEra::Shuffled => HostVersion::new(1, 13, 2),
        }
    }

    /// The era's method table, in enumeration order.
    pub fn methods(self) -> Vec<SimMethod> {
        use SimBehavior::*;
        match self {
            HostEra::Legacy => vec![
                SimMethod::void("a", Clobber),
                SimMethod::void("c", SaveInto),
                SimMethod::void("f", LoadState),
                SimMethod::new(
                    MethodSignature::public("W", TypeRef::Void, vec![]),
                    Noop,
                ),
            ],
            HostEra::Modern => vec![
                SimMethod::void("e", SaveInto),
                SimMethod::void("f", LoadState),
                SimMethod::returning("save", SaveReturning),
                SimMethod::returning("g", Passthrough),
            ],
            HostEra::Shuffled => vec![
                SimMethod::returning("b", SaveReturning),
                SimMethod::returning("d", ReturnsNothing),
                SimMethod::void("h", SaveInto).with_visibility(Visibility::Private),
                SimMethod::void("j", LoadState).as_static(),
                SimMethod::new(
                    MethodSignature::public(
                        "k",
                        TypeRef::Other("int".into()),
                        vec![TypeRef::StateBlob],
                    ),
                    Fail,
                ),
                SimMethod::void("a", Clobber),
                SimMethod::void("l", LoadState),
            ],
        }
    }
}

impl fmt::Display for HostEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEra::Legacy => f.write_str("legacy"),
            HostEra::Modern => f.write_str("modern"),
            HostEra::Shuffled => f.write_str("shuffled"),
        }
    }
}

impl FromStr for HostEra {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        HostEra::ALL
            .into_iter()
            .find(|era| era.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown host era '{s}' (expected legacy, modern or shuffled)"))
    }
}

#[derive(Debug, Default)]
struct World {
    next_id: u64,
    live: BTreeSet<u64>,
    capacity: Option<usize>,
}

/// An in-memory host exposing one entity type.
#[derive(Debug)]
pub struct SimHost {
    era: HostEra,
    version: HostVersion,
    worlds: usize,
    entity_type: TypeHandle,
    methods: Vec<SimMethod>,
    world: Mutex<World>,
}

impl SimHost {
    /// A host of `era` with one loaded world.
    pub fn new(era: HostEra) -> Self {
        Self {
            era,
            version: era.default_version(),
            worlds: 1,
            entity_type: TypeHandle::new(ENTITY_TYPE),
            methods: era.methods(),
            world: Mutex::new(World::default()),
        }
    }

    pub fn with_worlds(mut self, worlds: usize) -> Self {
        self.worlds = worlds;
        self
    }

    pub fn with_version(mut self, version: HostVersion) -> Self {
        self.version = version;
        self
    }

    /// Append a method to the entity's table.
    pub fn with_method(mut self, method: SimMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Refuse to spawn once `capacity` entities are live.
    pub fn with_capacity(self, capacity: usize) -> Self {
        self.world.lock().capacity = Some(capacity);
        self
    }

    pub fn era(&self) -> HostEra {
        self.era
    }

    pub fn entity_type(&self) -> &TypeHandle {
        &self.entity_type
    }

    /// Number of live entities across all worlds.
    pub fn entity_count(&self) -> usize {
        self.world.lock().live.len()
    }

    pub fn spawn_entity(&self) -> Result<SimEntity> {
        if self.worlds == 0 {
            bail!("no world loaded");
        }
        let mut world = self.world.lock();
        if world.capacity.is_some_and(|cap| world.live.len() >= cap) {
            bail!("entity limit reached ({} live)", world.live.len());
        }
        world.next_id += 1;
        let id = world.next_id;
        world.live.insert(id);
        Ok(SimEntity::new(id))
    }

    /// Remove an entity; unknown ids are ignored.
    pub fn despawn(&self, id: u64) {
        self.world.lock().live.remove(&id);
    }
}

impl HostEnvironment for SimHost {
    fn active_contexts(&self) -> usize {
        self.worlds
    }

    fn version(&self) -> HostVersion {
        self.version
    }
}

impl CandidateEnumerator for SimHost {
    type Operation = SimMethod;

    fn find_methods(&self, owner: &TypeHandle, shape: &MethodShape) -> Vec<SimMethod> {
        if *owner != self.entity_type {
            return Vec::new();
        }
        self.methods
            .iter()
            .filter(|method| shape.matches(method.signature()))
            .cloned()
            .collect()
    }
}

/// Spawns and removes the disposable sample entity on a [`SimHost`].
pub struct SimSampleProvider<'h> {
    host: &'h SimHost,
    current: Option<u64>,
    spawned: usize,
    removed: usize,
}

impl<'h> SimSampleProvider<'h> {
    pub fn new(host: &'h SimHost) -> Self {
        Self {
            host,
            current: None,
            spawned: 0,
            removed: 0,
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl SampleProvider for SimSampleProvider<'_> {
    type Instance = SimEntity;

    fn spawn(&mut self) -> Result<SimEntity> {
        let entity = self.host.spawn_entity()?;
        self.current = Some(entity.id());
        self.spawned += 1;
        Ok(entity)
    }

    fn remove(&mut self) {
        if let Some(id) = self.current.take() {
            self.host.despawn(id);
            debug!(id, "despawned sample entity");
        }
        self.removed += 1;
    }

    fn base_type(&self) -> TypeHandle {
        self.host.entity_type.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_parse_and_display() {
        for era in HostEra::ALL {
            assert_eq!(era.to_string().parse::<HostEra>().unwrap(), era);
        }
        assert_eq!("MODERN".parse::<HostEra>().unwrap(), HostEra::Modern);
        assert!("beta".parse::<HostEra>().is_err());
    }

    #[test]
    fn test_enumerator_filters_by_shape_and_owner() {
        let host = SimHost::new(HostEra::Shuffled);
        let void = host.find_methods(host.entity_type(), &MethodShape::void_procedure());
        let names: Vec<_> = void.iter().map(|m| m.signature().name.as_str()).collect();
        assert_eq!(names, vec!["a", "l"]);

        let returning = host.find_methods(host.entity_type(), &MethodShape::returning_blob());
        assert_eq!(returning.len(), 2);

        assert!(host
            .find_methods(&TypeHandle::new("Other"), &MethodShape::void_procedure())
            .is_empty());
    }

    #[test]
    fn test_provider_tracks_entities() {
        let host = SimHost::new(HostEra::Legacy);
        let mut provider = SimSampleProvider::new(&host);
        let entity = provider.spawn().unwrap();
        assert_eq!(host.entity_count(), 1);
        assert_eq!(entity.id(), 1);
        provider.remove();
        assert_eq!(host.entity_count(), 0);
        assert_eq!((provider.spawned(), provider.removed()), (1, 1));
    }

    #[test]
    fn test_spawn_fails_without_worlds() {
        let host = SimHost::new(HostEra::Legacy).with_worlds(0);
        assert!(host.spawn_entity().is_err());
    }

    #[test]
    fn test_capacity_limit() {
        let host = SimHost::new(HostEra::Legacy).with_capacity(1);
        let _first = host.spawn_entity().unwrap();
        let err = host.spawn_entity().unwrap_err();
        assert!(err.to_string().contains("entity limit"));
    }
}
