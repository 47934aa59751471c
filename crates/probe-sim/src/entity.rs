//! The simulated entity and its persistent fields.

use std::collections::BTreeMap;

use crate::blob::SimBlob;

pub const KEY_ID: &str = "Id";
pub const KEY_NAME: &str = "CustomName";
pub const KEY_HEALTH: &str = "Health";
pub const KEY_AGE: &str = "Age";
pub const KEY_INVULNERABLE: &str = "Invulnerable";
pub const KEY_TAGS: &str = "Tags";

/// A live entity in a simulated world.
///
/// Everything except `id` survives a save/load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEntity {
    id: u64,
    pub name: String,
    pub health: f64,
    pub age: i64,
    pub invulnerable: bool,
    pub tags: Vec<String>,
}

impl SimEntity {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            health: 20.0,
            age: 0,
            invulnerable: false,
            tags: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Write every persistent field into `out`, keeping unrelated entries.
    pub fn write_state(&self, out: &mut BTreeMap<String, SimBlob>) {
        out.insert(KEY_ID.to_string(), SimBlob::Long(self.id as i64));
        out.insert(KEY_NAME.to_string(), SimBlob::String(self.name.clone()));
        out.insert(KEY_HEALTH.to_string(), SimBlob::Double(self.health));
        out.insert(KEY_AGE.to_string(), SimBlob::Long(self.age));
        out.insert(KEY_INVULNERABLE.to_string(), SimBlob::Byte(i8::from(self.invulnerable)));
        out.insert(
            KEY_TAGS.to_string(),
            SimBlob::List(self.tags.iter().cloned().map(SimBlob::String).collect()),
        );
    }

    /// Read whichever persistent fields `state` carries. Missing or mistyped
    /// entries leave the field as it is.
    pub fn read_state(&mut self, state: &BTreeMap<String, SimBlob>) {
        if let Some(SimBlob::String(name)) = state.get(KEY_NAME) {
            self.name = name.clone();
        }
        match state.get(KEY_HEALTH) {
            Some(SimBlob::Double(health)) => self.health = *health,
            Some(SimBlob::Long(health)) => self.health = *health as f64,
            Some(SimBlob::Int(health)) => self.health = f64::from(*health),
            Some(SimBlob::Byte(health)) => self.health = f64::from(*health),
            _ => {}
        }
        match state.get(KEY_AGE) {
            Some(SimBlob::Long(age)) => self.age = *age,
            Some(SimBlob::Int(age)) => self.age = i64::from(*age),
            _ => {}
        }
        if let Some(SimBlob::Byte(flag)) = state.get(KEY_INVULNERABLE) {
            self.invulnerable = *flag != 0;
        }
        if let Some(SimBlob::List(tags)) = state.get(KEY_TAGS) {
            self.tags = tags
                .iter()
                .filter_map(|tag| match tag {
                    SimBlob::String(tag) => Some(tag.clone()),
                    _ => None,
                })
                .collect();
        }
    }
}
