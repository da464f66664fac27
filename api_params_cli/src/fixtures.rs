//! Entity fixtures for the command-line front end

use api_params::entity::{Actor, EntityKind, EntityLookup, InMemoryStore, StoredEntity};
use std::path::Path;

/// A handful of records so the sample actions have something to resolve
pub fn demo_store() -> InMemoryStore {
    use EntityKind::*;

    InMemoryStore::new()
        .with(StoredEntity::new(User, 1, "rolf").alias("Rolf Singer"))
        .with(StoredEntity::new(User, 2, "mary").alias("Mary Newbie"))
        .with(StoredEntity::new(Name, 10, "Boletus edulis").alias("Boletus edulis Bull."))
        .with(StoredEntity::new(Name, 11, "Amanita muscaria"))
        .with(StoredEntity::new(Location, 20, "Burbank, California, USA").owned_by(1))
        .with(StoredEntity::new(Observation, 100, "Boletus edulis").owned_by(1))
        .with(StoredEntity::new(Observation, 101, "Amanita muscaria").owned_by(2))
        .with(StoredEntity::new(Image, 200, "cap").owned_by(1))
        .with(StoredEntity::new(License, 1, "Creative Commons Wikipedia Compatible v3.0"))
        .with(
            StoredEntity::new(Project, 30, "Bolete Project")
                .administered_by(1)
                .with_member(2),
        )
}

/// Load a store from a JSON fixture file
pub fn load_store(path: &Path) -> Result<InMemoryStore, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read fixtures '{}': {}", path.display(), e))?;
    Ok(InMemoryStore::from_json(&source)?)
}

/// Resolve `--user` by id or login to the acting user
pub fn resolve_actor(store: &InMemoryStore, user: &str) -> Option<Actor> {
    let entity = match user.parse::<u64>() {
        Ok(id) => store.find_by_id(EntityKind::User, id)?,
        Err(_) => {
            let mut found = store.find_by_string(EntityKind::User, user);
            if found.len() != 1 {
                return None;
            }
            found.remove(0)
        }
    };
    Some(Actor::new(entity.id, entity.label))
}
