use super::{Actor, Entity, EntityKind, EntityLookup, Relation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One record of the in-memory store, with the permission data the
/// lookup needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntity {
    pub kind: EntityKind,
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub owner: Option<u64>,
    #[serde(default)]
    pub editors: BTreeSet<u64>,
    #[serde(default)]
    pub viewers: BTreeSet<u64>,
    #[serde(default)]
    pub admins: BTreeSet<u64>,
    #[serde(default)]
    pub members: BTreeSet<u64>,
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl StoredEntity {
    pub fn new(kind: EntityKind, id: u64, label: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            label: label.into(),
            aliases: Vec::new(),
            owner: None,
            editors: BTreeSet::new(),
            viewers: BTreeSet::new(),
            admins: BTreeSet::new(),
            members: BTreeSet::new(),
            public: true,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn owned_by(mut self, user_id: u64) -> Self {
        self.owner = Some(user_id);
        self
    }

    pub fn editable_by(mut self, user_id: u64) -> Self {
        self.editors.insert(user_id);
        self
    }

    pub fn viewable_by(mut self, user_id: u64) -> Self {
        self.viewers.insert(user_id);
        self
    }

    pub fn administered_by(mut self, user_id: u64) -> Self {
        self.admins.insert(user_id);
        self
    }

    pub fn with_member(mut self, user_id: u64) -> Self {
        self.members.insert(user_id);
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn entity(&self) -> Entity {
        Entity::new(self.kind, self.id, self.label.clone())
    }

    fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        self.label.trim().eq_ignore_ascii_case(value)
            || self
                .aliases
                .iter()
                .any(|alias| alias.trim().eq_ignore_ascii_case(value))
    }

    /// Users own their own account record.
    fn is_owner(&self, user_id: u64) -> bool {
        self.owner == Some(user_id) || (self.kind == EntityKind::User && self.id == user_id)
    }

    fn allows(&self, user_id: u64, relation: Relation) -> bool {
        match relation {
            Relation::Owner => self.is_owner(user_id),
            Relation::Edit => self.is_owner(user_id) || self.editors.contains(&user_id),
            Relation::View => {
                self.public
                    || self.is_owner(user_id)
                    || self.editors.contains(&user_id)
                    || self.viewers.contains(&user_id)
            }
            Relation::Admin => self.admins.contains(&user_id),
            Relation::Member => self.members.contains(&user_id) || self.admins.contains(&user_id),
        }
    }
}

/// Entity store held in memory, used by tests and the command-line front end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    entities: Vec<StoredEntity>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record with the same kind and id
    pub fn insert(&mut self, record: StoredEntity) -> &mut Self {
        match self.position(record.kind, record.id) {
            Some(index) => self.entities[index] = record,
            None => self.entities.push(record),
        }
        self
    }

    pub fn with(mut self, record: StoredEntity) -> Self {
        self.insert(record);
        self
    }

    pub fn get(&self, kind: EntityKind, id: u64) -> Option<&StoredEntity> {
        self.position(kind, id).map(|index| &self.entities[index])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    fn position(&self, kind: EntityKind, id: u64) -> Option<usize> {
        self.entities
            .iter()
            .position(|record| record.kind == kind && record.id == id)
    }
}

impl EntityLookup for InMemoryStore {
    fn find_by_id(&self, kind: EntityKind, id: u64) -> Option<Entity> {
        self.get(kind, id).map(StoredEntity::entity)
    }

    fn find_by_string(&self, kind: EntityKind, value: &str) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .entities
            .iter()
            .filter(|record| record.kind == kind && record.matches(value))
            .map(StoredEntity::entity)
            .collect();
        found.sort_by_key(|entity| entity.id);
        found
    }

    fn permission_check(&self, entity: &Entity, actor: &Actor, relation: Relation) -> bool {
        self.get(entity.kind, entity.id)
            .is_some_and(|record| record.allows(actor.id, relation))
    }
}
