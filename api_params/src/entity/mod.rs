//! Entities that parameters can refer to, and the lookup seam the
//! reference parsers resolve them through.

pub mod store;

use crate::range::RangeOrdering;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub use store::{InMemoryStore, StoredEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Comment,
    ExternalSite,
    Herbarium,
    Image,
    License,
    Location,
    Name,
    Observation,
    Project,
    Sequence,
    SpeciesList,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Comment,
        EntityKind::ExternalSite,
        EntityKind::Herbarium,
        EntityKind::Image,
        EntityKind::License,
        EntityKind::Location,
        EntityKind::Name,
        EntityKind::Observation,
        EntityKind::Project,
        EntityKind::Sequence,
        EntityKind::SpeciesList,
        EntityKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Comment => "comment",
            EntityKind::ExternalSite => "external_site",
            EntityKind::Herbarium => "herbarium",
            EntityKind::Image => "image",
            EntityKind::License => "license",
            EntityKind::Location => "location",
            EntityKind::Name => "name",
            EntityKind::Observation => "observation",
            EntityKind::Project => "project",
            EntityKind::Sequence => "sequence",
            EntityKind::SpeciesList => "species_list",
            EntityKind::User => "user",
        }
    }

    /// Case-insensitive; spaces and underscores are interchangeable, so
    /// "Species List", "species_list" and "species list" all match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    /// Kinds with a human-readable identifier (title, login, text name)
    /// that lookups by string can match against.
    pub fn supports_string_lookup(&self) -> bool {
        matches!(
            self,
            EntityKind::ExternalSite
                | EntityKind::Herbarium
                | EntityKind::Location
                | EntityKind::Name
                | EntityKind::Project
                | EntityKind::SpeciesList
                | EntityKind::User
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: u64,
    pub label: String,
}

impl Entity {
    pub fn new(kind: EntityKind, id: u64, label: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            label: label.into(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.id)
    }
}

/// Entities of one kind order by id; mixed kinds have no order.
impl RangeOrdering for Entity {
    fn range_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.kind == other.kind).then(|| self.id.cmp(&other.id))
    }
}

/// The user on whose behalf a request is parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub login: String,
    #[serde(default = "default_verified")]
    pub verified: bool,
}

fn default_verified() -> bool {
    true
}

impl Actor {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            verified: true,
        }
    }

    pub fn unverified(mut self) -> Self {
        self.verified = false;
        self
    }
}

/// Relation a reference parser can demand between actor and entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Owner,
    View,
    Edit,
    Admin,
    Member,
}

impl Relation {
    /// Declaration argument naming this requirement
    pub fn as_arg(&self) -> &'static str {
        match self {
            Relation::Owner => "must_be_owner",
            Relation::View => "must_have_view_permission",
            Relation::Edit => "must_have_edit_permission",
            Relation::Admin => "must_be_admin",
            Relation::Member => "must_be_member",
        }
    }
}

/// Lookup seam between the parsers and whatever stores entities.
pub trait EntityLookup {
    fn find_by_id(&self, kind: EntityKind, id: u64) -> Option<Entity>;

    /// All entities of `kind` whose identifier matches `value`, ignoring case.
    fn find_by_string(&self, kind: EntityKind, value: &str) -> Vec<Entity>;

    fn permission_check(&self, entity: &Entity, actor: &Actor, relation: Relation) -> bool;
}
