//! Parsers that resolve a parameter to a stored entity
//!
//! Resolution is the same for every kind: blank is a bad value, all
//! digits is an id lookup, anything else is a string lookup where the kind
//! supports one. Permission requirements are checked against the acting
//! user once the entity is found.

use super::ScalarParser;
use crate::context::ParseEnv;
use crate::entity::{Entity, EntityKind, Relation};
use crate::error::{ErrorKind, Limit, ParseResult};

fn all_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

fn find_by_id(env: &ParseEnv<'_>, kind: EntityKind, raw: &str) -> ParseResult<Entity> {
    let id: u64 = raw
        .parse()
        .map_err(|_| ErrorKind::bad_value(raw, kind.as_str()))?;
    env.lookup
        .find_by_id(kind, id)
        .ok_or_else(|| ErrorKind::not_found_by_id(id, kind).into())
}

fn check_permissions(env: &ParseEnv<'_>, entity: &Entity, relations: &[Relation]) -> ParseResult<()> {
    if relations.is_empty() {
        return Ok(());
    }
    let actor = env.actor.ok_or(ErrorKind::MustAuthenticate)?;
    if !actor.verified {
        return Err(ErrorKind::UserNotVerified {
            login: actor.login.clone(),
        }
        .into());
    }
    match relations
        .iter()
        .find(|relation| !env.lookup.permission_check(entity, actor, **relation))
    {
        Some(relation) => Err(ErrorKind::permission_denied(*relation, entity.clone()).into()),
        None => Ok(()),
    }
}

/// A reference to one entity kind, by id or by name
#[derive(Debug, Clone)]
pub struct EntityParser {
    kind: EntityKind,
    relations: Vec<Relation>,
}

impl EntityParser {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            relations: Vec::new(),
        }
    }

    pub fn must_be_owner(self) -> Self {
        self.requiring(Relation::Owner)
    }

    pub fn must_have_view_permission(self) -> Self {
        self.requiring(Relation::View)
    }

    pub fn must_have_edit_permission(self) -> Self {
        self.requiring(Relation::Edit)
    }

    pub fn must_be_admin(self) -> Self {
        self.requiring(Relation::Admin)
    }

    pub fn must_be_member(self) -> Self {
        self.requiring(Relation::Member)
    }

    fn requiring(mut self, relation: Relation) -> Self {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    fn resolve(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<Entity> {
        if raw.trim().is_empty() {
            return Err(ErrorKind::bad_value(raw, self.type_name()).into());
        }
        if all_digits(raw) {
            return find_by_id(env, self.kind, raw);
        }
        if !self.kind.supports_string_lookup() {
            return Err(ErrorKind::bad_value(raw, self.type_name()).into());
        }
        if self.kind == EntityKind::Name && !raw.starts_with(|c: char| c.is_uppercase()) {
            return Err(ErrorKind::NameDoesntParse {
                val: raw.to_string(),
            }
            .into());
        }

        let mut matches = env.lookup.find_by_string(self.kind, raw);
        match matches.len() {
            0 => Err(ErrorKind::not_found_by_string(raw, self.kind).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(ErrorKind::AmbiguousName {
                val: raw.to_string(),
                candidates: matches,
            }
            .into()),
        }
    }
}

impl ScalarParser for EntityParser {
    type Output = Entity;

    fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        self.relations
            .iter()
            .map(|relation| (relation.as_arg(), String::new()))
            .collect()
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<Entity> {
        let entity = self.resolve(env, raw)?;
        check_permissions(env, &entity, &self.relations)?;
        Ok(entity)
    }
}

/// A reference to any of several kinds, written `type id`
/// (`observation 123`, `species list 7`).
#[derive(Debug, Clone)]
pub struct ObjectParser {
    limit: Vec<EntityKind>,
    relations: Vec<Relation>,
}

impl ObjectParser {
    pub fn new(limit: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            limit: limit.into_iter().collect(),
            relations: Vec::new(),
        }
    }

    pub fn must_have_edit_permission(mut self) -> Self {
        if !self.relations.contains(&Relation::Edit) {
            self.relations.push(Relation::Edit);
        }
        self
    }
}

impl ScalarParser for ObjectParser {
    type Output = Entity;

    fn type_name(&self) -> &'static str {
        "object"
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        let limit = self
            .limit
            .iter()
            .map(EntityKind::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        std::iter::once(("limit", limit))
            .chain(self.relations.iter().map(|r| (r.as_arg(), String::new())))
            .collect()
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<Entity> {
        if self.limit.is_empty() {
            return Err(ErrorKind::missing_limit(self.type_name()).into());
        }
        let caps = static_regex!(r"^([A-Za-z][A-Za-z _]*?)\s+(\d+)$")
            .captures(raw.trim())
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()))?;

        let kind = EntityKind::from_tag(&caps[1])
            .filter(|kind| self.limit.contains(kind))
            .ok_or_else(|| ErrorKind::bad_limited(&caps[1], Limit::values(&self.limit)))?;
        let entity = find_by_id(env, kind, &caps[2])?;
        check_permissions(env, &entity, &self.relations)?;
        Ok(entity)
    }
}

/// Free-text place name. Known locations are normalized to their stored
/// name; anything else is kept as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceNameParser;

impl ScalarParser for PlaceNameParser {
    type Output = String;

    fn type_name(&self) -> &'static str {
        "place_name"
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<String> {
        if raw.trim().is_empty() {
            return Err(ErrorKind::bad_value(raw, self.type_name()).into());
        }
        if all_digits(raw) {
            return find_by_id(env, EntityKind::Location, raw).map(|location| location.label);
        }
        let mut matches = env.lookup.find_by_string(EntityKind::Location, raw);
        Ok(match matches.len() {
            1 => matches.remove(0).label,
            _ => raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Actor;
    use crate::testing::{pull_list, pull_ranges, range, with_actor, with_env, DICK, MARY, ROLF};
    use assert_matches::assert_matches;

    fn rolf() -> Actor {
        Actor::new(ROLF, "rolf")
    }

    fn mary() -> Actor {
        Actor::new(MARY, "mary")
    }

    #[test]
    fn test_lookup_by_id() {
        with_env(|env| {
            let image = EntityParser::new(EntityKind::Image);
            assert_eq!(image.parse_str(env, "20").unwrap().id, 20);
            let err = image.parse_str(env, "99").unwrap_err();
            assert_matches!(
                err.kind,
                ErrorKind::ObjectNotFoundById { id: 99, kind: EntityKind::Image }
            );
            assert_eq!(err.args()["type"], "image");
        });
    }

    #[test]
    fn test_blank_and_non_numeric_ids() {
        with_env(|env| {
            let image = EntityParser::new(EntityKind::Image);
            assert_eq!(image.parse_str(env, "").unwrap_err().tag(), "api_bad_image_parameter_value");
            assert_eq!(
                image.parse_str(env, "sunset").unwrap_err().tag(),
                "api_bad_image_parameter_value"
            );
        });
    }

    #[test]
    fn test_lookup_by_string() {
        with_env(|env| {
            let user = EntityParser::new(EntityKind::User);
            assert_eq!(user.parse_str(env, "Mary Newbie").unwrap().id, MARY);
            assert_eq!(user.parse_str(env, "ROLF").unwrap().id, ROLF);
            let err = user.parse_str(env, "nobody").unwrap_err();
            assert_matches!(err.kind, ErrorKind::ObjectNotFoundByString { .. });
            assert_eq!(err.args()["str"], "nobody");

            let herbarium = EntityParser::new(EntityKind::Herbarium);
            assert_eq!(herbarium.parse_str(env, "NY").unwrap().id, 90);
        });
    }

    #[test]
    fn test_names() {
        with_env(|env| {
            let name = EntityParser::new(EntityKind::Name);
            assert_eq!(
                name.parse_str(env, "Macrolepiota rhacodes (Vittad.) Singer")
                    .unwrap()
                    .id,
                10
            );
            assert_matches!(
                name.parse_str(env, "macrolepiota rhacodes").unwrap_err().kind,
                ErrorKind::NameDoesntParse { .. }
            );
            let err = name.parse_str(env, "Amanita baccata").unwrap_err();
            assert_matches!(
                err.kind,
                ErrorKind::AmbiguousName { ref candidates, .. }
                    if candidates.iter().map(|e| e.id).collect::<Vec<_>>() == vec![11, 12]
            );
        });
    }

    #[test]
    fn test_permission_requires_verified_actor() {
        let parser = EntityParser::new(EntityKind::Image).must_have_edit_permission();
        assert_matches!(
            with_env(|env| parser.parse_str(env, "20")).unwrap_err().kind,
            ErrorKind::MustAuthenticate
        );
        let unverified = rolf().unverified();
        assert_matches!(
            with_actor(&unverified, |env| parser.parse_str(env, "20")).unwrap_err().kind,
            ErrorKind::UserNotVerified { ref login } if login == "rolf"
        );
    }

    #[test]
    fn test_permission_checks() {
        let edit = EntityParser::new(EntityKind::Image).must_have_edit_permission();
        assert!(with_actor(&rolf(), |env| edit.parse_str(env, "20")).is_ok());
        let err = with_actor(&mary(), |env| edit.parse_str(env, "20")).unwrap_err();
        assert_eq!(err.tag(), "api_must_have_edit_permission");
        assert_eq!(err.args()["obj"], "image #20");

        let project = EntityParser::new(EntityKind::Project).must_be_member();
        assert!(with_actor(&mary(), |env| project.parse_str(env, "Bolete Project")).is_ok());
        let dick = Actor::new(DICK, "dick");
        assert_matches!(
            with_actor(&dick, |env| project.parse_str(env, "60")).unwrap_err().kind,
            ErrorKind::MustBeMember { .. }
        );

        let admin = EntityParser::new(EntityKind::Project).must_be_admin();
        assert_matches!(
            with_actor(&mary(), |env| admin.parse_str(env, "60")).unwrap_err().kind,
            ErrorKind::MustBeAdmin { .. }
        );

        let own = EntityParser::new(EntityKind::Observation).must_be_owner();
        assert_matches!(
            with_actor(&rolf(), |env| own.parse_str(env, "31")).unwrap_err().kind,
            ErrorKind::MustBeOwner { .. }
        );
    }

    #[test]
    fn test_entity_lists_and_ranges() {
        let image = EntityParser::new(EntityKind::Image);
        let ids: Vec<u64> = pull_list(&image, "21, 20")
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![21, 20]);

        let ranges = pull_ranges(&image, "21-20").unwrap();
        assert_eq!(
            ranges,
            vec![range(
                Entity::new(EntityKind::Image, 20, "image 20"),
                Entity::new(EntityKind::Image, 21, "image 21")
            )]
        );
    }

    #[test]
    fn test_declared_relations() {
        let parser = EntityParser::new(EntityKind::Project)
            .must_be_admin()
            .must_be_admin();
        assert_eq!(parser.declaration_args(), vec![("must_be_admin", String::new())]);
        assert_eq!(parser.type_name(), "project");
    }

    #[test]
    fn test_objects() {
        let parser = ObjectParser::new([EntityKind::Observation, EntityKind::SpeciesList]);
        with_env(|env| {
            assert_eq!(parser.parse_str(env, "observation 30").unwrap().id, 30);
            assert_eq!(parser.parse_str(env, "Species List 70").unwrap().id, 70);
            assert_eq!(parser.parse_str(env, "species_list 70").unwrap().id, 70);

            let err = parser.parse_str(env, "image 20").unwrap_err();
            assert_matches!(err.kind, ErrorKind::BadLimitedParameterValue { .. });
            assert_eq!(err.args()["limit"], "observation, species_list");
            assert_matches!(
                parser.parse_str(env, "bogus 1").unwrap_err().kind,
                ErrorKind::BadLimitedParameterValue { .. }
            );
            assert_eq!(
                parser.parse_str(env, "observation").unwrap_err().tag(),
                "api_bad_object_parameter_value"
            );
            assert_matches!(
                parser.parse_str(env, "observation 99").unwrap_err().kind,
                ErrorKind::ObjectNotFoundById { id: 99, .. }
            );
            assert_matches!(
                ObjectParser::new([]).parse_str(env, "observation 30").unwrap_err().kind,
                ErrorKind::MissingLimit { .. }
            );
        });
    }

    #[test]
    fn test_object_edit_permission() {
        let parser = ObjectParser::new([EntityKind::Observation]).must_have_edit_permission();
        assert!(with_actor(&mary(), |env| parser.parse_str(env, "observation 31")).is_ok());
        assert_matches!(
            with_actor(&mary(), |env| parser.parse_str(env, "observation 30"))
                .unwrap_err()
                .kind,
            ErrorKind::MustHaveEditPermission { .. }
        );
    }

    #[test]
    fn test_place_names() {
        with_env(|env| {
            assert_eq!(
                PlaceNameParser.parse_str(env, "50").unwrap(),
                "Burbank, California, USA"
            );
            assert_eq!(
                PlaceNameParser.parse_str(env, "albion, california, usa").unwrap(),
                "Albion, California, USA"
            );
            assert_eq!(
                PlaceNameParser.parse_str(env, "Somewhere, Oregon, USA").unwrap(),
                "Somewhere, Oregon, USA"
            );
            assert_matches!(
                PlaceNameParser.parse_str(env, "59").unwrap_err().kind,
                ErrorKind::ObjectNotFoundById { .. }
            );
            assert!(PlaceNameParser.parse_str(env, " ").is_err());
        });
    }
}
