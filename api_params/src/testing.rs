//! Fixtures shared by unit tests

use crate::config::constants::{locale, request};
use crate::config::ParserPreferences;
use crate::context::{ParseContext, ParseEnv, RequestParams};
use crate::entity::{Actor, EntityKind, InMemoryStore, StoredEntity};
use crate::error::ParseResult;
use crate::logging::{self, LogLevel, LoggingService, MemoryLogger};
use crate::parsers::{ParseArgs, ScalarParser};
use crate::range::{OrderedRange, RangeOrdering, RangeValue};
use std::sync::{Arc, OnceLock};

pub const ROLF: u64 = 1;
pub const MARY: u64 = 2;
pub const DICK: u64 = 3;

/// Process-wide memory logger; installed as the global service on first use.
/// Tests share it, so filter events by something unique to the test.
pub fn memory_logger() -> Arc<MemoryLogger> {
    static MEMORY: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
    MEMORY
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Debug);
            let _ = logging::init_global_logging_with_service(Arc::new(service));
            memory
        })
        .clone()
}

pub fn prefs() -> ParserPreferences {
    ParserPreferences {
        default_locale: locale::DEFAULT_LOCALE.to_string(),
        supported_locales: locale::SUPPORTED_LOCALES.iter().map(|s| s.to_string()).collect(),
        localized_true: vec!["oui".to_string()],
        localized_false: vec!["non".to_string()],
        help_key: request::HELP_KEY.to_string(),
        upload_keys: request::UPLOAD_KEYS.iter().map(|s| s.to_string()).collect(),
        ignored_keys: Vec::new(),
    }
}

pub fn params(pairs: &[(&str, &str)]) -> RequestParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn fixture_store() -> InMemoryStore {
    use EntityKind::*;

    InMemoryStore::new()
        .with(StoredEntity::new(User, ROLF, "rolf").alias("Rolf Singer"))
        .with(StoredEntity::new(User, MARY, "mary").alias("Mary Newbie"))
        .with(StoredEntity::new(User, DICK, "dick").alias("Tricky Dick"))
        .with(
            StoredEntity::new(Name, 10, "Macrolepiota rhacodes")
                .alias("Macrolepiota rhacodes (Vittad.) Singer"),
        )
        .with(
            StoredEntity::new(Name, 11, "Amanita baccata sensu Arora").alias("Amanita baccata"),
        )
        .with(
            StoredEntity::new(Name, 12, "Amanita baccata (Fr.) Gonn. & Rabenh.")
                .alias("Amanita baccata"),
        )
        .with(StoredEntity::new(Name, 13, "Agaricus campestris"))
        .with(StoredEntity::new(Image, 20, "image 20").owned_by(ROLF))
        .with(StoredEntity::new(Image, 21, "image 21").owned_by(MARY))
        .with(StoredEntity::new(Observation, 30, "observation 30").owned_by(ROLF))
        .with(StoredEntity::new(Observation, 31, "observation 31").owned_by(MARY))
        .with(StoredEntity::new(License, 40, "Creative Commons Non-commercial v3.0"))
        .with(StoredEntity::new(Location, 50, "Burbank, California, USA").owned_by(ROLF))
        .with(StoredEntity::new(Location, 51, "Albion, California, USA"))
        .with(
            StoredEntity::new(Project, 60, "Bolete Project")
                .administered_by(ROLF)
                .with_member(MARY),
        )
        .with(StoredEntity::new(SpeciesList, 70, "Mushroom Walk").owned_by(MARY))
        .with(StoredEntity::new(ExternalSite, 80, "MycoPortal"))
        .with(StoredEntity::new(Herbarium, 90, "NY Botanical Garden").alias("NY"))
}

pub fn with_env<R>(f: impl FnOnce(&ParseEnv<'_>) -> R) -> R {
    let (store, prefs) = (fixture_store(), prefs());
    f(&ParseEnv::new(&store, &prefs))
}

pub fn with_actor<R>(actor: &Actor, f: impl FnOnce(&ParseEnv<'_>) -> R) -> R {
    let (store, prefs) = (fixture_store(), prefs());
    f(&ParseEnv::new(&store, &prefs).with_actor(actor))
}

/// Run `raw` through `parse_list` under key "x"
pub fn pull_list<P: ScalarParser>(parser: &P, raw: &str) -> ParseResult<Vec<P::Output>> {
    let (store, prefs) = (fixture_store(), prefs());
    let request = params(&[("x", raw)]);
    let mut ctx = ParseContext::new(&request, ParseEnv::new(&store, &prefs));
    ctx.parse_list("x", parser, ParseArgs::new())
        .map(|param| param.into_option().unwrap_or_default())
}

/// Run `raw` through `parse_ranges` under key "x"
pub fn pull_ranges<P: ScalarParser>(
    parser: &P,
    raw: &str,
) -> ParseResult<Vec<RangeValue<P::Output>>> {
    let (store, prefs) = (fixture_store(), prefs());
    let request = params(&[("x", raw)]);
    let mut ctx = ParseContext::new(&request, ParseEnv::new(&store, &prefs));
    ctx.parse_ranges("x", parser, ParseArgs::new())
        .map(|param| param.into_option().unwrap_or_default())
}

pub fn range<T: RangeOrdering>(from: T, to: T) -> RangeValue<T> {
    RangeValue::Range(OrderedRange::leave_order(from, to))
}
