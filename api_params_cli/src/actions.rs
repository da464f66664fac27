//! Sample request handlers
//!
//! Each action pulls its parameters the way an API endpoint would and
//! returns the typed values as JSON. They double as a tour of the parsers.

use api_params::entity::EntityKind;
use api_params::prelude::*;
use clap::ValueEnum;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Search observations
    Observations,
    /// Upload an image to an observation
    Images,
    /// Comment on any commentable object
    Comments,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Observations => "observations",
            Action::Images => "images",
            Action::Comments => "comments",
        }
    }
}

const DETAIL_LEVELS: [&str; 3] = ["none", "low", "high"];
const IMAGE_SIZES: [&str; 6] = ["thumbnail", "small", "medium", "large", "huge", "full_size"];
const COMMENTABLE: [EntityKind; 5] = [
    EntityKind::Image,
    EntityKind::Location,
    EntityKind::Name,
    EntityKind::Observation,
    EntityKind::Project,
];

pub fn run(action: Action, ctx: &mut ParseContext<'_>) -> ParseResult<Value> {
    match action {
        Action::Observations => observations(ctx),
        Action::Images => images(ctx),
        Action::Comments => comments(ctx),
    }
}

/// Collects parsed values, leaving out parameters that were absent
#[derive(Default)]
struct Output(Map<String, Value>);

impl Output {
    fn put<T: serde::Serialize>(&mut self, key: &str, param: Param<T>) {
        if let Some(value) = param.into_option() {
            self.0
                .insert(key.to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
        }
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn observations(ctx: &mut ParseContext<'_>) -> ParseResult<Value> {
    let mut out = Output::default();
    out.put("id", ctx.parse_ranges("id", &IntegerParser::new(), ParseArgs::new())?);
    out.put(
        "date",
        ctx.parse_ranges("date", &DateParser, ParseArgs::new().help("when seen"))?,
    );
    out.put(
        "created_at",
        ctx.parse_range("created_at", &TimeParser, ParseArgs::new())?,
    );
    out.put(
        "user",
        ctx.parse_list("user", &EntityParser::new(EntityKind::User), ParseArgs::new())?,
    );
    out.put(
        "name",
        ctx.parse_list("name", &EntityParser::new(EntityKind::Name), ParseArgs::new())?,
    );
    out.put(
        "project",
        ctx.parse(
            "project",
            &EntityParser::new(EntityKind::Project).must_be_member(),
            ParseArgs::new(),
        )?,
    );
    out.put(
        "location",
        ctx.parse("location", &PlaceNameParser, ParseArgs::new())?,
    );
    out.put("north", ctx.parse("north", &LatitudeParser, ParseArgs::new())?);
    out.put("south", ctx.parse("south", &LatitudeParser, ParseArgs::new())?);
    out.put("east", ctx.parse("east", &LongitudeParser, ParseArgs::new())?);
    out.put("west", ctx.parse("west", &LongitudeParser, ParseArgs::new())?);
    out.put(
        "has_images",
        ctx.parse("has_images", &BooleanParser, ParseArgs::new())?,
    );
    out.put(
        "detail",
        ctx.parse(
            "detail",
            &EnumParser::new(DETAIL_LEVELS),
            ParseArgs::new().default_value("none".to_string()),
        )?,
    );
    out.put("locale", ctx.parse("locale", &LocaleParser, ParseArgs::new())?);
    Ok(json!({ "query": out.into_value() }))
}

fn images(ctx: &mut ParseContext<'_>) -> ParseResult<Value> {
    let mut out = Output::default();
    let observation = ctx.parse_required(
        "observation",
        &EntityParser::new(EntityKind::Observation).must_have_edit_permission(),
        ParseArgs::new(),
    )?;
    out.put("observation", Param::Parsed(observation));
    out.put(
        "size",
        ctx.parse_range("size", &EnumParser::new(IMAGE_SIZES), ParseArgs::new())?,
    );
    out.put(
        "quality",
        ctx.parse(
            "quality",
            &IntegerParser::with_limit(1..=100),
            ParseArgs::new().default_value(80),
        )?,
    );
    out.put(
        "notes",
        ctx.parse("notes", &StringParser::with_limit(1024), ParseArgs::new())?,
    );
    out.put(
        "license",
        ctx.parse("license", &EntityParser::new(EntityKind::License), ParseArgs::new())?,
    );
    out.put("altitude", ctx.parse("altitude", &AltitudeParser, ParseArgs::new())?);
    out.put("when", ctx.parse("when", &DateParser, ParseArgs::new())?);
    out.put(
        "copyright_holder",
        ctx.parse("copyright_holder", &StringParser::with_limit(100), ParseArgs::new())?,
    );
    Ok(json!({ "upload": out.into_value() }))
}

fn comments(ctx: &mut ParseContext<'_>) -> ParseResult<Value> {
    let mut out = Output::default();
    let target = ctx.parse_required("target", &ObjectParser::new(COMMENTABLE), ParseArgs::new())?;
    out.put("target", Param::Parsed(target));
    let summary = ctx.parse_required(
        "summary",
        &StringParser::with_limit(100),
        ParseArgs::new().help("one line"),
    )?;
    out.put("summary", Param::Parsed(summary));
    out.put(
        "content",
        ctx.parse("content", &StringParser::new(), ParseArgs::new())?,
    );
    Ok(json!({ "comment": out.into_value() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demo_store;
    use api_params::entity::Actor;

    fn request(pairs: &[(&str, &str)]) -> RequestParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run_with(
        action: Action,
        pairs: &[(&str, &str)],
        actor: Option<&Actor>,
    ) -> ParseResult<Value> {
        let store = demo_store();
        let prefs = ParserPreferences::default();
        let params = request(pairs);
        let mut env = ParseEnv::new(&store, &prefs);
        if let Some(actor) = actor {
            env = env.with_actor(actor);
        }
        let mut ctx = ParseContext::new(&params, env);
        let outcome = run(action, &mut ctx);
        ctx.finish(outcome)
    }

    #[test]
    fn test_observation_query() {
        let value = run_with(
            Action::Observations,
            &[("date", "2023-2024"), ("north", "45N"), ("detail", "LOW")],
            None,
        )
        .unwrap();
        let query = &value["query"];
        assert_eq!(query["date"][0]["begin"]["date"], "2023-01-01");
        assert_eq!(query["date"][0]["end"]["date"], "2024-12-31");
        assert_eq!(query["north"], 45.0);
        assert_eq!(query["detail"], "low");
        assert!(query.get("user").is_none());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let err = run_with(Action::Observations, &[("colour", "red")], None).unwrap_err();
        assert_eq!(err.tag(), "api_unused_parameters");
    }

    #[test]
    fn test_image_upload_needs_edit_permission() {
        let owner = Actor::new(1, "rolf");
        let value = run_with(Action::Images, &[("observation", "100")], Some(&owner)).unwrap();
        assert_eq!(value["upload"]["observation"]["id"], 100);
        assert_eq!(value["upload"]["quality"], 80);

        let other = Actor::new(2, "mary");
        let err = run_with(Action::Images, &[("observation", "100")], Some(&other)).unwrap_err();
        assert_eq!(err.tag(), "api_must_have_edit_permission");
    }

    #[test]
    fn test_comment_target() {
        let value = run_with(
            Action::Comments,
            &[("target", "observation 100"), ("summary", "Nice find")],
            None,
        )
        .unwrap();
        assert_eq!(value["comment"]["target"]["kind"], "observation");

        let err = run_with(Action::Comments, &[("target", "license 1")], None).unwrap_err();
        assert_eq!(err.tag(), "api_bad_limited_parameter_value");
    }

    #[test]
    fn test_help_lists_declarations() {
        let err = run_with(Action::Observations, &[("help", "1")], None).unwrap_err();
        assert_eq!(err.tag(), "api_help_message");
        assert!(err.to_string().contains("date: date_range_list (help: when seen)"));
    }

    #[test]
    fn test_help_with_required_parameters() {
        let err = run_with(Action::Comments, &[("help", "1")], None).unwrap_err();
        assert_eq!(err.tag(), "api_help_message");
        assert!(err.to_string().contains("target: object"));

        let err = run_with(Action::Images, &[("help", "1"), ("observation", "x")], None)
            .unwrap_err();
        assert_eq!(err.tag(), "api_help_message");
        assert!(err.to_string().contains("observation: "));
    }
}
