//! Error taxonomy for parameter parsing
//!
//! Every failure a parser or the declaration registry can produce is one
//! `ErrorKind` variant carrying the structured arguments needed to render
//! a message. Rendering to a human-facing language is left to callers:
//! `tag()` names the translation key and `args()` the substitutions.

use crate::declaration::ParameterDeclaration;
use crate::entity::{Entity, EntityKind, Relation};
use crate::logging::codes::{self, Code};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Echo of the limit a value violated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Limit {
    /// Inclusive numeric span, rendered `min..max`
    Span { min: String, max: String },
    /// Every accepted value
    Values(Vec<String>),
}

impl Limit {
    pub fn span(min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Limit::Span {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        Limit::Values(values.into_iter().map(|v| v.to_string()).collect())
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Span { min, max } => write!(f, "{}..{}", min, max),
            Limit::Values(values) => f.write_str(&values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("Missing parameter '{key}'")]
    MissingParameter { key: String },

    #[error("Bad {type_name} value '{val}'")]
    BadParameterValue { val: String, type_name: String },

    #[error("Value '{val}' must be one of: {limit}")]
    BadLimitedParameterValue { val: String, limit: Limit },

    #[error("String '{val}' is longer than {limit} bytes")]
    StringTooLong { val: String, limit: usize },

    #[error("Name '{val}' is ambiguous, it could be: {}", labels(.candidates))]
    AmbiguousName { val: String, candidates: Vec<Entity> },

    #[error("Couldn't find {kind} #{id}")]
    ObjectNotFoundById { id: u64, kind: EntityKind },

    #[error("Couldn't find {kind} '{val}'")]
    ObjectNotFoundByString { val: String, kind: EntityKind },

    #[error("Unable to parse name '{val}'")]
    NameDoesntParse { val: String },

    #[error("This request requires an authenticated user")]
    MustAuthenticate,

    #[error("User '{login}' has not been verified")]
    UserNotVerified { login: String },

    #[error("Must be the owner of {obj}")]
    MustBeOwner { obj: Entity },

    #[error("Must have permission to edit {obj}")]
    MustHaveEditPermission { obj: Entity },

    #[error("Must have permission to view {obj}")]
    MustHaveViewPermission { obj: Entity },

    #[error("Must be an admin of {obj}")]
    MustBeAdmin { obj: Entity },

    #[error("Must be a member of {obj}")]
    MustBeMember { obj: Entity },

    #[error("Parser for {type_name} needs a limit")]
    MissingLimit { type_name: String },

    #[error("Unrecognized parameters: {}", .keys.join(", "))]
    UnusedParameters { keys: Vec<String> },

    #[error("Upload '{key}' was not expected")]
    UnexpectedUpload { key: String },

    #[error("Usage: {}", usage(.declarations))]
    HelpMessage {
        declarations: Vec<ParameterDeclaration>,
    },
}

fn labels(entities: &[Entity]) -> String {
    entities
        .iter()
        .map(|e| e.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn usage(declarations: &[ParameterDeclaration]) -> String {
    declarations
        .iter()
        .map(ParameterDeclaration::usage)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ErrorKind {
    pub fn missing_parameter(key: &str) -> Self {
        Self::MissingParameter {
            key: key.to_string(),
        }
    }

    pub fn bad_value(val: &str, type_name: &str) -> Self {
        Self::BadParameterValue {
            val: val.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn bad_limited(val: &str, limit: Limit) -> Self {
        Self::BadLimitedParameterValue {
            val: val.to_string(),
            limit,
        }
    }

    pub fn string_too_long(val: &str, limit: usize) -> Self {
        Self::StringTooLong {
            val: val.to_string(),
            limit,
        }
    }

    pub fn not_found_by_id(id: u64, kind: EntityKind) -> Self {
        Self::ObjectNotFoundById { id, kind }
    }

    pub fn not_found_by_string(val: &str, kind: EntityKind) -> Self {
        Self::ObjectNotFoundByString {
            val: val.to_string(),
            kind,
        }
    }

    pub fn missing_limit(type_name: &str) -> Self {
        Self::MissingLimit {
            type_name: type_name.to_string(),
        }
    }

    /// Rejection for an actor lacking `relation` to `obj`
    pub fn permission_denied(relation: Relation, obj: Entity) -> Self {
        match relation {
            Relation::Owner => Self::MustBeOwner { obj },
            Relation::Edit => Self::MustHaveEditPermission { obj },
            Relation::View => Self::MustHaveViewPermission { obj },
            Relation::Admin => Self::MustBeAdmin { obj },
            Relation::Member => Self::MustBeMember { obj },
        }
    }

    /// Variant name in snake case
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "missing_parameter",
            Self::BadParameterValue { .. } => "bad_parameter_value",
            Self::BadLimitedParameterValue { .. } => "bad_limited_parameter_value",
            Self::StringTooLong { .. } => "string_too_long",
            Self::AmbiguousName { .. } => "ambiguous_name",
            Self::ObjectNotFoundById { .. } => "object_not_found_by_id",
            Self::ObjectNotFoundByString { .. } => "object_not_found_by_string",
            Self::NameDoesntParse { .. } => "name_doesnt_parse",
            Self::MustAuthenticate => "must_authenticate",
            Self::UserNotVerified { .. } => "user_not_verified",
            Self::MustBeOwner { .. } => "must_be_owner",
            Self::MustHaveEditPermission { .. } => "must_have_edit_permission",
            Self::MustHaveViewPermission { .. } => "must_have_view_permission",
            Self::MustBeAdmin { .. } => "must_be_admin",
            Self::MustBeMember { .. } => "must_be_member",
            Self::MissingLimit { .. } => "missing_limit",
            Self::UnusedParameters { .. } => "unused_parameters",
            Self::UnexpectedUpload { .. } => "unexpected_upload",
            Self::HelpMessage { .. } => "help_message",
        }
    }

    /// Translation key. Bad values are keyed by the type that rejected
    /// them, e.g. `api_bad_date_range_parameter_value`.
    pub fn tag(&self) -> String {
        match self {
            Self::BadParameterValue { type_name, .. } => {
                format!("api_bad_{}_parameter_value", type_name)
            }
            other => format!("api_{}", other.error_type()),
        }
    }

    /// Substitutions for the translated message
    pub fn args(&self) -> BTreeMap<&'static str, String> {
        let mut args = BTreeMap::new();
        match self {
            Self::MissingParameter { key } => {
                args.insert("key", key.clone());
            }
            Self::BadParameterValue { val, type_name } => {
                args.insert("val", val.clone());
                args.insert("type", type_name.clone());
            }
            Self::BadLimitedParameterValue { val, limit } => {
                args.insert("val", val.clone());
                args.insert("limit", limit.to_string());
            }
            Self::StringTooLong { val, limit } => {
                args.insert("val", val.clone());
                args.insert("limit", limit.to_string());
            }
            Self::AmbiguousName { val, candidates } => {
                args.insert("name", val.clone());
                args.insert("others", labels(candidates));
            }
            Self::ObjectNotFoundById { id, kind } => {
                args.insert("id", id.to_string());
                args.insert("type", kind.to_string());
            }
            Self::ObjectNotFoundByString { val, kind } => {
                args.insert("str", val.clone());
                args.insert("type", kind.to_string());
            }
            Self::NameDoesntParse { val } => {
                args.insert("name", val.clone());
            }
            Self::MustAuthenticate => {}
            Self::UserNotVerified { login } => {
                args.insert("login", login.clone());
            }
            Self::MustBeOwner { obj }
            | Self::MustHaveEditPermission { obj }
            | Self::MustHaveViewPermission { obj }
            | Self::MustBeAdmin { obj }
            | Self::MustBeMember { obj } => {
                args.insert("obj", obj.to_string());
            }
            Self::MissingLimit { type_name } => {
                args.insert("type", type_name.clone());
            }
            Self::UnusedParameters { keys } => {
                args.insert("params", keys.join(", "));
            }
            Self::UnexpectedUpload { key } => {
                args.insert("key", key.clone());
            }
            Self::HelpMessage { declarations } => {
                args.insert("help", usage(declarations));
            }
        }
        args
    }

    /// Logging code for this kind
    pub fn error_code(&self) -> Code {
        match self {
            Self::MissingParameter { .. } => codes::params::MISSING_PARAMETER,
            Self::BadParameterValue { .. } => codes::params::BAD_VALUE,
            Self::BadLimitedParameterValue { .. } => codes::params::BAD_LIMITED_VALUE,
            Self::StringTooLong { .. } => codes::params::STRING_TOO_LONG,
            Self::MissingLimit { .. } => codes::params::MISSING_LIMIT,
            Self::AmbiguousName { .. } => codes::references::AMBIGUOUS_NAME,
            Self::ObjectNotFoundById { .. } => codes::references::NOT_FOUND_BY_ID,
            Self::ObjectNotFoundByString { .. } => codes::references::NOT_FOUND_BY_STRING,
            Self::NameDoesntParse { .. } => codes::references::NAME_DOESNT_PARSE,
            Self::MustAuthenticate => codes::permissions::MUST_AUTHENTICATE,
            Self::UserNotVerified { .. } => codes::permissions::USER_NOT_VERIFIED,
            Self::MustBeOwner { .. } => codes::permissions::MUST_BE_OWNER,
            Self::MustHaveEditPermission { .. } => codes::permissions::MUST_HAVE_EDIT_PERMISSION,
            Self::MustHaveViewPermission { .. } => codes::permissions::MUST_HAVE_VIEW_PERMISSION,
            Self::MustBeAdmin { .. } => codes::permissions::MUST_BE_ADMIN,
            Self::MustBeMember { .. } => codes::permissions::MUST_BE_MEMBER,
            Self::UnusedParameters { .. } => codes::declarations::UNUSED_PARAMETERS,
            Self::UnexpectedUpload { .. } => codes::declarations::UNEXPECTED_UPLOAD,
            Self::HelpMessage { .. } => codes::declarations::HELP_REQUESTED,
        }
    }
}

/// An `ErrorKind` plus whether it should abort the request. Parsers always
/// produce fatal errors; bulk flows downgrade with `non_fatal`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub fatal: bool,
}

impl ParseError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, fatal: true }
    }

    pub fn non_fatal(kind: ErrorKind) -> Self {
        Self { kind, fatal: false }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn tag(&self) -> String {
        self.kind.tag()
    }

    pub fn args(&self) -> BTreeMap<&'static str, String> {
        self.kind.args()
    }

    /// Serializable form handed to the response renderer
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            tag: self.tag(),
            code: self.kind.error_code().as_str(),
            args: self
                .args()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            fatal: self.fatal,
            message: self.to_string(),
        }
    }
}

impl From<ErrorKind> for ParseError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub tag: String,
    pub code: &'static str,
    pub args: BTreeMap<String, String>,
    pub fatal: bool,
    pub message: String,
}
