//! Log codes and their metadata
//!
//! Every rejection a parser can produce maps to one code here, so log
//! consumers can group and filter parameter failures without parsing
//! message text.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

impl CodeMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            description,
        }
    }
}

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIG_LOAD_FAILURE: Code = Code::new("ERR003");
}

/// Malformed or out-of-limit values
pub mod params {
    use super::Code;

    pub const MISSING_PARAMETER: Code = Code::new("P001");
    pub const BAD_VALUE: Code = Code::new("P002");
    pub const BAD_LIMITED_VALUE: Code = Code::new("P003");
    pub const STRING_TOO_LONG: Code = Code::new("P004");
    pub const MISSING_LIMIT: Code = Code::new("P005");
}

/// Entity reference resolution
pub mod references {
    use super::Code;

    pub const NOT_FOUND_BY_ID: Code = Code::new("R001");
    pub const NOT_FOUND_BY_STRING: Code = Code::new("R002");
    pub const AMBIGUOUS_NAME: Code = Code::new("R003");
    pub const NAME_DOESNT_PARSE: Code = Code::new("R004");
}

pub mod permissions {
    use super::Code;

    pub const MUST_AUTHENTICATE: Code = Code::new("A001");
    pub const USER_NOT_VERIFIED: Code = Code::new("A002");
    pub const MUST_BE_OWNER: Code = Code::new("A010");
    pub const MUST_HAVE_EDIT_PERMISSION: Code = Code::new("A011");
    pub const MUST_HAVE_VIEW_PERMISSION: Code = Code::new("A012");
    pub const MUST_BE_ADMIN: Code = Code::new("A013");
    pub const MUST_BE_MEMBER: Code = Code::new("A014");
}

/// Request-level checks run after all parameters are pulled
pub mod declarations {
    use super::Code;

    pub const UNUSED_PARAMETERS: Code = Code::new("D001");
    pub const UNEXPECTED_UPLOAD: Code = Code::new("D002");
    pub const HELP_REQUESTED: Code = Code::new("D003");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CONFIGURATION_LOADED: Code = Code::new("I002");
    pub const PARAMETERS_PARSED: Code = Code::new("I010");
}

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        use Severity::*;

        [
            CodeMetadata::new("ERR001", "System", Critical, "Internal error"),
            CodeMetadata::new("ERR002", "System", Critical, "Initialization failure"),
            CodeMetadata::new("ERR003", "System", High, "Configuration could not be loaded"),
            CodeMetadata::new("P001", "Parameters", Medium, "Required parameter missing"),
            CodeMetadata::new("P002", "Parameters", Low, "Parameter value could not be parsed"),
            CodeMetadata::new("P003", "Parameters", Low, "Parameter value outside its limit"),
            CodeMetadata::new("P004", "Parameters", Low, "String parameter exceeds length limit"),
            CodeMetadata::new("P005", "Parameters", High, "Parser configured without a required limit"),
            CodeMetadata::new("R001", "References", Low, "No entity with the given id"),
            CodeMetadata::new("R002", "References", Low, "No entity matches the given string"),
            CodeMetadata::new("R003", "References", Low, "Name matches several entities"),
            CodeMetadata::new("R004", "References", Low, "String is not a recognizable name"),
            CodeMetadata::new("A001", "Permissions", Medium, "Request requires an authenticated user"),
            CodeMetadata::new("A002", "Permissions", Medium, "User has not been verified"),
            CodeMetadata::new("A010", "Permissions", Medium, "Caller must own the object"),
            CodeMetadata::new("A011", "Permissions", Medium, "Caller lacks edit permission"),
            CodeMetadata::new("A012", "Permissions", Medium, "Caller lacks view permission"),
            CodeMetadata::new("A013", "Permissions", Medium, "Caller must be an admin"),
            CodeMetadata::new("A014", "Permissions", Medium, "Caller must be a member"),
            CodeMetadata::new("D001", "Declarations", Low, "Request supplied undeclared parameters"),
            CodeMetadata::new("D002", "Declarations", Low, "Request carried an unexpected upload"),
            CodeMetadata::new("D003", "Declarations", Low, "Usage listing requested"),
            CodeMetadata::new("I001", "Success", Low, "Logging initialized"),
            CodeMetadata::new("I002", "Success", Low, "Configuration loaded"),
            CodeMetadata::new("I010", "Success", Low, "All parameters parsed"),
        ]
        .into_iter()
        .map(|meta| (meta.code, meta))
        .collect()
    })
}

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}
