//! Parameter declaration registry
//!
//! Every parse call records what it expects before looking at the request,
//! so that after parsing the registry can report keys the caller never
//! asked for and can describe the whole action as a usage listing.

use crate::config::ParserPreferences;
use crate::error::{ErrorKind, ParseResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Shape of value a parse call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    Scalar,
    Range,
    List,
    RangeList,
}

impl ParserKind {
    pub fn is_range(&self) -> bool {
        matches!(self, ParserKind::Range | ParserKind::RangeList)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ParserKind::List | ParserKind::RangeList)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDeclaration {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub kind: ParserKind,
    pub args: BTreeMap<String, String>,
}

impl ParameterDeclaration {
    pub fn new(key: &str, type_name: &str, kind: ParserKind) -> Self {
        Self {
            key: key.to_string(),
            type_name: type_name.to_string(),
            kind,
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }

    pub fn is_range(&self) -> bool {
        self.kind.is_range()
    }

    pub fn is_list(&self) -> bool {
        self.kind.is_list()
    }

    /// Type as shown to users: `integer`, `date_range`, `user_list`
    pub fn display_type(&self) -> String {
        match self.kind {
            ParserKind::Scalar => self.type_name.clone(),
            ParserKind::Range => format!("{}_range", self.type_name),
            ParserKind::List => format!("{}_list", self.type_name),
            ParserKind::RangeList => format!("{}_range_list", self.type_name),
        }
    }

    /// One usage line: `key: type (arg: value, ...)`
    pub fn usage(&self) -> String {
        let mut line = format!("{}: {}", self.key, self.display_type());
        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|(name, value)| {
                    if value.is_empty() {
                        name.clone()
                    } else {
                        format!("{}: {}", name, value)
                    }
                })
                .collect();
            line.push_str(&format!(" ({})", args.join(", ")));
        }
        line
    }
}

/// Declarations in first-declared order, plus keys waived from the
/// unused-parameter check.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    declarations: Vec<ParameterDeclaration>,
    ignored: BTreeSet<String>,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Re-declaring a key keeps the first one and
    /// returns false.
    pub fn declare(&mut self, declaration: ParameterDeclaration) -> bool {
        if self.is_declared(&declaration.key) {
            return false;
        }
        self.declarations.push(declaration);
        true
    }

    pub fn ignore(&mut self, key: &str) {
        self.ignored.insert(key.to_string());
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&ParameterDeclaration> {
        self.declarations.iter().find(|d| d.key == key)
    }

    pub fn declarations(&self) -> &[ParameterDeclaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn accounted_for(&self, key: &str, prefs: &ParserPreferences) -> bool {
        self.is_declared(key) || self.is_ignored(key) || prefs.ignored_keys.iter().any(|k| k == key)
    }

    /// Supplied keys nobody declared or ignored, sorted
    pub fn unused_keys<'k, I>(&self, supplied: I, prefs: &ParserPreferences) -> Vec<String>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let unused: BTreeSet<&str> = supplied
            .into_iter()
            .filter(|key| !self.accounted_for(key, prefs))
            .collect();
        unused.into_iter().map(str::to_string).collect()
    }

    /// Final request-level check, in priority order: a help request,
    /// an undeclared upload, then any other undeclared keys.
    pub fn done_parsing<'k, I>(&self, supplied: I, prefs: &ParserPreferences) -> ParseResult<()>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let unused = self.unused_keys(supplied, prefs);
        if unused.is_empty() {
            return Ok(());
        }

        if unused.iter().any(|key| *key == prefs.help_key) {
            return Err(ErrorKind::HelpMessage {
                declarations: self.declarations.clone(),
            }
            .into());
        }

        if let Some(key) = unused
            .iter()
            .find(|key| prefs.upload_keys.iter().any(|u| u == *key))
        {
            return Err(ErrorKind::UnexpectedUpload { key: key.clone() }.into());
        }

        Err(ErrorKind::UnusedParameters { keys: unused }.into())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.declarations)
    }
}
