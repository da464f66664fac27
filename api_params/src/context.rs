//! Per-request parsing context
//!
//! A `ParseContext` owns the declaration registry for one request and
//! hands each parser the shared environment: the entity lookup, the
//! acting user, and parser preferences.
//!
//! When the request carries the help key, every pull only records its
//! declaration and treats the value as absent, so the usage listing
//! covers the whole action instead of stopping at the first bad or
//! missing value.

use crate::config::ParserPreferences;
use crate::declaration::{DeclarationRegistry, ParameterDeclaration, ParserKind};
use crate::entity::{Actor, EntityLookup};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::logging::codes;
use crate::parsers::{composite, Param, ParseArgs, ScalarParser};
use crate::range::RangeValue;
use crate::{log_debug, log_error, log_success};
use std::collections::BTreeMap;
use std::fmt;

/// Raw request parameters, key to unparsed value
pub type RequestParams = BTreeMap<String, String>;

/// Read-only collaborators shared by every parser
#[derive(Clone, Copy)]
pub struct ParseEnv<'a> {
    pub lookup: &'a dyn EntityLookup,
    pub actor: Option<&'a Actor>,
    pub prefs: &'a ParserPreferences,
}

impl<'a> ParseEnv<'a> {
    pub fn new(lookup: &'a dyn EntityLookup, prefs: &'a ParserPreferences) -> Self {
        Self {
            lookup,
            actor: None,
            prefs,
        }
    }

    pub fn with_actor(mut self, actor: &'a Actor) -> Self {
        self.actor = Some(actor);
        self
    }
}

pub struct ParseContext<'a> {
    env: ParseEnv<'a>,
    params: &'a RequestParams,
    registry: DeclarationRegistry,
    log_declarations: bool,
    help_requested: bool,
}

impl<'a> ParseContext<'a> {
    pub fn new(params: &'a RequestParams, env: ParseEnv<'a>) -> Self {
        Self {
            env,
            params,
            registry: DeclarationRegistry::new(),
            log_declarations: false,
            help_requested: params.contains_key(&env.prefs.help_key),
        }
    }

    /// Log every declaration at debug level
    pub fn log_declarations(mut self, enabled: bool) -> Self {
        self.log_declarations = enabled;
        self
    }

    /// True when the request asked for a usage listing
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn env(&self) -> &ParseEnv<'a> {
        &self.env
    }

    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    pub fn declarations(&self) -> &[ParameterDeclaration] {
        self.registry.declarations()
    }

    /// Waive `key` from the unused-parameter check without declaring it
    pub fn ignore(&mut self, key: &str) {
        self.registry.ignore(key);
    }

    pub fn parse<P: ScalarParser>(
        &mut self,
        key: &str,
        parser: &P,
        args: ParseArgs<P::Output>,
    ) -> ParseResult<Param<P::Output>> {
        self.declare(key, parser, ParserKind::Scalar, &args, false);
        let Some(raw) = self.raw_value(key) else {
            let default = args.default.or_else(|| parser.fallback(&self.env));
            return Ok(Param::absent_or(default));
        };
        let result = parser.parse_str(&self.env, &raw);
        self.checked(key, result).map(Param::Parsed)
    }

    /// A scalar that must be present and non-blank
    pub fn parse_required<P: ScalarParser>(
        &mut self,
        key: &str,
        parser: &P,
        args: ParseArgs<P::Output>,
    ) -> ParseResult<P::Output> {
        self.declare(key, parser, ParserKind::Scalar, &args, true);
        if self.help_requested {
            return Err(self.help_message());
        }
        let raw = match self.raw_value(key) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return self.checked(key, Err(ErrorKind::missing_parameter(key).into())),
        };
        let result = parser.parse_str(&self.env, &raw);
        self.checked(key, result)
    }

    pub fn parse_range<P: ScalarParser>(
        &mut self,
        key: &str,
        parser: &P,
        args: ParseArgs<RangeValue<P::Output>>,
    ) -> ParseResult<Param<RangeValue<P::Output>>> {
        self.declare(key, parser, ParserKind::Range, &args, false);
        let Some(raw) = self.raw_value(key) else {
            let default = args
                .default
                .or_else(|| parser.fallback(&self.env).map(RangeValue::Scalar));
            return Ok(Param::absent_or(default));
        };
        let result = parser.parse_range_str(&self.env, &raw);
        self.checked(key, result).map(Param::Parsed)
    }

    pub fn parse_list<P: ScalarParser>(
        &mut self,
        key: &str,
        parser: &P,
        args: ParseArgs<Vec<P::Output>>,
    ) -> ParseResult<Param<Vec<P::Output>>> {
        self.declare(key, parser, ParserKind::List, &args, false);
        let Some(raw) = self.raw_value(key) else {
            return Ok(Param::absent_or(args.default));
        };
        let env = &self.env;
        let result = composite::parse_items(&raw, |item| {
            parser.parse_str(env, &composite::unescape(item))
        });
        self.checked(key, result).map(Param::Parsed)
    }

    /// Comma-separated list whose elements may each be a range
    pub fn parse_ranges<P: ScalarParser>(
        &mut self,
        key: &str,
        parser: &P,
        args: ParseArgs<Vec<RangeValue<P::Output>>>,
    ) -> ParseResult<Param<Vec<RangeValue<P::Output>>>> {
        self.declare(key, parser, ParserKind::RangeList, &args, false);
        let Some(raw) = self.raw_value(key) else {
            return Ok(Param::absent_or(args.default));
        };
        let env = &self.env;
        let result = composite::parse_items(&raw, |item| parser.parse_range_str(env, item));
        self.checked(key, result).map(Param::Parsed)
    }

    /// Close out an action: its own error wins unless help was requested,
    /// then the request-level check runs.
    pub fn finish<T>(&self, outcome: ParseResult<T>) -> ParseResult<T> {
        match outcome {
            Err(err) if !self.help_requested => Err(err),
            outcome => {
                self.done_parsing()?;
                outcome
            }
        }
    }

    /// Request-level check once the action has pulled everything it wants
    pub fn done_parsing(&self) -> ParseResult<()> {
        let supplied = self.params.keys().map(String::as_str);
        match self.registry.done_parsing(supplied, self.env.prefs) {
            Ok(()) => {
                log_success!(
                    codes::success::PARAMETERS_PARSED,
                    "All request parameters accounted for",
                    "declared" => self.registry.len(),
                    "supplied" => self.params.len()
                );
                Ok(())
            }
            Err(err) => {
                log_error!(err.kind.error_code(), "Request parameters rejected", "tag" => err.tag());
                Err(err)
            }
        }
    }

    /// Trimmed value for `key`; nothing while help is requested
    fn raw_value(&self, key: &str) -> Option<String> {
        if self.help_requested {
            return None;
        }
        self.params.get(key).map(|value| value.trim().to_string())
    }

    fn help_message(&self) -> ParseError {
        ErrorKind::HelpMessage {
            declarations: self.registry.declarations().to_vec(),
        }
        .into()
    }

    fn declare<P: ScalarParser, D: fmt::Debug>(
        &mut self,
        key: &str,
        parser: &P,
        kind: ParserKind,
        args: &ParseArgs<D>,
        required: bool,
    ) {
        let mut declaration = ParameterDeclaration::new(key, parser.type_name(), kind);
        for (name, value) in parser.declaration_args() {
            declaration = declaration.with_arg(name, value);
        }
        if required {
            declaration = declaration.with_arg("required", "");
        }
        if let Some(default) = &args.default {
            declaration = declaration.with_arg("default", format!("{:?}", default));
        }
        if let Some(help) = &args.help {
            declaration = declaration.with_arg("help", help.clone());
        }
        if let Some(name) = &args.as_name {
            declaration = declaration.with_arg("as", name.clone());
        }

        let display_type = declaration.display_type();
        if self.registry.declare(declaration) && self.log_declarations {
            log_debug!("Declared parameter", "key" => key, "type" => display_type);
        }
    }

    fn checked<T>(&self, key: &str, result: ParseResult<T>) -> ParseResult<T> {
        if let Err(err) = &result {
            log_error!(
                err.kind.error_code(),
                "Rejected parameter value",
                "key" => key,
                "tag" => err.tag()
            );
        }
        result
    }
}
