use super::{composite, ScalarParser};
use crate::context::ParseEnv;
use crate::error::{ErrorKind, Limit, ParseResult};
use crate::range::{OrderedRange, RangeValue};
use std::ops::RangeInclusive;

/// `1`/`yes`/`true` and `0`/`no`/`false` in any case, plus any localized
/// words configured in the parser preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParser;

impl ScalarParser for BooleanParser {
    type Output = bool;

    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<bool> {
        let word = raw.to_lowercase();
        match word.as_str() {
            "1" | "yes" | "true" => Ok(true),
            "0" | "no" | "false" => Ok(false),
            _ if contains_word(&env.prefs.localized_true, &word) => Ok(true),
            _ if contains_word(&env.prefs.localized_false, &word) => Ok(false),
            _ => Err(ErrorKind::bad_value(raw, self.type_name()).into()),
        }
    }
}

fn contains_word(words: &[String], word: &str) -> bool {
    words.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Accepted integers: an inclusive span or an explicit set
#[derive(Debug, Clone)]
pub enum IntegerLimit {
    Span(RangeInclusive<i64>),
    Values(Vec<i64>),
}

impl IntegerLimit {
    fn contains(&self, value: i64) -> bool {
        match self {
            IntegerLimit::Span(span) => span.contains(&value),
            IntegerLimit::Values(values) => values.contains(&value),
        }
    }

    fn to_limit(&self) -> Limit {
        match self {
            IntegerLimit::Span(span) => Limit::span(span.start(), span.end()),
            IntegerLimit::Values(values) => Limit::values(values),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegerParser {
    limit: Option<IntegerLimit>,
}

impl IntegerParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: RangeInclusive<i64>) -> Self {
        Self {
            limit: Some(IntegerLimit::Span(limit)),
        }
    }

    pub fn with_values(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            limit: Some(IntegerLimit::Values(values.into_iter().collect())),
        }
    }
}

impl ScalarParser for IntegerParser {
    type Output = i64;

    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        self.limit
            .iter()
            .map(|l| ("limit", l.to_limit().to_string()))
            .collect()
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<i64> {
        let value = static_regex!(r"^-?\d+$")
            .is_match(raw)
            .then(|| raw.parse::<i64>().ok())
            .flatten()
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()))?;
        match &self.limit {
            Some(limit) if !limit.contains(value) => {
                Err(ErrorKind::bad_limited(raw, limit.to_limit()).into())
            }
            _ => Ok(value),
        }
    }
}

/// Plain decimals only: `4`, `4.0`, `.123`, `-0.5`. No signs other than a
/// leading minus and no exponents.
#[derive(Debug, Clone, Default)]
pub struct FloatParser {
    limit: Option<RangeInclusive<f64>>,
}

impl FloatParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: RangeInclusive<f64>) -> Self {
        Self { limit: Some(limit) }
    }
}

impl ScalarParser for FloatParser {
    type Output = f64;

    fn type_name(&self) -> &'static str {
        "float"
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        self.limit
            .iter()
            .map(|l| ("limit", format!("{}..{}", l.start(), l.end())))
            .collect()
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<f64> {
        let value = static_regex!(r"^-?(\d+(\.\d*)?|\.\d+)$")
            .is_match(raw)
            .then(|| raw.parse::<f64>().ok())
            .flatten()
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()))?;
        match &self.limit {
            Some(limit) if !limit.contains(&value) => Err(ErrorKind::bad_limited(
                raw,
                Limit::span(limit.start(), limit.end()),
            )
            .into()),
            _ => Ok(value),
        }
    }
}

/// Any string; the optional limit is a maximum length in bytes.
#[derive(Debug, Clone, Default)]
pub struct StringParser {
    limit: Option<usize>,
}

impl StringParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_bytes: usize) -> Self {
        Self {
            limit: Some(max_bytes),
        }
    }
}

impl ScalarParser for StringParser {
    type Output = String;

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        self.limit.iter().map(|l| ("limit", l.to_string())).collect()
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<String> {
        match self.limit {
            Some(limit) if raw.len() > limit => Err(ErrorKind::string_too_long(raw, limit).into()),
            _ => Ok(raw.to_string()),
        }
    }
}

/// One of a fixed set of values, matched without regard to case and
/// returned in its canonical spelling. Ranges follow the order of the set,
/// not alphabetical order.
#[derive(Debug, Clone)]
pub struct EnumParser {
    values: Vec<String>,
}

impl EnumParser {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v.eq_ignore_ascii_case(value))
    }
}

impl ScalarParser for EnumParser {
    type Output = String;

    fn type_name(&self) -> &'static str {
        "enum"
    }

    fn declaration_args(&self) -> Vec<(&'static str, String)> {
        vec![("limit", self.values.join(", "))]
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<String> {
        if self.values.is_empty() {
            return Err(ErrorKind::missing_limit(self.type_name()).into());
        }
        self.position(raw)
            .map(|index| self.values[index].clone())
            .ok_or_else(|| ErrorKind::bad_limited(raw, Limit::values(&self.values)).into())
    }

    fn leave_order(&self) -> bool {
        true
    }

    fn parse_range_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<RangeValue<String>> {
        let range = match composite::parse_range_pair(self, env, raw)? {
            RangeValue::Range(range) => range,
            scalar => return Ok(scalar),
        };
        let (from, to) = range.into_parts();
        if from == to {
            return Ok(RangeValue::Scalar(from));
        }
        if self.position(&from) > self.position(&to) {
            Ok(RangeValue::Range(OrderedRange::leave_order(to, from)))
        } else {
            Ok(RangeValue::Range(OrderedRange::leave_order(from, to)))
        }
    }
}

/// A supported interface language. Absent means the configured default.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleParser;

impl ScalarParser for LocaleParser {
    type Output = String;

    fn type_name(&self) -> &'static str {
        "locale"
    }

    fn parse_str(&self, env: &ParseEnv<'_>, raw: &str) -> ParseResult<String> {
        let supported = &env.prefs.supported_locales;
        supported
            .iter()
            .find(|code| code.eq_ignore_ascii_case(raw))
            .cloned()
            .ok_or_else(|| ErrorKind::bad_limited(raw, Limit::values(supported)).into())
    }

    fn fallback(&self, env: &ParseEnv<'_>) -> Option<String> {
        Some(env.prefs.default_locale.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pull_list, pull_ranges, range, with_env};
    use assert_matches::assert_matches;

    fn numbers() -> EnumParser {
        EnumParser::new(["one", "two", "three", "four", "five"])
    }

    #[test]
    fn test_boolean_words() {
        with_env(|env| {
            for word in ["0", "no", "NO", "false", "False", "non"] {
                assert_eq!(BooleanParser.parse_str(env, word).unwrap(), false, "{word}");
            }
            for word in ["1", "yes", "true", "TRUE", "Oui"] {
                assert_eq!(BooleanParser.parse_str(env, word).unwrap(), true, "{word}");
            }
            let err = BooleanParser.parse_str(env, "foo").unwrap_err();
            assert_eq!(err.tag(), "api_bad_boolean_parameter_value");
        });
    }

    #[test]
    fn test_boolean_list() {
        assert_eq!(pull_list(&BooleanParser, "0,1").unwrap(), vec![false, true]);
    }

    #[test]
    fn test_enum_canonical_value() {
        with_env(|env| {
            assert_eq!(numbers().parse_str(env, "Two").unwrap(), "two");
            for bad in ["", "Ten"] {
                let err = numbers().parse_str(env, bad).unwrap_err();
                assert_matches!(
                    err.kind,
                    ErrorKind::BadLimitedParameterValue { ref limit, .. }
                        if limit.to_string() == "one, two, three, four, five"
                );
            }
        });
    }

    #[test]
    fn test_enum_requires_values() {
        let err = with_env(|env| EnumParser::new(Vec::<String>::new()).parse_str(env, "x"))
            .unwrap_err();
        assert_matches!(err.kind, ErrorKind::MissingLimit { .. });
    }

    #[test]
    fn test_enum_ranges_follow_declared_order() {
        with_env(|env| {
            let parser = numbers();
            assert_eq!(
                parser.parse_range_str(env, "four").unwrap(),
                RangeValue::Scalar("four".to_string())
            );
            assert_eq!(
                parser.parse_range_str(env, "four-one").unwrap(),
                range("one".to_string(), "four".to_string())
            );
            assert_eq!(
                parser.parse_range_str(env, "two-three").unwrap(),
                range("two".to_string(), "three".to_string())
            );
            assert_eq!(
                parser.parse_range_str(env, "Two-two").unwrap(),
                RangeValue::Scalar("two".to_string())
            );
        });
    }

    #[test]
    fn test_string_trim_and_limit() {
        with_env(|env| {
            assert_eq!(StringParser::new().parse_str(env, "").unwrap(), "");
            assert_eq!(StringParser::with_limit(4).parse_str(env, "abcd").unwrap(), "abcd");
            let err = StringParser::with_limit(4).parse_str(env, "abcde").unwrap_err();
            assert_matches!(err.kind, ErrorKind::StringTooLong { limit: 4, .. });
        });
        assert_eq!(
            pull_list(&StringParser::new(), " foo\n, bar ").unwrap(),
            vec!["foo".to_string(), "bar".to_string()]
        );
        assert_matches!(
            pull_list(&StringParser::with_limit(4), "abcd,abcde").unwrap_err().kind,
            ErrorKind::StringTooLong { .. }
        );
    }

    #[test]
    fn test_string_escapes_in_lists() {
        assert_eq!(
            pull_list(&StringParser::new(), "a\\,b,c").unwrap(),
            vec!["a,b".to_string(), "c".to_string()]
        );
        assert_eq!(
            pull_ranges(&StringParser::new(), "a\\-b").unwrap(),
            vec![RangeValue::Scalar("a-b".to_string())]
        );
        assert_eq!(
            pull_ranges(&StringParser::new(), "b-a").unwrap(),
            vec![range("a".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn test_integers() {
        with_env(|env| {
            let parser = IntegerParser::new();
            assert_eq!(parser.parse_str(env, "0").unwrap(), 0);
            assert_eq!(parser.parse_str(env, "-13").unwrap(), -13);
            for bad in ["", "one", "1.5", "+1", "99999999999999999999"] {
                let err = parser.parse_str(env, bad).unwrap_err();
                assert_eq!(err.tag(), "api_bad_integer_parameter_value", "{bad}");
            }
        });
    }

    #[test]
    fn test_integer_limit() {
        let parser = IntegerParser::with_limit(1..=13);
        with_env(|env| {
            assert_eq!(parser.parse_str(env, "13").unwrap(), 13);
            let err = parser.parse_str(env, "14").unwrap_err();
            assert_eq!(err.args()["limit"], "1..13");
            assert_eq!(err.args()["val"], "14");
        });
        assert!(pull_list(&parser, "1,14").is_err());
        assert!(pull_ranges(&parser, "0-3").is_err());
    }

    #[test]
    fn test_integer_value_set() {
        let parser = IntegerParser::with_values([1, 2, 4, 8]);
        assert_eq!(parser.declaration_args(), vec![("limit", "1, 2, 4, 8".to_string())]);
        with_env(|env| {
            assert_eq!(parser.parse_str(env, "4").unwrap(), 4);
            let err = parser.parse_str(env, "3").unwrap_err();
            assert_matches!(
                err.kind,
                ErrorKind::BadLimitedParameterValue { limit: Limit::Values(_), .. }
            );
            assert_eq!(err.args()["limit"], "1, 2, 4, 8");
        });
        assert_eq!(pull_list(&parser, "8,1").unwrap(), vec![8, 1]);
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(
            pull_ranges(&IntegerParser::new(), "1,4,6-9").unwrap(),
            vec![RangeValue::Scalar(1), RangeValue::Scalar(4), range(6, 9)]
        );
        assert_eq!(
            pull_ranges(&IntegerParser::new(), "9-6").unwrap(),
            vec![range(6, 9)]
        );
        assert_eq!(
            pull_ranges(&IntegerParser::new(), "-3").unwrap(),
            vec![RangeValue::Scalar(-3)]
        );
    }

    #[test]
    fn test_floats() {
        with_env(|env| {
            let parser = FloatParser::new();
            assert_eq!(parser.parse_str(env, "0").unwrap(), 0.0);
            assert_eq!(parser.parse_str(env, "4.0").unwrap(), 4.0);
            assert_eq!(parser.parse_str(env, ".123").unwrap(), 0.123);
            assert_eq!(parser.parse_str(env, "-.123").unwrap(), -0.123);
            for bad in ["", "one", "+1e5", "1e5", "1.2.3"] {
                assert!(parser.parse_str(env, bad).is_err(), "{bad}");
            }
            let err = FloatParser::with_limit(-3.0..=3.0)
                .parse_str(env, "3.5")
                .unwrap_err();
            assert_eq!(err.args()["limit"], "-3..3");
        });
        assert_eq!(
            pull_list(&FloatParser::new(), " 1.20, 3.40 ").unwrap(),
            vec![1.2, 3.4]
        );
    }

    #[test]
    fn test_locale() {
        with_env(|env| {
            assert_eq!(LocaleParser.parse_str(env, "FR").unwrap(), "fr");
            let err = LocaleParser.parse_str(env, "xx").unwrap_err();
            assert_matches!(
                err.kind,
                ErrorKind::BadLimitedParameterValue { ref limit, .. }
                    if limit.to_string().contains("en")
            );
            assert_eq!(LocaleParser.fallback(env), Some("en".to_string()));
        });
    }

    #[test]
    fn test_declaration_args() {
        assert_eq!(
            IntegerParser::with_limit(1..=5).declaration_args(),
            vec![("limit", "1..5".to_string())]
        );
        assert!(IntegerParser::new().declaration_args().is_empty());
        assert_eq!(StringParser::with_limit(80).declaration_args()[0].1, "80");
        assert_eq!(numbers().declaration_args()[0].1, "one, two, three, four, five");
    }
}
