use super::ScalarParser;
use crate::context::ParseEnv;
use crate::coordinates;
use crate::error::{ErrorKind, ParseResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct LatitudeParser;

impl ScalarParser for LatitudeParser {
    type Output = f64;

    fn type_name(&self) -> &'static str {
        "latitude"
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<f64> {
        coordinates::parse_latitude(raw)
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()).into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LongitudeParser;

impl ScalarParser for LongitudeParser {
    type Output = f64;

    fn type_name(&self) -> &'static str {
        "longitude"
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<f64> {
        coordinates::parse_longitude(raw)
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()).into())
    }
}

/// Whole metres; feet are converted
#[derive(Debug, Clone, Copy, Default)]
pub struct AltitudeParser;

impl ScalarParser for AltitudeParser {
    type Output = i64;

    fn type_name(&self) -> &'static str {
        "altitude"
    }

    fn parse_str(&self, _env: &ParseEnv<'_>, raw: &str) -> ParseResult<i64> {
        coordinates::parse_altitude(raw)
            .ok_or_else(|| ErrorKind::bad_value(raw, self.type_name()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::RangeValue;
    use crate::testing::{pull_list, pull_ranges, range, with_env};

    #[test]
    fn test_latitude_values() {
        with_env(|env| {
            assert_eq!(LatitudeParser.parse_str(env, "12°34'56\"N").unwrap(), 12.5822);
            let err = LatitudeParser.parse_str(env, "12 34.56 E").unwrap_err();
            assert_eq!(err.tag(), "api_bad_latitude_parameter_value");
            assert_eq!(err.args()["val"], "12 34.56 E");
        });
    }

    #[test]
    fn test_latitude_ranges_by_hemisphere() {
        assert_eq!(
            pull_ranges(&LatitudeParser, "12S-34N").unwrap(),
            vec![range(-12.0, 34.0)]
        );
        assert_eq!(
            pull_ranges(&LatitudeParser, "34N-12S").unwrap(),
            vec![range(-12.0, 34.0)]
        );
        assert_eq!(
            pull_ranges(&LatitudeParser, "-12.5").unwrap(),
            vec![RangeValue::Scalar(-12.5)]
        );
    }

    #[test]
    fn test_longitude_values() {
        with_env(|env| {
            assert_eq!(LongitudeParser.parse_str(env, "4.1234567W").unwrap(), -4.1235);
            assert!(LongitudeParser.parse_str(env, "181").is_err());
        });
        assert_eq!(
            pull_list(&LongitudeParser, "1E, 2W").unwrap(),
            vec![1.0, -2.0]
        );
    }

    #[test]
    fn test_altitudes() {
        with_env(|env| {
            assert_eq!(AltitudeParser.parse_str(env, "403 ft").unwrap(), 123);
            let err = AltitudeParser.parse_str(env, "high").unwrap_err();
            assert_eq!(err.tag(), "api_bad_altitude_parameter_value");
            let err = AltitudeParser
                .parse_str(env, "99999999999999999999999999")
                .unwrap_err();
            assert_eq!(err.tag(), "api_bad_altitude_parameter_value");
        });
        assert_eq!(pull_list(&AltitudeParser, "123,456m").unwrap(), vec![123, 456]);
        assert_eq!(
            pull_ranges(&AltitudeParser, "500m-100").unwrap(),
            vec![range(100, 500)]
        );
    }
}
