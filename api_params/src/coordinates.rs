//! Geographic coordinate and altitude parsing
//!
//! Accepts decimal degrees (`4.1234`), degrees-minutes-seconds with the
//! usual markers (`12°34'56"N`, `12d 34m 56s N`, `12deg 34sec S`) and bare
//! space-separated components (`12 34.56 N`). Hemisphere letters are upper
//! case only, so a lower-case `s` is always a seconds marker.

use crate::config::constants::geo;

/// Signed decimal latitude, rounded to four places; `None` if malformed,
/// east/west marked, or beyond the pole.
pub fn parse_latitude(raw: &str) -> Option<f64> {
    parse_dms(raw, 'N', 'S', geo::MAX_LATITUDE)
}

/// Signed decimal longitude, rounded to four places; `None` if malformed,
/// north/south marked, or beyond the antimeridian.
pub fn parse_longitude(raw: &str) -> Option<f64> {
    parse_dms(raw, 'E', 'W', geo::MAX_LONGITUDE)
}

/// Altitude in whole metres. Units are `m` (default) or feet as `ft` or `'`.
/// `None` beyond `MAX_ALTITUDE_METERS` either side of sea level.
pub fn parse_altitude(raw: &str) -> Option<i64> {
    let caps = static_regex!(r"^(-?\d+(?:\.\d+)?)\s*(m|ft|')?$").captures(raw.trim())?;
    let value: f64 = caps[1].parse().ok()?;
    let meters = match caps.get(2).map(|m| m.as_str()) {
        Some("ft") | Some("'") => value * geo::METERS_PER_FOOT,
        _ => value,
    };
    if !meters.is_finite() || meters.abs() > geo::MAX_ALTITUDE_METERS {
        return None;
    }
    Some(meters.round() as i64)
}

const DEGREES: usize = 0;
const SECONDS: usize = 2;

fn unit_slot(unit: &str) -> Option<usize> {
    match unit {
        "°" | "º" | "d" | "deg" => Some(DEGREES),
        "'" | "′" | "’" | "m" | "min" => Some(1),
        "\"" | "″" | "”" | "s" | "sec" => Some(SECONDS),
        _ => None,
    }
}

/// Degree, minute and second components in that order. A number followed
/// by a unit fills that unit's slot; a bare number fills the next free one.
#[derive(Default)]
struct DmsReader {
    slots: [Option<f64>; 3],
    next_slot: usize,
    pending: Option<f64>,
}

impl DmsReader {
    fn push_number(&mut self, value: f64) -> Option<()> {
        self.flush()?;
        self.pending = Some(value);
        Some(())
    }

    fn push_unit(&mut self, slot: usize) -> Option<()> {
        let value = self.pending.take()?;
        if slot < self.next_slot {
            return None;
        }
        self.slots[slot] = Some(value);
        self.next_slot = slot + 1;
        Some(())
    }

    fn flush(&mut self) -> Option<()> {
        if let Some(value) = self.pending.take() {
            if self.next_slot > SECONDS {
                return None;
            }
            self.slots[self.next_slot] = Some(value);
            self.next_slot += 1;
        }
        Some(())
    }

    fn finish(mut self) -> Option<f64> {
        self.flush()?;
        let degrees = self.slots[DEGREES]?;
        let minutes = self.slots[1].unwrap_or(0.0);
        let seconds = self.slots[SECONDS].unwrap_or(0.0);
        let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
        Some(if degrees.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        })
    }
}

fn parse_dms(raw: &str, positive: char, negative: char, max: f64) -> Option<f64> {
    let raw = raw.trim();
    let mut reader = DmsReader::default();
    let mut hemisphere = None;
    let mut position = 0;
    let mut numbers = 0;

    let tokens = static_regex!(r#"-?\d+(?:\.\d+)?|[A-Za-z]+|[°º'′’"″”]|\s+"#);
    for token in tokens.find_iter(raw) {
        if token.start() != position || hemisphere.is_some() {
            return None;
        }
        position = token.end();

        let text = token.as_str();
        if text.trim().is_empty() {
            continue;
        }
        if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            if text.starts_with('-') && numbers > 0 {
                return None;
            }
            numbers += 1;
            reader.push_number(text.parse().ok()?)?;
        } else if let Some(slot) = unit_slot(text) {
            reader.push_unit(slot)?;
        } else if text.len() == 1 && (text.starts_with(positive) || text.starts_with(negative)) {
            hemisphere = text.chars().next();
        } else {
            return None;
        }
    }
    if position != raw.len() {
        return None;
    }

    let mut value = reader.finish()?;
    if hemisphere == Some(negative) {
        value = -value;
    }
    if value.abs() > max {
        return None;
    }
    Some(round_to(value, geo::COORDINATE_DECIMALS))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_decimal_latitude() {
        assert!(close(parse_latitude("4"), 4.0));
        assert!(close(parse_latitude("-4"), -4.0));
        assert!(close(parse_latitude("4.1234567"), 4.1235));
        assert!(close(parse_latitude("4.1234567S"), -4.1235));
    }

    #[test]
    fn test_dms_latitude() {
        assert!(close(parse_latitude("12°34'56\"N"), 12.5822));
        assert!(close(parse_latitude("12 34.56 N"), 12.576));
        assert!(close(parse_latitude("12deg 34sec S"), -12.0094));
    }

    #[test]
    fn test_latitude_rejections() {
        assert_eq!(parse_latitude(""), None);
        assert_eq!(parse_latitude("12 34.56 E"), None);
        assert_eq!(parse_latitude("12 degrees 34.56 minutes"), None);
        assert_eq!(parse_latitude("12.56s"), None);
        assert_eq!(parse_latitude("91"), None);
    }

    #[test]
    fn test_latitude_pole_boundary() {
        assert!(close(parse_latitude("90d 0s N"), 90.0));
        assert_eq!(parse_latitude("90d 1s N"), None);
    }

    #[test]
    fn test_longitude() {
        assert!(close(parse_longitude("4.1234567W"), -4.1235));
        assert!(close(parse_longitude("12°34'56\"E"), 12.5822));
        assert!(close(parse_longitude("180d 0s E"), 180.0));
        assert_eq!(parse_longitude("180d 1s E"), None);
        assert_eq!(parse_longitude("12 34.56 N"), None);
    }

    #[test]
    fn test_altitude_units() {
        assert_eq!(parse_altitude("123"), Some(123));
        assert_eq!(parse_altitude("123 m"), Some(123));
        assert_eq!(parse_altitude("403 ft"), Some(123));
        assert_eq!(parse_altitude("403'"), Some(123));
        assert_eq!(parse_altitude("-12.6"), Some(-13));
    }

    #[test]
    fn test_altitude_bounds() {
        assert_eq!(parse_altitude("100000"), Some(100_000));
        assert_eq!(parse_altitude("-100000 m"), Some(-100_000));
        assert_eq!(parse_altitude("100001"), None);
        assert_eq!(parse_altitude("99999999999999999999999999999999"), None);
        assert_eq!(parse_altitude("400000 ft"), None);
    }

    #[test]
    fn test_altitude_rejections() {
        assert_eq!(parse_altitude("sealevel"), None);
        assert_eq!(parse_altitude("123 FT"), None);
        assert_eq!(parse_altitude(""), None);
    }
}
