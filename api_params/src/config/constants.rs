pub mod calendar {
    /// Four-digit values at or below this are not accepted as a bare year.
    /// "1225" is read as December 25th rather than the year 1225.
    pub const MIN_YEAR_ONLY: i32 = 1500;

    pub const MAX_MONTH: u32 = 12;
    pub const MAX_DAY: u32 = 31;
    pub const MAX_HOUR: u32 = 23;
    pub const MAX_MINUTE: u32 = 59;
    pub const MAX_SECOND: u32 = 59;
}

pub mod geo {
    /// Decimal places kept on parsed latitudes and longitudes
    pub const COORDINATE_DECIMALS: i32 = 4;

    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// Metres per international foot
    pub const METERS_PER_FOOT: f64 = 0.3048;

    /// Largest accepted altitude magnitude, in metres
    pub const MAX_ALTITUDE_METERS: f64 = 100_000.0;
}

pub mod request {
    /// Supplying this key (with any value) asks for a usage listing
    pub const HELP_KEY: &str = "help";

    /// Keys that carry an upload payload rather than a parameter value
    pub const UPLOAD_KEYS: [&str; 3] = ["upload", "upload_url", "upload_file"];
}

pub mod locale {
    pub const DEFAULT_LOCALE: &str = "en";

    pub const SUPPORTED_LOCALES: [&str; 12] = [
        "de", "el", "en", "es", "fr", "it", "jp", "pl", "pt", "ru", "uk", "zh",
    ];
}
