//! Fixed data the simulator draws from.

/// City center the synthetic world is built around, as `(latitude, longitude)`.
pub const CITY_CENTER: (f64, f64) = (-34.9011, -56.1645);

/// Known Montevideo bus lines.
pub const LINE_CATALOG: [&str; 30] = [
    "100", "102", "103", "105", "106", "109", "111", "112", "115", "116", "124", "125", "130",
    "142", "148", "150", "155", "156", "169", "174", "175", "180", "183", "185", "186", "187",
    "188", "192", "195", "199",
];

/// Terminal names used for vehicle destinations (prefixed with `Terminal `).
pub const TERMINALS: [&str; 5] = ["Centro", "Pocitos", "Punta Carretas", "Ciudad Vieja", "Malvín"];

/// Street names used for stop addresses (prefixed with `Calle `).
pub const STREETS: [&str; 5] = [
    "18 de Julio",
    "Rivera",
    "Agraciada",
    "Luis A. de Herrera",
    "Italia",
];

/// Width of a simulation time bucket.
pub const BUCKET_SECS: i64 = 15;

/// Lines sampled when no line filter is given.
pub const SAMPLED_LINES: usize = 10;

/// Vehicles are jittered by up to this many degrees around [`CITY_CENTER`].
pub const VEHICLE_JITTER_DEG: f64 = 0.025;

/// Meters per degree of latitude in the flat-Earth approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
