//! Apparent longitude of the Sun, precise to about one arcsecond.
//!
//! Earth's heliocentric longitude comes from the truncated VSOP87D series,
//! then FK5, nutation and aberration corrections are applied. Civil instants
//! are moved to dynamical time with a polynomial ΔT model first.

use chrono::{DateTime, Datelike, Utc};

pub type JulianDay = f64;

/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: JulianDay = 2_440_587.5;
const J2000: JulianDay = 2_451_545.0;

// ---------------------------
// ## VSOP87D Earth Terms
// ---------------------------

// (amplitude x 1e-8, phase, frequency per Julian millennium)
type Term = (f64, f64, f64);

const EARTH_L0: [Term; 64] = [
    (175_347_046.0, 0.0, 0.0),
    (3_341_656.0, 4.669_256_8, 6_283.075_85),
    (34_894.0, 4.626_1, 12_566.151_7),
    (3_497.0, 2.744_1, 5_753.384_9),
    (3_418.0, 2.828_9, 3.523_1),
    (3_136.0, 3.627_7, 77_713.771_5),
    (2_676.0, 4.418_1, 7_860.419_4),
    (2_343.0, 6.135_2, 3_930.209_7),
    (1_324.0, 0.742_5, 11_506.769_8),
    (1_273.0, 2.037_1, 529.691),
    (1_199.0, 1.109_6, 1_577.343_5),
    (990.0, 5.233, 5_884.927),
    (902.0, 2.045, 26.298),
    (857.0, 3.508, 398.149),
    (780.0, 1.179, 5_223.694),
    (753.0, 2.533, 5_507.553),
    (505.0, 4.583, 18_849.228),
    (492.0, 4.205, 775.523),
    (357.0, 2.92, 0.067),
    (317.0, 5.849, 11_790.629),
    (284.0, 1.899, 796.298),
    (271.0, 0.315, 10_977.079),
    (243.0, 0.345, 5_486.778),
    (206.0, 4.806, 2_544.314),
    (205.0, 1.869, 5_573.143),
    (202.0, 2.458, 6_069.777),
    (156.0, 0.833, 213.299),
    (132.0, 3.411, 2_942.463),
    (126.0, 1.083, 20.775),
    (115.0, 0.645, 0.98),
    (103.0, 0.636, 4_694.003),
    (102.0, 0.976, 15_720.839),
    (102.0, 4.267, 7.114),
    (99.0, 6.21, 2_146.17),
    (98.0, 0.68, 155.42),
    (86.0, 5.98, 161_000.69),
    (85.0, 1.3, 6_275.96),
    (85.0, 3.67, 71_430.7),
    (80.0, 1.81, 17_260.15),
    (79.0, 3.04, 12_036.46),
    (75.0, 1.76, 5_088.63),
    (74.0, 3.5, 3_154.69),
    (74.0, 4.68, 801.82),
    (70.0, 0.83, 9_437.76),
    (62.0, 3.98, 8_827.39),
    (61.0, 1.82, 7_084.9),
    (57.0, 2.78, 6_286.6),
    (56.0, 4.39, 14_143.5),
    (56.0, 3.47, 6_279.55),
    (52.0, 0.19, 12_139.55),
    (52.0, 1.33, 1_748.02),
    (51.0, 0.28, 5_856.48),
    (49.0, 0.49, 1_194.45),
    (41.0, 5.37, 8_429.24),
    (41.0, 2.4, 19_651.05),
    (39.0, 6.17, 10_447.39),
    (37.0, 6.04, 10_213.29),
    (37.0, 2.57, 1_059.38),
    (36.0, 1.71, 2_352.87),
    (36.0, 1.78, 6_812.77),
    (33.0, 0.59, 17_789.85),
    (30.0, 0.44, 83_996.85),
    (30.0, 2.74, 1_349.87),
    (25.0, 3.16, 4_690.48),
];

const EARTH_L1: [Term; 34] = [
    (628_331_966_747.0, 0.0, 0.0),
    (206_059.0, 2.678_235, 6_283.075_85),
    (4_303.0, 2.635_1, 12_566.151_7),
    (425.0, 1.59, 3.523),
    (119.0, 5.796, 26.298),
    (109.0, 2.966, 1_577.344),
    (93.0, 2.59, 18_849.23),
    (72.0, 1.14, 529.69),
    (68.0, 1.87, 398.15),
    (67.0, 4.41, 5_507.55),
    (59.0, 2.89, 5_223.69),
    (56.0, 2.17, 155.42),
    (45.0, 0.4, 796.3),
    (36.0, 0.47, 775.52),
    (29.0, 2.65, 7.11),
    (21.0, 5.34, 0.98),
    (19.0, 1.85, 5_486.78),
    (19.0, 4.97, 213.3),
    (17.0, 2.99, 6_275.96),
    (16.0, 0.03, 2_544.31),
    (16.0, 1.43, 2_146.17),
    (15.0, 1.21, 10_977.08),
    (12.0, 2.83, 1_748.02),
    (12.0, 3.26, 5_088.63),
    (12.0, 5.27, 1_194.45),
    (12.0, 2.08, 4_694.0),
    (11.0, 0.77, 553.57),
    (10.0, 1.3, 6_286.6),
    (10.0, 4.24, 1_349.87),
    (9.0, 2.7, 242.73),
    (9.0, 5.64, 951.72),
    (8.0, 5.3, 2_352.87),
    (6.0, 2.65, 9_437.76),
    (6.0, 4.67, 4_690.48),
];

const EARTH_L2: [Term; 20] = [
    (52_919.0, 0.0, 0.0),
    (8_720.0, 1.072_1, 6_283.075_8),
    (309.0, 0.867, 12_566.152),
    (27.0, 0.05, 3.52),
    (16.0, 5.19, 26.3),
    (16.0, 3.68, 155.42),
    (10.0, 0.76, 18_849.23),
    (9.0, 2.06, 77_713.77),
    (7.0, 0.83, 775.52),
    (5.0, 4.66, 1_577.34),
    (4.0, 1.03, 7.11),
    (4.0, 3.44, 5_573.14),
    (3.0, 5.14, 796.3),
    (3.0, 6.05, 5_507.55),
    (3.0, 1.19, 242.73),
    (3.0, 6.12, 529.69),
    (3.0, 0.31, 398.15),
    (3.0, 2.28, 553.57),
    (2.0, 4.38, 5_223.69),
    (2.0, 3.75, 0.98),
];

const EARTH_L3: [Term; 7] = [
    (289.0, 5.844, 6_283.076),
    (35.0, 0.0, 0.0),
    (17.0, 5.49, 12_566.15),
    (3.0, 5.2, 155.42),
    (1.0, 4.72, 3.52),
    (1.0, 5.3, 18_849.23),
    (1.0, 5.97, 242.73),
];

const EARTH_L4: [Term; 3] = [(114.0, 3.142, 0.0), (8.0, 4.13, 6_283.08), (1.0, 3.84, 12_566.15)];

const EARTH_L5: [Term; 1] = [(1.0, 3.14, 0.0)];

// radius vector, leading terms only; it only scales the aberration
const EARTH_R0: [Term; 9] = [
    (100_013_989.0, 0.0, 0.0),
    (1_670_700.0, 3.098_463_5, 6_283.075_85),
    (13_956.0, 3.055_25, 12_566.151_7),
    (3_084.0, 5.198_5, 77_713.771_5),
    (1_628.0, 1.173_9, 5_753.384_9),
    (1_576.0, 2.846_9, 7_860.419_4),
    (925.0, 5.453, 11_506.77),
    (542.0, 4.564, 3_930.21),
    (472.0, 3.661, 5_884.927),
];

const EARTH_R1: [Term; 2] = [(103_019.0, 1.107_49, 6_283.075_85), (1_721.0, 1.064_4, 12_566.151_7)];

const EARTH_R2: [Term; 1] = [(4_359.0, 5.784_6, 6_283.075_8)];

fn sum_terms(terms: &[Term], tau: f64) -> f64 {
    terms
        .iter()
        .map(|&(amplitude, phase, frequency)| amplitude * (phase + frequency * tau).cos())
        .sum()
}

/// Evaluates `sum(series_i * tau^i) * 1e-8`.
fn evaluate(series: &[&[Term]], tau: f64) -> f64 {
    series
        .iter()
        .rev()
        .fold(0.0, |acc, terms| acc * tau + sum_terms(terms, tau))
        * 1e-8
}

// ---------------------------
// ## Time Scales
// ---------------------------

/// Julian day in universal time.
pub fn julian_day(at: DateTime<Utc>) -> JulianDay {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// TT - UT in seconds for a decimal year (Espenak and Meeus polynomials).
pub fn delta_t(year: f64) -> f64 {
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };

    match year {
        y if y < 1860.0 => long_term(y),
        y if y < 1900.0 => {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251_754 * t.powi(2) + 0.016_806_68 * t.powi(3)
                - 0.000_447_362_4 * t.powi(4)
                + t.powi(5) / 233_174.0
        }
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
                - 0.000_197 * t.powi(4)
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + 0.844_93 * t - 0.076_1 * t.powi(2) + 0.002_093_6 * t.powi(3)
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
                + 0.001_727_5 * t.powi(3)
                + 0.000_651_814 * t.powi(4)
                + 0.000_023_735_99 * t.powi(5)
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
        }
        y if y < 2150.0 => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    }
}

/// Julian ephemeris day (dynamical time) of a civil instant.
pub fn ephemeris_day(at: DateTime<Utc>) -> JulianDay {
    let year = f64::from(at.year()) + (f64::from(at.ordinal0()) + 0.5) / 365.25;
    julian_day(at) + delta_t(year) / 86_400.0
}

// ---------------------------
// ## Solar Longitude
// ---------------------------

/// Apparent geocentric ecliptic longitude of the Sun in degrees, [0, 360),
/// for a Julian ephemeris day.
pub fn solar_longitude(jde: JulianDay) -> f64 {
    let tau = (jde - J2000) / 365_250.0;
    let t = tau * 10.0;

    let earth_longitude = evaluate(
        &[&EARTH_L0, &EARTH_L1, &EARTH_L2, &EARTH_L3, &EARTH_L4, &EARTH_L5],
        tau,
    );
    let radius = evaluate(&[&EARTH_R0, &EARTH_R1, &EARTH_R2], tau);

    // geocentric, FK5 frame
    let geometric = earth_longitude.to_degrees() + 180.0 - 0.090_33 / 3600.0;

    let node = (125.044_52 - 1_934.136_261 * t).to_radians();
    let sun_mean = (280.4665 + 36_000.7698 * t).to_radians();
    let moon_mean = (218.3165 + 481_267.8813 * t).to_radians();
    let nutation = -17.20 * node.sin() - 1.32 * (2.0 * sun_mean).sin()
        - 0.23 * (2.0 * moon_mean).sin()
        + 0.21 * (2.0 * node).sin();
    let aberration = -20.4898 / radius;

    (geometric + (nutation + aberration) / 3600.0).rem_euclid(360.0)
}

/// Apparent solar longitude at a civil instant.
pub fn solar_longitude_at(at: DateTime<Utc>) -> f64 {
    solar_longitude(ephemeris_day(at))
}
