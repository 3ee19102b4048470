//! Resolution of a civil birth time into the four sexagenary pillars.
//!
//! Year and month follow the solar terms: the year turns at Start of Spring
//! (apparent solar longitude 315°) and every month at one of the twelve
//! "jie" terms, 30° apart. Days and hours follow the civil clock of the
//! reference timezone.

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::CalendarConfig;
use crate::error::{BaziError, ConfigError};
use crate::solar::solar_longitude_at;
use crate::symbols::{Branch, FourPillars, Pillar, Stem};
use crate::BirthInfo;

/// Julian day number of 0001-01-01 minus one, the offset from chrono's day count.
const CE_TO_JDN: i64 = 1_721_425;
/// Solar longitude at Start of Spring, the first month of the year.
const START_OF_SPRING: f64 = 315.0;

/// Turns birth information into pillars.
pub trait ChartResolver {
    fn resolve(&self, birth: &BirthInfo) -> Result<ResolvedChart, BaziError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedChart {
    pub pillars: FourPillars,
    /// Civil time of birth in the reference timezone.
    pub reference_time: NaiveDateTime,
    pub reference_timezone: String,
    /// Apparent solar longitude at birth, degrees.
    pub solar_longitude: f64,
}

#[derive(Debug, Clone)]
pub struct SexagenaryCalendar {
    reference: Tz,
}

impl SexagenaryCalendar {
    /// An unknown reference zone is a configuration fault, not bad input.
    pub fn new(reference_timezone: &str) -> Result<Self, BaziError> {
        let reference = reference_timezone.trim().parse::<Tz>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "calendar.reference_timezone".to_string(),
                reason: format!("unknown IANA timezone {reference_timezone:?}: {e}"),
            }
        })?;
        Ok(SexagenaryCalendar { reference })
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self, BaziError> {
        Self::new(&config.reference_timezone)
    }

    /// Pillars of the instant `at`.
    pub fn chart_at(&self, at: DateTime<Utc>) -> ResolvedChart {
        let reference_time = at.with_timezone(&self.reference).naive_local();
        let longitude = solar_longitude_at(at);

        let mut year = reference_time.year();
        if reference_time.month() <= 2 && (240.0..START_OF_SPRING).contains(&longitude) {
            year -= 1;
        }
        let year_pillar = Pillar::from_cycle_index((year - 4).rem_euclid(60) as usize);

        // 0 is the 寅 month
        let month_index = ((longitude - START_OF_SPRING).rem_euclid(360.0) / 30.0) as usize % 12;
        let month_pillar = Pillar::new(
            Stem::from_index(year_pillar.stem.index() % 5 * 2 + 2 + month_index),
            Branch::from_index(month_index + 2),
        );

        let day_number = i64::from(reference_time.date().num_days_from_ce()) + CE_TO_JDN;
        let day_index = (day_number + 49).rem_euclid(60) as usize;
        let day_pillar = Pillar::from_cycle_index(day_index);

        // the late 子 hour takes its stem from the following day
        let hour = reference_time.hour() as usize;
        let hour_branch = (hour + 1) / 2 % 12;
        let hour_day_stem = if hour == 23 {
            Stem::from_index(day_index + 1)
        } else {
            day_pillar.stem
        };
        let hour_pillar = Pillar::new(
            Stem::from_index(hour_day_stem.index() % 5 * 2 + hour_branch),
            Branch::from_index(hour_branch),
        );

        let pillars = FourPillars::new(year_pillar, month_pillar, day_pillar, hour_pillar);
        tracing::debug!(%reference_time, longitude, %pillars, "resolved pillars");

        ResolvedChart {
            pillars,
            reference_time,
            reference_timezone: self.reference.name().to_string(),
            solar_longitude: longitude,
        }
    }
}

impl Default for SexagenaryCalendar {
    fn default() -> Self {
        SexagenaryCalendar {
            reference: chrono_tz::Asia::Shanghai,
        }
    }
}

impl ChartResolver for SexagenaryCalendar {
    fn resolve(&self, birth: &BirthInfo) -> Result<ResolvedChart, BaziError> {
        Ok(self.chart_at(birth.instant()?))
    }
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz, BaziError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| BaziError::InvalidBirthInput(format!("unknown timezone {name:?}: {e}")))
}

/// Interpret a civil time in `tz`. A time skipped by a DST change is rejected;
/// a repeated one resolves to the later, standard-time instant.
pub(crate) fn localize(tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>, BaziError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(at) => Ok(at.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, later) => Ok(later.with_timezone(&Utc)),
        LocalResult::None => Err(BaziError::InvalidBirthInput(format!(
            "{local} does not exist in {}",
            tz.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn birth(date: &str, time: &str, tz: &str) -> BirthInfo {
        BirthInfo {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            timezone: tz.to_string(),
            gender: String::new(),
        }
    }

    #[rstest]
    #[case("2000-01-01", "12:00", "Asia/Shanghai", "己卯 丙子 戊午 戊午")]
    #[case("2024-02-10", "12:00", "Asia/Shanghai", "甲辰 丙寅 甲辰 庚午")]
    #[case("2024-02-03", "12:00", "Asia/Shanghai", "癸卯 乙丑 丁酉 丙午")]
    #[case("2000-01-01", "23:30", "Asia/Shanghai", "己卯 丙子 戊午 甲子")]
    #[case("1999-12-31", "20:00", "America/New_York", "己卯 丙子 戊午 丁巳")]
    fn resolves_known_charts(
        #[case] date: &str,
        #[case] time: &str,
        #[case] tz: &str,
        #[case] expected: &str,
    ) {
        let chart = SexagenaryCalendar::default()
            .resolve(&birth(date, time, tz))
            .unwrap();
        assert_eq!(chart.pillars.to_string(), expected);
        assert_eq!(chart.reference_timezone, "Asia/Shanghai");
    }

    // 立春 2024-02-04 16:26:53 and 惊蛰 2024-03-05 10:22:35, Beijing time
    #[rstest]
    #[case("2024-02-04", "16:25", "癸卯 乙丑 戊戌 庚申")]
    #[case("2024-02-04", "16:29", "甲辰 丙寅 戊戌 庚申")]
    #[case("2024-03-05", "10:21", "甲辰 丙寅 戊辰 丁巳")]
    #[case("2024-03-05", "10:24", "甲辰 丁卯 戊辰 丁巳")]
    fn switches_pillars_at_the_solar_term(
        #[case] date: &str,
        #[case] time: &str,
        #[case] expected: &str,
    ) {
        let chart = SexagenaryCalendar::default()
            .resolve(&birth(date, time, "Asia/Shanghai"))
            .unwrap();
        assert_eq!(chart.pillars.to_string(), expected);
    }

    #[test]
    fn unknown_reference_timezone_is_a_config_fault() {
        let err = SexagenaryCalendar::new("Mars/Olympus").unwrap_err();
        assert!(matches!(
            err,
            BaziError::Config(ConfigError::InvalidValue { ref field, .. })
                if field == "calendar.reference_timezone"
        ));
        assert!(!err.is_client_error());
    }

    #[test]
    fn converts_to_reference_time() {
        let chart = SexagenaryCalendar::default()
            .resolve(&birth("1999-12-31", "20:00", "America/New_York"))
            .unwrap();
        assert_eq!(chart.reference_time.to_string(), "2000-01-01 09:00:00");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = SexagenaryCalendar::default()
            .resolve(&birth("2000-01-01", "12:00", "Atlantis/Capital"))
            .unwrap_err();
        assert!(matches!(err, BaziError::InvalidBirthInput(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn rejects_time_skipped_by_dst() {
        let err = SexagenaryCalendar::default()
            .resolve(&birth("2021-03-14", "02:30", "America/New_York"))
            .unwrap_err();
        assert!(matches!(err, BaziError::InvalidBirthInput(_)));
    }

    #[test]
    fn repeated_time_resolves_to_standard_time() {
        let local = NaiveDate::from_ymd_opt(2021, 11, 7)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let at = localize(chrono_tz::America::New_York, local).unwrap();
        assert_eq!(at.to_rfc3339(), "2021-11-07T06:30:00+00:00");
    }

    #[test]
    fn custom_reference_timezone() {
        let calendar = SexagenaryCalendar::new("UTC").unwrap();
        let chart = calendar.chart_at(Utc.with_ymd_and_hms(2000, 1, 1, 23, 30, 0).unwrap());
        assert_eq!(chart.reference_timezone, "UTC");
        assert_eq!(chart.pillars.hour.to_string(), "甲子");
    }
}
