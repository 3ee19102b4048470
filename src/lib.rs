use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub mod advice;
pub mod advisor;
pub mod calendar;
pub mod config;
pub mod elements;
pub mod error;
pub mod solar;
pub mod strength;
pub mod symbols;
pub mod ten_gods;
pub mod text;

pub use advice::{translate, Advice, Disposition};
pub use advisor::{ElementAdvisor, Statement, Suggestion};
pub use calendar::{ChartResolver, ResolvedChart, SexagenaryCalendar};
pub use config::EngineConfig;
pub use elements::{ElementReport, ElementScorer};
pub use error::{BaziError, ConfigError};
pub use strength::{StarStrength, Strength, StrengthClassifier, StrengthReport};
pub use symbols::{Branch, Element, ElementMap, FourPillars, Pillar, PillarPosition, SeasonalState, Stem};
pub use ten_gods::{TenGod, TenGodSummary, TenGodTable};
pub use text::{Language, LocalizedReport};

// ---------------------------
// ## Birth Input
// ---------------------------

/// Birth record as it arrives from a caller, every field a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BirthRequest {
    /// `YYYY-MM-DD`
    pub birth: String,
    /// `HH:MM`
    pub time: String,
    /// IANA timezone name.
    pub tz: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthInfo {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub timezone: String,
    /// Free-form label carried into the day-master cell. May be empty.
    pub gender: String,
}

impl BirthInfo {
    pub fn parse(birth: &str, time: &str, tz: &str, gender: &str) -> Result<Self, BaziError> {
        let date = NaiveDate::parse_from_str(birth.trim(), "%Y-%m-%d")
            .map_err(|e| BaziError::InvalidBirthInput(format!("birth date {birth:?}: {e}")))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|e| BaziError::InvalidBirthInput(format!("birth time {time:?}: {e}")))?;
        calendar::parse_timezone(tz)?;

        Ok(BirthInfo {
            date,
            time,
            timezone: tz.trim().to_string(),
            gender: gender.trim().to_string(),
        })
    }

    /// The birth moment as an absolute instant.
    pub fn instant(&self) -> Result<DateTime<Utc>, BaziError> {
        let tz = calendar::parse_timezone(&self.timezone)?;
        calendar::localize(tz, self.date.and_time(self.time))
    }

    pub fn generate_report(&self) -> Result<Report, BaziError> {
        let config = EngineConfig::default();
        let calendar = SexagenaryCalendar::from_config(&config.calendar)?;
        Report::calculate(self, &calendar, &config)
    }

    fn gender_label(&self) -> Option<&str> {
        Some(self.gender.as_str()).filter(|g| !g.is_empty())
    }
}

impl TryFrom<BirthRequest> for BirthInfo {
    type Error = BaziError;

    fn try_from(request: BirthRequest) -> Result<Self, Self::Error> {
        BirthInfo::parse(&request.birth, &request.time, &request.tz, &request.gender)
    }
}

// ---------------------------
// ## Report
// ---------------------------

/// Everything the engine derives from one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub birth: Option<BirthInfo>,
    pub resolved: Option<ResolvedChart>,
    pub gender: Option<String>,
    pub pillars: FourPillars,
    pub day_master: Stem,
    pub elements: ElementReport,
    pub strength: StrengthReport,
    pub ten_gods: TenGodTable,
    pub ten_god_summary: TenGodSummary,
    pub suggestion: Suggestion,
    pub advice: Vec<Advice>,
}

impl Report {
    /// Resolve the birth moment into pillars, then analyse them.
    pub fn calculate(
        birth_info: &BirthInfo,
        resolver: &impl ChartResolver,
        config: &EngineConfig,
    ) -> Result<Self, BaziError> {
        let resolved = resolver.resolve(birth_info)?;
        let mut report = Self::from_pillars(&resolved.pillars, birth_info.gender_label(), config);
        report.birth = Some(birth_info.clone());
        report.resolved = Some(resolved);
        Ok(report)
    }

    /// Analyse an already known chart.
    pub fn from_pillars(pillars: &FourPillars, gender: Option<&str>, config: &EngineConfig) -> Self {
        let day_master = pillars.day_master();

        let elements = ElementScorer::new(&config.position, &config.state).score(pillars);

        let strength = StrengthClassifier::new(config.thresholds.strong_ratio).classify(
            day_master,
            &elements.adjusted,
            &elements.states,
        );

        let (ten_gods, ten_god_summary) = ten_gods::build_table(pillars, day_master, gender);

        let suggestion = ElementAdvisor::new(&config.thresholds).advise(
            strength.day_element,
            strength.strength,
            &strength.stars,
            &elements.adjusted,
        );

        let advice = translate(day_master, &suggestion.favored, &suggestion.unfavored);

        tracing::info!(
            %pillars,
            strength = ?strength.strength,
            favored = suggestion.favored.len(),
            unfavored = suggestion.unfavored.len(),
            "analysed chart"
        );

        Report {
            birth: None,
            resolved: None,
            gender: gender.map(str::trim).filter(|g| !g.is_empty()).map(str::to_string),
            pillars: *pillars,
            day_master,
            elements,
            strength,
            ten_gods,
            ten_god_summary,
            suggestion,
            advice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_birth_request() {
        let request = BirthRequest {
            birth: "2000-01-01".to_string(),
            time: "12:00".to_string(),
            tz: "Asia/Shanghai".to_string(),
            gender: " 男 ".to_string(),
        };
        let info = BirthInfo::try_from(request).unwrap();
        assert_eq!(info.date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(info.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(info.gender, "男");
    }

    #[rstest]
    #[case("2000-13-01", "12:00", "Asia/Shanghai")]
    #[case("2000-01-01", "25:00", "Asia/Shanghai")]
    #[case("2000-01-01", "noon", "Asia/Shanghai")]
    #[case("2000-01-01", "12:00", "Nowhere/Special")]
    fn rejects_bad_birth_input(#[case] birth: &str, #[case] time: &str, #[case] tz: &str) {
        let err = BirthInfo::parse(birth, time, tz, "").unwrap_err();
        assert!(matches!(err, BaziError::InvalidBirthInput(_)), "{err}");
    }

    #[test]
    fn generates_report_with_defaults() {
        let info = BirthInfo::parse("2000-01-01", "12:00", "Asia/Shanghai", "").unwrap();
        let report = info.generate_report().unwrap();
        assert_eq!(report.pillars.to_string(), "己卯 丙子 戊午 戊午");
        assert_eq!(report.gender, None);
        assert!(report.resolved.is_some());
    }
}
