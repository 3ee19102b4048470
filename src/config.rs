//! Layered engine configuration using figment.
//!
//! Sources (highest priority wins):
//! 1. Environment variables (`BAZI_*` prefix, `__` as section separator)
//! 2. `bazi.toml` in the working directory
//! 3. Built-in defaults
//!
//! `BAZI_STATE__FLOURISHING=1.4` maps to `state.flourishing`.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::symbols::{PillarPosition, SeasonalState};

// ---------------------------
// ## Engine Config
// ---------------------------

/// Every tunable the analysis pipeline reads. Built once, passed by reference.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub position: PositionWeights,
    #[serde(default)]
    pub state: StateWeights,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// ---------------------------
// ## Weights
// ---------------------------

/// Extra weight of a stem or branch by pillar position. The month branch dominates.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionWeights {
    pub year_stem: f64,
    pub year_branch: f64,
    pub month_stem: f64,
    pub month_branch: f64,
    pub day_stem: f64,
    pub day_branch: f64,
    pub hour_stem: f64,
    pub hour_branch: f64,
}

impl Default for PositionWeights {
    fn default() -> Self {
        Self {
            year_stem: 0.5,
            year_branch: 0.5,
            month_stem: 1.5,
            month_branch: 3.5,
            day_stem: 1.5,
            day_branch: 1.5,
            hour_stem: 1.0,
            hour_branch: 1.0,
        }
    }
}

impl PositionWeights {
    pub fn stem(&self, position: PillarPosition) -> f64 {
        match position {
            PillarPosition::Year => self.year_stem,
            PillarPosition::Month => self.month_stem,
            PillarPosition::Day => self.day_stem,
            PillarPosition::Hour => self.hour_stem,
        }
    }

    pub fn branch(&self, position: PillarPosition) -> f64 {
        match position {
            PillarPosition::Year => self.year_branch,
            PillarPosition::Month => self.month_branch,
            PillarPosition::Day => self.day_branch,
            PillarPosition::Hour => self.hour_branch,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("position.year_stem", self.year_stem),
            ("position.year_branch", self.year_branch),
            ("position.month_stem", self.month_stem),
            ("position.month_branch", self.month_branch),
            ("position.day_stem", self.day_stem),
            ("position.day_branch", self.day_branch),
            ("position.hour_stem", self.hour_stem),
            ("position.hour_branch", self.hour_branch),
        ]
    }
}

/// Multiplier applied to an element's raw score for its seasonal state.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateWeights {
    pub flourishing: f64,
    pub growing: f64,
    pub surplus: f64,
    pub resting: f64,
    pub restricted: f64,
    pub fading: f64,
}

impl Default for StateWeights {
    fn default() -> Self {
        Self {
            flourishing: 1.3,
            growing: 1.2,
            surplus: 1.05,
            resting: 1.0,
            restricted: 0.9,
            fading: 0.8,
        }
    }
}

impl StateWeights {
    pub fn weight(&self, state: SeasonalState) -> f64 {
        match state {
            SeasonalState::Flourishing => self.flourishing,
            SeasonalState::Growing => self.growing,
            SeasonalState::Surplus => self.surplus,
            SeasonalState::Resting => self.resting,
            SeasonalState::Restricted => self.restricted,
            SeasonalState::Fading => self.fading,
        }
    }

    /// Strongest state first.
    fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("state.flourishing", self.flourishing),
            ("state.growing", self.growing),
            ("state.surplus", self.surplus),
            ("state.resting", self.resting),
            ("state.restricted", self.restricted),
            ("state.fading", self.fading),
        ]
    }
}

// ---------------------------
// ## Thresholds
// ---------------------------

/// Ratios used by the strength classifier and the element advisor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Thresholds {
    /// Support must exceed resistance by this factor for a Strong chart.
    pub strong_ratio: f64,
    /// Strong chart: Wealth at or below this share of the star mean needs reinforcing.
    pub wealth_floor_ratio: f64,
    /// Weak chart: Wealth above Peers times this factor is unfavored.
    pub wealth_pressure_ratio: f64,
    /// Neutral chart: a weakest Authority/Output star below this share of the mean is lacking.
    pub weak_star_ratio: f64,
    /// Neutral chart: a strongest Peers/Resource star above this multiple of the mean dominates.
    pub dominant_star_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong_ratio: 1.5,
            wealth_floor_ratio: 0.1,
            wealth_pressure_ratio: 1.05,
            weak_star_ratio: 0.7,
            dominant_star_ratio: 2.0,
        }
    }
}

impl Thresholds {
    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("thresholds.strong_ratio", self.strong_ratio),
            ("thresholds.wealth_floor_ratio", self.wealth_floor_ratio),
            ("thresholds.wealth_pressure_ratio", self.wealth_pressure_ratio),
            ("thresholds.weak_star_ratio", self.weak_star_ratio),
            ("thresholds.dominant_star_ratio", self.dominant_star_ratio),
        ]
    }
}

// ---------------------------
// ## Calendar
// ---------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalendarConfig {
    /// IANA zone whose civil time the pillars are read in.
    pub reference_timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            reference_timezone: "Asia/Shanghai".to_string(),
        }
    }
}

// ---------------------------
// ## Loading
// ---------------------------

impl EngineConfig {
    /// Load from defaults, `bazi.toml` and `BAZI_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load with an explicit TOML file in place of `bazi.toml`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("BAZI_").split("__"));
        Self::extract(figment)
    }

    /// The provider chain used by [`EngineConfig::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("bazi.toml"))
            .merge(Env::prefixed("BAZI_").split("__"))
    }

    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects negative or non-finite weights and a non-monotonic state table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = self
            .position
            .fields()
            .into_iter()
            .chain(self.state.fields())
            .chain(self.thresholds.fields());
        for (field, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be a finite, non-negative number, got {value}")));
            }
        }

        let states = self.state.fields();
        for pair in states.windows(2) {
            let ((stronger, high), (weaker, low)) = (pair[0], pair[1]);
            if high <= low {
                return Err(invalid(
                    weaker,
                    format!("must be lower than {stronger} ({high}), got {low}"),
                ));
            }
        }

        if self.calendar.reference_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(invalid(
                "calendar.reference_timezone",
                format!("unknown IANA timezone {:?}", self.calendar.reference_timezone),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason,
    }
}
