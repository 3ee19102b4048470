use serde::Serialize;

use crate::elements::round3;
use crate::symbols::{Element, ElementMap, SeasonalState, StarGroup, Stem};

// ---------------------------
// ## Verdict
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Strength {
    Strong,
    Weak,
    Neutral,
}

// ---------------------------
// ## Star Groups
// ---------------------------

/// Adjusted score of each relation group, seen from the day element.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StarStrength {
    pub peers: f64,
    pub resource: f64,
    pub output: f64,
    pub wealth: f64,
    pub authority: f64,
}

impl StarStrength {
    pub fn from_scores(day_element: Element, adjusted: &ElementMap<f64>) -> Self {
        let of = |group| adjusted[day_element.element_of(group)];
        StarStrength {
            peers: of(StarGroup::Peers),
            resource: of(StarGroup::Resource),
            output: of(StarGroup::Output),
            wealth: of(StarGroup::Wealth),
            authority: of(StarGroup::Authority),
        }
    }

    pub fn get(&self, group: StarGroup) -> f64 {
        match group {
            StarGroup::Peers => self.peers,
            StarGroup::Resource => self.resource,
            StarGroup::Output => self.output,
            StarGroup::Wealth => self.wealth,
            StarGroup::Authority => self.authority,
        }
    }

    pub fn mean(&self) -> f64 {
        StarGroup::ALL.into_iter().map(|g| self.get(g)).sum::<f64>() / 5.0
    }
}

// ---------------------------
// ## Classifier
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    pub day_element: Element,
    pub day_state: SeasonalState,
    pub stars: StarStrength,
    /// Peers + Resource.
    pub support: f64,
    /// Output + Wealth + Authority.
    pub resistance: f64,
    pub strength: Strength,
}

pub struct StrengthClassifier {
    strong_ratio: f64,
}

impl StrengthClassifier {
    pub fn new(strong_ratio: f64) -> Self {
        StrengthClassifier { strong_ratio }
    }

    pub fn classify(
        &self,
        day_master: Stem,
        adjusted: &ElementMap<f64>,
        states: &ElementMap<SeasonalState>,
    ) -> StrengthReport {
        let day_element = day_master.element();
        let stars = StarStrength::from_scores(day_element, adjusted);
        let support = round3(stars.peers + stars.resource);
        let resistance = round3(stars.output + stars.wealth + stars.authority);
        let strength = self.balance(support, resistance);

        tracing::debug!(%day_master, support, resistance, ?strength, "classified day master");

        StrengthReport {
            day_element,
            day_state: states[day_element],
            stars,
            support,
            resistance,
            strength,
        }
    }

    /// Strong needs a clear margin; Weak only needs resistance ahead. First match wins.
    pub fn balance(&self, support: f64, resistance: f64) -> Strength {
        if support > resistance * self.strong_ratio {
            Strength::Strong
        } else if resistance > support {
            Strength::Weak
        } else {
            Strength::Neutral
        }
    }
}

impl Default for StrengthClassifier {
    fn default() -> Self {
        StrengthClassifier::new(1.5)
    }
}
