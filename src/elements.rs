use serde::Serialize;

use crate::config::{PositionWeights, StateWeights};
use crate::symbols::{Branch, Element, ElementMap, FourPillars, PillarPosition, SeasonalState, Stem};

/// Round to three decimals, the precision every derived score is kept at.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------
// ## Element Scores
// ---------------------------

/// Element scores of a chart before and after the seasonal adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReport {
    /// Position-weighted energy per element.
    pub raw: ElementMap<f64>,
    /// `raw` times the state weight of each element, rounded to 3 decimals.
    pub adjusted: ElementMap<f64>,
    /// Seasonal state of each element, read from the month branch.
    pub states: ElementMap<SeasonalState>,
    /// Diagnostic breakdown of each pillar's elements.
    pub pillars: Vec<PillarElements>,
}

/// Elements a pillar contributes: the stem's, then one per hidden stem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarElements {
    pub position: PillarPosition,
    pub stem: Stem,
    pub stem_element: Element,
    pub branch: Branch,
    pub hidden_elements: Vec<Element>,
}

// ---------------------------
// ## Scorer
// ---------------------------

pub struct ElementScorer<'a> {
    positions: &'a PositionWeights,
    states: &'a StateWeights,
}

impl<'a> ElementScorer<'a> {
    pub fn new(positions: &'a PositionWeights, states: &'a StateWeights) -> Self {
        ElementScorer { positions, states }
    }

    pub fn score(&self, pillars: &FourPillars) -> ElementReport {
        let mut raw = ElementMap::<f64>::default();
        let mut breakdown = Vec::with_capacity(4);

        for (position, pillar) in pillars.iter() {
            // every stem counts once, then again with its positional weight
            let stem_element = pillar.stem.element();
            raw[stem_element] += 1.0;
            raw[stem_element] += self.positions.stem(position);

            let branch_weight = self.positions.branch(position);
            let mut hidden_elements = Vec::new();
            for &(hidden, weight) in pillar.branch.hidden_stems() {
                let element = hidden.element();
                raw[element] += weight * branch_weight;
                hidden_elements.push(element);
            }

            breakdown.push(PillarElements {
                position,
                stem: pillar.stem,
                stem_element,
                branch: pillar.branch,
                hidden_elements,
            });
        }

        let states = pillars.month_branch().seasonal_states();
        let adjusted = ElementMap::from_fn(|element| {
            round3(raw[element] * self.states.weight(states[element]))
        });

        tracing::debug!(
            month_branch = %pillars.month_branch(),
            ?raw,
            ?adjusted,
            "scored five elements"
        );

        ElementReport {
            raw,
            adjusted,
            states,
            pillars: breakdown,
        }
    }
}
