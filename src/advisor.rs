use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::Thresholds;
use crate::strength::{StarStrength, Strength};
use crate::symbols::{Element, ElementMap};

// ---------------------------
// ## Statements
// ---------------------------

/// One fired rule of the element advisor. Rendered to text by [`crate::text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Statement {
    /// Strong chart: restrain and drain the day master.
    StrongBase,
    /// Strong chart: Wealth is welcome.
    WealthFavorable { wealth: Element },
    /// Strong chart: Wealth is nearly absent and needs reinforcing.
    WealthSuppressed { wealth: Element },
    /// Strong chart: Resource outweighs Peers and holds Wealth down.
    ResourceOverbearing { resource: Element, wealth: Element },
    /// Weak chart: support and nourish the day master.
    WeakBase,
    /// Weak chart: Wealth outweighs Peers and Resource together.
    WealthUnbearable { wealth: Element },
    /// Weak chart: Wealth outweighs Peers but Resource can carry it.
    WealthManageable { wealth: Element, resource: Element },
    /// Neutral chart: the elements are roughly balanced.
    NeutralBase,
    /// Neutral chart: the strongest element restrains or drains the day master.
    MaxDraining { max: Element, controller: Element },
    /// Neutral chart: the strongest element is the day element and dominates.
    MaxSupporting {
        max: Element,
        controller: Element,
        controller_mother: Element,
    },
    /// Neutral chart: the strongest element is Resource and dominates.
    MaxNurturing {
        max: Element,
        controller: Element,
        controller_mother: Element,
    },
    /// Neutral chart: catch-all, the strongest element weighs on the day master.
    MaxWealth { max: Element, resource: Element },
    /// Neutral chart: the weakest element is Peers or Resource.
    MinSupport { min: Element, mother: Option<Element> },
    /// Neutral chart: the weakest element still carries enough weight.
    MinBalanced { min: Element },
    /// Neutral chart: Authority is the weakest element and too low.
    MinAuthorityLacking { min: Element },
    /// Neutral chart: Output is the weakest element and too low.
    MinOutputLacking { min: Element },
    /// Neutral chart: catch-all, the weakest element is Wealth.
    MinWealth { min: Element, wealth: Element },
    /// Closing line listing the favored elements.
    FavoredSummary { favored: Vec<Element> },
}

// ---------------------------
// ## Advisor
// ---------------------------

/// Favored and unfavored elements with the statements that justify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub favored: BTreeSet<Element>,
    pub unfavored: BTreeSet<Element>,
    pub statements: Vec<Statement>,
}

pub struct ElementAdvisor<'a> {
    thresholds: &'a Thresholds,
}

impl<'a> ElementAdvisor<'a> {
    pub fn new(thresholds: &'a Thresholds) -> Self {
        ElementAdvisor { thresholds }
    }

    pub fn advise(
        &self,
        day_element: Element,
        strength: Strength,
        stars: &StarStrength,
        adjusted: &ElementMap<f64>,
    ) -> Suggestion {
        let mut suggestion = Suggestion {
            favored: BTreeSet::new(),
            unfavored: BTreeSet::new(),
            statements: Vec::new(),
        };

        match strength {
            Strength::Strong => self.strong(day_element, stars, &mut suggestion),
            Strength::Weak => self.weak(day_element, stars, &mut suggestion),
            Strength::Neutral => self.neutral(day_element, stars, adjusted, &mut suggestion),
        }

        if !suggestion.favored.is_empty() {
            let favored = suggestion.favored.iter().copied().collect();
            suggestion.statements.push(Statement::FavoredSummary { favored });
        }

        tracing::info!(
            ?strength,
            favored = ?suggestion.favored,
            unfavored = ?suggestion.unfavored,
            "selected favored elements"
        );

        suggestion
    }

    fn strong(&self, day: Element, stars: &StarStrength, out: &mut Suggestion) {
        let wealth = day.overcomes();
        out.favored.extend([wealth, day.generates()]);
        out.unfavored.extend([day, day.mother()]);
        out.statements.push(Statement::StrongBase);
        out.statements.push(Statement::WealthFavorable { wealth });

        if !above(stars.wealth, stars.mean(), self.thresholds.wealth_floor_ratio) {
            out.statements.push(Statement::WealthSuppressed { wealth });
            out.favored.insert(wealth);
        }
        if stars.resource > stars.peers {
            out.statements.push(Statement::ResourceOverbearing {
                resource: day.mother(),
                wealth,
            });
            out.favored.insert(wealth);
        }
    }

    fn weak(&self, day: Element, stars: &StarStrength, out: &mut Suggestion) {
        let wealth = day.overcomes();
        out.favored.extend([day, day.mother()]);
        out.unfavored.extend([wealth, day.generates()]);
        out.statements.push(Statement::WeakBase);

        if stars.wealth > stars.peers + stars.resource {
            out.statements.push(Statement::WealthUnbearable { wealth });
            out.unfavored.insert(wealth);
        } else if stars.wealth > stars.peers * self.thresholds.wealth_pressure_ratio {
            out.statements.push(Statement::WealthManageable {
                wealth,
                resource: day.mother(),
            });
            out.unfavored.insert(wealth);
        }
    }

    fn neutral(
        &self,
        day: Element,
        stars: &StarStrength,
        adjusted: &ElementMap<f64>,
        out: &mut Suggestion,
    ) {
        out.statements.push(Statement::NeutralBase);

        let mean = stars.mean();
        let (max, min) = extremes(adjusted);
        let dominant = self.thresholds.dominant_star_ratio;

        let controller = max.controller();
        if max == day.controller() || max == day.generates() {
            out.statements.push(Statement::MaxDraining { max, controller });
            out.favored.extend([controller, day.mother(), day]);
            out.unfavored.extend([max, max.mother()]);
        } else if max == day && above(stars.peers, mean, dominant) {
            out.statements.push(Statement::MaxSupporting {
                max,
                controller,
                controller_mother: controller.mother(),
            });
            out.favored.extend([controller, controller.mother()]);
            out.unfavored.insert(max);
        } else if max == day.mother() && above(stars.resource, mean, dominant) {
            out.statements.push(Statement::MaxNurturing {
                max,
                controller,
                controller_mother: controller.mother(),
            });
            out.favored.extend([controller, controller.mother()]);
            out.unfavored.insert(max);
        } else {
            out.statements.push(Statement::MaxWealth {
                max,
                resource: day.mother(),
            });
            out.favored.insert(day.mother());
            out.unfavored.extend([day.controller(), max]);
        }

        let min_controller = min.controller().mother();
        let weak_ratio = self.thresholds.weak_star_ratio;
        if min == day || min == day.mother() {
            let mother = min.mother();
            if mother != max {
                out.statements.push(Statement::MinSupport {
                    min,
                    mother: Some(mother),
                });
                out.favored.extend([min, mother]);
            } else {
                out.statements.push(Statement::MinSupport { min, mother: None });
                out.favored.insert(min);
            }
            out.unfavored.insert(min_controller);
        } else if min == day.controller() || min == day.generates() {
            let star = if min == day.controller() {
                stars.authority
            } else {
                stars.output
            };
            if reaches(star, mean, weak_ratio) {
                out.statements.push(Statement::MinBalanced { min });
            } else {
                out.statements.push(if min == day.controller() {
                    Statement::MinAuthorityLacking { min }
                } else {
                    Statement::MinOutputLacking { min }
                });
                out.favored.insert(min);
                out.unfavored.insert(min_controller);
            }
        } else {
            out.statements.push(Statement::MinWealth {
                min,
                wealth: day.overcomes(),
            });
            out.favored.insert(min);
            out.unfavored.insert(min_controller);
        }
    }
}

// ---------------------------
// ## Helpers
// ---------------------------

/// First strongest and first weakest element in generation order.
fn extremes(scores: &ElementMap<f64>) -> (Element, Element) {
    let (mut max, mut min) = (Element::Wood, Element::Wood);
    for (element, &score) in scores.iter() {
        if score > scores[max] {
            max = element;
        }
        if score < scores[min] {
            min = element;
        }
    }
    (max, min)
}

/// `value > mean * ratio`; with a zero mean any positive value is above it.
fn above(value: f64, mean: f64, ratio: f64) -> bool {
    if mean == 0.0 {
        value > 0.0
    } else {
        value > mean * ratio
    }
}

/// `value >= mean * ratio`; a zero mean is always reached.
fn reaches(value: f64, mean: f64, ratio: f64) -> bool {
    if mean == 0.0 {
        true
    } else {
        value >= mean * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Element::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scores(values: [f64; 5]) -> ElementMap<f64> {
        ElementMap::from_fn(|e| values[e.index()])
    }

    fn advise(day: Element, strength: Strength, adjusted: [f64; 5]) -> Suggestion {
        let thresholds = Thresholds::default();
        let adjusted = scores(adjusted);
        let stars = StarStrength::from_scores(day, &adjusted);
        ElementAdvisor::new(&thresholds).advise(day, strength, &stars, &adjusted)
    }

    fn set(elements: &[Element]) -> BTreeSet<Element> {
        elements.iter().copied().collect()
    }

    #[test]
    fn strong_chart_favors_wealth_and_output() {
        let suggestion = advise(Wood, Strength::Strong, [5.0, 1.0, 1.0, 1.0, 1.0]);

        assert_eq!(suggestion.favored, set(&[Fire, Earth]));
        assert_eq!(suggestion.unfavored, set(&[Wood, Water]));
        assert_eq!(
            suggestion.statements,
            vec![
                Statement::StrongBase,
                Statement::WealthFavorable { wealth: Earth },
                Statement::FavoredSummary {
                    favored: vec![Fire, Earth]
                },
            ]
        );
    }

    #[test]
    fn strong_chart_with_starved_wealth_and_heavy_resource() {
        // Wood day: peers 2.0, resource 4.0, wealth 0.0
        let suggestion = advise(Wood, Strength::Strong, [2.0, 0.5, 0.0, 0.5, 4.0]);

        assert_eq!(suggestion.favored, set(&[Fire, Earth]));
        assert_eq!(
            &suggestion.statements[2..4],
            &[
                Statement::WealthSuppressed { wealth: Earth },
                Statement::ResourceOverbearing {
                    resource: Water,
                    wealth: Earth
                },
            ]
        );
    }

    #[test]
    fn weak_chart_with_unbearable_wealth() {
        // Wood day: peers 1, resource 1, output 2, wealth 3, authority 2
        let suggestion = advise(Wood, Strength::Weak, [1.0, 2.0, 3.0, 2.0, 1.0]);

        assert_eq!(suggestion.favored, set(&[Wood, Water]));
        assert_eq!(suggestion.unfavored, set(&[Fire, Earth]));
        assert_eq!(
            suggestion.statements[1],
            Statement::WealthUnbearable { wealth: Earth }
        );
        assert_eq!(suggestion.statements.len(), 3);
    }

    #[test]
    fn weak_chart_with_manageable_wealth() {
        // Wood day: peers 2, resource 2, wealth 2.5
        let suggestion = advise(Wood, Strength::Weak, [2.0, 3.0, 2.5, 3.0, 2.0]);

        assert_eq!(
            suggestion.statements[1],
            Statement::WealthManageable {
                wealth: Earth,
                resource: Water
            }
        );
    }

    #[test]
    fn weak_chart_with_light_wealth_fires_no_extra_rule() {
        let suggestion = advise(Wood, Strength::Weak, [2.0, 3.0, 2.0, 3.0, 2.0]);
        assert_eq!(
            suggestion.statements,
            vec![
                Statement::WeakBase,
                Statement::FavoredSummary {
                    favored: vec![Wood, Water]
                },
            ]
        );
    }

    #[test]
    fn neutral_chart_with_draining_max_and_lacking_authority() {
        // Wood day: max Fire (output), min Metal (authority, 1.0 < 0.7 * 2.6)
        let suggestion = advise(Wood, Strength::Neutral, [3.0, 4.0, 2.0, 1.0, 3.0]);

        assert_eq!(suggestion.favored, set(&[Wood, Metal, Water]));
        assert_eq!(suggestion.unfavored, set(&[Wood, Fire]));
        assert_eq!(
            suggestion.statements,
            vec![
                Statement::NeutralBase,
                Statement::MaxDraining {
                    max: Fire,
                    controller: Water
                },
                Statement::MinAuthorityLacking { min: Metal },
                Statement::FavoredSummary {
                    favored: vec![Wood, Metal, Water]
                },
            ]
        );
    }

    #[test]
    fn neutral_chart_with_dominant_peers() {
        // Fire day: Fire 9.0 > 2 * mean (2.6), min Metal is wealth
        let suggestion = advise(Fire, Strength::Neutral, [1.0, 9.0, 1.5, 0.5, 1.0]);

        assert_eq!(
            suggestion.statements[1],
            Statement::MaxSupporting {
                max: Fire,
                controller: Water,
                controller_mother: Metal
            }
        );
        assert_eq!(
            suggestion.statements[2],
            Statement::MinWealth {
                min: Metal,
                wealth: Metal
            }
        );
        assert_eq!(suggestion.favored, set(&[Metal, Water]));
        assert_eq!(suggestion.unfavored, set(&[Wood, Fire]));
    }

    #[test]
    fn neutral_chart_with_dominant_resource() {
        // Fire day: Wood 9.0 is Resource
        let suggestion = advise(Fire, Strength::Neutral, [9.0, 1.0, 1.5, 1.2, 1.0]);

        assert_eq!(
            suggestion.statements[1],
            Statement::MaxNurturing {
                max: Wood,
                controller: Metal,
                controller_mother: Earth
            }
        );
    }

    #[test]
    fn neutral_weakest_mother_skips_duplicate_when_it_is_the_max() {
        // Wood day: max Water (4.0 < 2 * mean 2.1, so not dominant), min Wood whose mother is Water
        let suggestion = advise(Wood, Strength::Neutral, [0.5, 2.0, 2.0, 2.0, 4.0]);

        assert_eq!(
            suggestion.statements[1],
            Statement::MaxWealth {
                max: Water,
                resource: Water
            }
        );
        assert_eq!(
            suggestion.statements[2],
            Statement::MinSupport {
                min: Wood,
                mother: None
            }
        );
        assert_eq!(suggestion.favored, set(&[Wood, Water]));
        assert_eq!(suggestion.unfavored, set(&[Earth, Metal, Water]));
    }

    #[test]
    fn neutral_weakest_output_with_enough_weight_is_left_alone() {
        // Wood day: min Fire 2.0 >= 0.7 * mean 2.6
        let suggestion = advise(Wood, Strength::Neutral, [3.0, 2.0, 2.5, 2.5, 3.0]);
        assert_eq!(suggestion.statements[2], Statement::MinBalanced { min: Fire });
    }

    // all for a Wood day master
    #[rstest]
    #[case::authority_max_lacking_output(
        Strength::Neutral,
        [3.0, 0.5, 2.0, 5.0, 3.0],
        vec![
            Statement::NeutralBase,
            Statement::MaxDraining { max: Metal, controller: Fire },
            Statement::MinOutputLacking { min: Fire },
            Statement::FavoredSummary { favored: vec![Wood, Fire, Water] },
        ],
        &[Wood, Fire, Water],
        &[Earth, Metal],
    )]
    #[case::wealth_max_weakest_resource(
        Strength::Neutral,
        [3.0, 2.0, 5.0, 2.0, 0.5],
        vec![
            Statement::NeutralBase,
            Statement::MaxWealth { max: Earth, resource: Water },
            Statement::MinSupport { min: Water, mother: Some(Metal) },
            Statement::FavoredSummary { favored: vec![Metal, Water] },
        ],
        &[Metal, Water],
        &[Fire, Earth, Metal],
    )]
    #[case::weakest_authority_with_enough_weight(
        Strength::Neutral,
        [3.0, 2.5, 3.5, 2.2, 2.8],
        vec![
            Statement::NeutralBase,
            Statement::MaxWealth { max: Earth, resource: Water },
            Statement::MinBalanced { min: Metal },
            Statement::FavoredSummary { favored: vec![Water] },
        ],
        &[Water],
        &[Earth, Metal],
    )]
    #[case::strong_with_absent_wealth_only(
        Strength::Strong,
        [5.0, 1.0, 0.0, 1.0, 1.0],
        vec![
            Statement::StrongBase,
            Statement::WealthFavorable { wealth: Earth },
            Statement::WealthSuppressed { wealth: Earth },
            Statement::FavoredSummary { favored: vec![Fire, Earth] },
        ],
        &[Fire, Earth],
        &[Wood, Water],
    )]
    #[case::strong_with_heavy_resource_only(
        Strength::Strong,
        [2.0, 1.0, 1.0, 1.0, 4.0],
        vec![
            Statement::StrongBase,
            Statement::WealthFavorable { wealth: Earth },
            Statement::ResourceOverbearing { resource: Water, wealth: Earth },
            Statement::FavoredSummary { favored: vec![Fire, Earth] },
        ],
        &[Fire, Earth],
        &[Wood, Water],
    )]
    fn wood_day_rules(
        #[case] strength: Strength,
        #[case] adjusted: [f64; 5],
        #[case] statements: Vec<Statement>,
        #[case] favored: &[Element],
        #[case] unfavored: &[Element],
    ) {
        let suggestion = advise(Wood, strength, adjusted);

        assert_eq!(suggestion.statements, statements);
        assert_eq!(suggestion.favored, set(favored));
        assert_eq!(suggestion.unfavored, set(unfavored));
    }

    #[test]
    fn all_zero_stars_do_not_divide_by_zero() {
        let suggestion = advise(Wood, Strength::Neutral, [0.0; 5]);

        assert_eq!(
            suggestion.statements[1],
            Statement::MaxWealth {
                max: Wood,
                resource: Water
            }
        );
        assert_eq!(
            suggestion.statements[2],
            Statement::MinSupport {
                min: Wood,
                mother: Some(Water)
            }
        );
        assert_eq!(suggestion.favored, set(&[Wood, Water]));
        assert_eq!(suggestion.unfavored, set(&[Wood, Earth, Metal]));
    }

    #[test]
    fn extremes_prefer_the_first_element_on_ties() {
        assert_eq!(extremes(&scores([1.0, 3.0, 3.0, 1.0, 2.0])), (Fire, Wood));
    }
}
