use std::collections::BTreeMap;

use serde::Serialize;

use crate::symbols::{FourPillars, PillarPosition, StarGroup, Stem};

// ---------------------------
// ## Ten Gods
// ---------------------------

/// Relation of a stem to the day master, by element group and polarity match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TenGod {
    /// 比肩, same element, same polarity.
    BiJian,
    /// 劫财, same element, opposite polarity.
    JieCai,
    /// 食神, output, same polarity.
    ShiShen,
    /// 伤官, output, opposite polarity.
    ShangGuan,
    /// 偏财, wealth, same polarity.
    PianCai,
    /// 正财, wealth, opposite polarity.
    ZhengCai,
    /// 七杀, authority, same polarity.
    QiSha,
    /// 正官, authority, opposite polarity.
    ZhengGuan,
    /// 偏印, resource, same polarity.
    PianYin,
    /// 正印, resource, opposite polarity.
    ZhengYin,
}

impl TenGod {
    pub const ALL: [TenGod; 10] = [
        TenGod::BiJian,
        TenGod::JieCai,
        TenGod::ShiShen,
        TenGod::ShangGuan,
        TenGod::PianCai,
        TenGod::ZhengCai,
        TenGod::QiSha,
        TenGod::ZhengGuan,
        TenGod::PianYin,
        TenGod::ZhengYin,
    ];

    fn from_group(group: StarGroup, same_polarity: bool) -> TenGod {
        match (group, same_polarity) {
            (StarGroup::Peers, true) => TenGod::BiJian,
            (StarGroup::Peers, false) => TenGod::JieCai,
            (StarGroup::Output, true) => TenGod::ShiShen,
            (StarGroup::Output, false) => TenGod::ShangGuan,
            (StarGroup::Resource, true) => TenGod::PianYin,
            (StarGroup::Resource, false) => TenGod::ZhengYin,
            (StarGroup::Authority, true) => TenGod::QiSha,
            (StarGroup::Authority, false) => TenGod::ZhengGuan,
            (StarGroup::Wealth, true) => TenGod::PianCai,
            (StarGroup::Wealth, false) => TenGod::ZhengCai,
        }
    }

    pub fn group(self) -> StarGroup {
        match self {
            TenGod::BiJian | TenGod::JieCai => StarGroup::Peers,
            TenGod::ShiShen | TenGod::ShangGuan => StarGroup::Output,
            TenGod::PianCai | TenGod::ZhengCai => StarGroup::Wealth,
            TenGod::QiSha | TenGod::ZhengGuan => StarGroup::Authority,
            TenGod::PianYin | TenGod::ZhengYin => StarGroup::Resource,
        }
    }

    pub fn hanzi(self) -> &'static str {
        match self {
            TenGod::BiJian => "比肩",
            TenGod::JieCai => "劫财",
            TenGod::ShiShen => "食神",
            TenGod::ShangGuan => "伤官",
            TenGod::PianCai => "偏财",
            TenGod::ZhengCai => "正财",
            TenGod::QiSha => "七杀",
            TenGod::ZhengGuan => "正官",
            TenGod::PianYin => "偏印",
            TenGod::ZhengYin => "正印",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            TenGod::BiJian => "BiJian Star, Friend and Self (比肩)",
            TenGod::JieCai => "JieCai Star, Rival (劫财)",
            TenGod::ShiShen => "ShiShen Star, Artisan (食神)",
            TenGod::ShangGuan => "ShangGuan Star, Performer (伤官)",
            TenGod::PianCai => "PianCai Star, Opportunity Wealth (偏财)",
            TenGod::ZhengCai => "ZhengCai Star, Stable Wealth (正财)",
            TenGod::QiSha => "QiSha Star, Challenger (七杀)",
            TenGod::ZhengGuan => "ZhengGuan Star, Authority (正官)",
            TenGod::PianYin => "PianYin Star, Unconventional Resource (偏印)",
            TenGod::ZhengYin => "ZhengYin Star, Direct Resource (正印)",
        }
    }
}

/// Classify `other` relative to the day master.
pub fn classify(day_master: Stem, other: Stem) -> TenGod {
    if day_master == other {
        return TenGod::BiJian;
    }
    let group = day_master.element().group_of(other.element());
    TenGod::from_group(group, day_master.polarity() == other.polarity())
}

// ---------------------------
// ## Ten-God Table
// ---------------------------

/// Label of a pillar's visible stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StemLabel {
    /// The day stem itself, optionally qualified by the owner's gender.
    DayMaster { gender: Option<String> },
    Relation(TenGod),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenTenGod {
    pub stem: Stem,
    pub ten_god: TenGod,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarTenGods {
    pub position: PillarPosition,
    pub stem: Stem,
    pub label: StemLabel,
    pub hidden: Vec<HiddenTenGod>,
}

/// One column per pillar, in year, month, day, hour order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodTable {
    pub pillars: Vec<PillarTenGods>,
}

/// Accumulated weight per ten god, every category present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodSummary(pub BTreeMap<TenGod, f64>);

impl TenGodSummary {
    fn new() -> Self {
        TenGodSummary(TenGod::ALL.into_iter().map(|tg| (tg, 0.0)).collect())
    }

    fn add(&mut self, ten_god: TenGod, weight: f64) {
        *self.0.entry(ten_god).or_insert(0.0) += weight;
    }

    pub fn weight(&self, ten_god: TenGod) -> f64 {
        self.0.get(&ten_god).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Build the per-pillar table and the weighted summary.
///
/// Visible stems weigh 1.0 and hidden stems their branch weight. The day
/// position is labelled as the day master and left out of the summary; its
/// branch's hidden stems are still listed in the table.
pub fn build_table(
    pillars: &FourPillars,
    day_master: Stem,
    gender: Option<&str>,
) -> (TenGodTable, TenGodSummary) {
    let mut summary = TenGodSummary::new();
    let mut columns = Vec::with_capacity(4);

    for (position, pillar) in pillars.iter() {
        let counted = position != PillarPosition::Day;

        let label = if counted {
            let ten_god = classify(day_master, pillar.stem);
            summary.add(ten_god, 1.0);
            StemLabel::Relation(ten_god)
        } else {
            StemLabel::DayMaster {
                gender: gender.map(str::trim).filter(|g| !g.is_empty()).map(str::to_string),
            }
        };

        let hidden = pillar
            .branch
            .hidden_stems()
            .iter()
            .map(|&(stem, weight)| {
                let ten_god = classify(day_master, stem);
                if counted {
                    summary.add(ten_god, weight);
                }
                HiddenTenGod {
                    stem,
                    ten_god,
                    weight,
                }
            })
            .collect();

        columns.push(PillarTenGods {
            position,
            stem: pillar.stem,
            label,
            hidden,
        });
    }

    tracing::debug!(%day_master, total = summary.total(), "built ten-god table");

    (TenGodTable { pillars: columns }, summary)
}
