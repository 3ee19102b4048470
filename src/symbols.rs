use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::BaziError;

// ---------------------------
// ## Five Elements
// ---------------------------

/// The five elements, declared in generation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn offset(self, steps: usize) -> Element {
        Element::ALL[(self.index() + steps) % 5]
    }

    /// The element this one generates (Wood -> Fire -> Earth -> Metal -> Water -> Wood).
    pub fn generates(self) -> Element {
        self.offset(1)
    }

    /// The element this one overcomes (Wood -> Earth -> Water -> Fire -> Metal -> Wood).
    pub fn overcomes(self) -> Element {
        self.offset(2)
    }

    /// The element that overcomes this one.
    pub fn controller(self) -> Element {
        self.offset(3)
    }

    /// The element that generates this one.
    pub fn mother(self) -> Element {
        self.offset(4)
    }

    /// Which group `other` belongs to when `self` is the day element.
    pub fn group_of(self, other: Element) -> StarGroup {
        match (other.index() + 5 - self.index()) % 5 {
            0 => StarGroup::Peers,
            1 => StarGroup::Output,
            2 => StarGroup::Wealth,
            3 => StarGroup::Authority,
            _ => StarGroup::Resource,
        }
    }

    /// The element standing in `group` relative to `self`.
    pub fn element_of(self, group: StarGroup) -> Element {
        match group {
            StarGroup::Peers => self,
            StarGroup::Resource => self.mother(),
            StarGroup::Output => self.generates(),
            StarGroup::Wealth => self.overcomes(),
            StarGroup::Authority => self.controller(),
        }
    }

    pub fn hanzi(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanzi())
    }
}

/// The five relation groups an element can hold towards the day element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarGroup {
    /// Same element.
    Peers,
    /// Generates the day element.
    Resource,
    /// Generated by the day element.
    Output,
    /// Overcome by the day element.
    Wealth,
    /// Overcomes the day element.
    Authority,
}

impl StarGroup {
    pub const ALL: [StarGroup; 5] = [
        StarGroup::Peers,
        StarGroup::Resource,
        StarGroup::Output,
        StarGroup::Wealth,
        StarGroup::Authority,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

// ---------------------------
// ## Element Map
// ---------------------------

/// A total map from each element to a value, iterated in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementMap<T>([T; 5]);

impl<T> ElementMap<T> {
    pub fn from_fn(f: impl FnMut(Element) -> T) -> Self {
        ElementMap(Element::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, &T)> + '_ {
        Element::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }
}

impl<T> Index<Element> for ElementMap<T> {
    type Output = T;

    fn index(&self, element: Element) -> &T {
        &self.0[element.index()]
    }
}

impl<T> IndexMut<Element> for ElementMap<T> {
    fn index_mut(&mut self, element: Element) -> &mut T {
        &mut self.0[element.index()]
    }
}

impl<T: Serialize> Serialize for ElementMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

// ---------------------------
// ## Seasonal States
// ---------------------------

/// Strength an element holds in the season set by the month branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonalState {
    /// 旺
    Flourishing,
    /// 相
    Growing,
    /// 余, only Wood in a 辰 month.
    Surplus,
    /// 休
    Resting,
    /// 囚
    Restricted,
    /// 死
    Fading,
}

impl SeasonalState {
    pub fn hanzi(self) -> &'static str {
        match self {
            SeasonalState::Flourishing => "旺",
            SeasonalState::Growing => "相",
            SeasonalState::Surplus => "余",
            SeasonalState::Resting => "休",
            SeasonalState::Restricted => "囚",
            SeasonalState::Fading => "死",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            SeasonalState::Flourishing => "Strong / Flourishing",
            SeasonalState::Growing => "Supporting / Growing",
            SeasonalState::Surplus => "Lingering / Surplus",
            SeasonalState::Resting => "Resting / Receding",
            SeasonalState::Restricted => "Weak / Restricted",
            SeasonalState::Fading => "Dormant / Fading",
        }
    }
}

// ---------------------------
// ## Heavenly Stems
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stem at `index` in the ten-stem cycle, wrapping around.
    pub fn from_index(index: usize) -> Stem {
        Stem::ALL[index % 10]
    }

    pub fn element(self) -> Element {
        Element::ALL[self.index() / 2]
    }

    pub fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    /// The yang and yin stems carrying `element`.
    pub fn of_element(element: Element) -> [Stem; 2] {
        let yang = element.index() * 2;
        [Stem::ALL[yang], Stem::ALL[yang + 1]]
    }

    pub fn hanzi(self) -> char {
        match self {
            Stem::Jia => '甲',
            Stem::Yi => '乙',
            Stem::Bing => '丙',
            Stem::Ding => '丁',
            Stem::Wu => '戊',
            Stem::Ji => '己',
            Stem::Geng => '庚',
            Stem::Xin => '辛',
            Stem::Ren => '壬',
            Stem::Gui => '癸',
        }
    }

    pub fn pinyin(self) -> &'static str {
        match self {
            Stem::Jia => "jia",
            Stem::Yi => "yi",
            Stem::Bing => "bing",
            Stem::Ding => "ding",
            Stem::Wu => "wu",
            Stem::Ji => "ji",
            Stem::Geng => "geng",
            Stem::Xin => "xin",
            Stem::Ren => "ren",
            Stem::Gui => "gui",
        }
    }

    pub fn from_char(c: char) -> Option<Stem> {
        Stem::ALL.into_iter().find(|stem| stem.hanzi() == c)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanzi())
    }
}

impl FromStr for Stem {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let parsed = match (chars.next(), chars.next()) {
            (Some(c), None) => Stem::from_char(c),
            _ => None,
        };
        parsed.ok_or_else(|| BaziError::UnknownSymbol {
            kind: "stem",
            symbol: s.to_string(),
        })
    }
}

// ---------------------------
// ## Earthly Branches
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Branch at `index` in the twelve-branch cycle, wrapping around.
    pub fn from_index(index: usize) -> Branch {
        Branch::ALL[index % 12]
    }

    /// Stems hidden in this branch with their weights; weights sum to 1.0.
    pub fn hidden_stems(self) -> &'static [(Stem, f64)] {
        match self {
            Branch::Zi => &[(Stem::Gui, 1.0)],
            Branch::Chou => &[(Stem::Ji, 0.7), (Stem::Gui, 0.2), (Stem::Xin, 0.1)],
            Branch::Yin => &[(Stem::Jia, 0.7), (Stem::Bing, 0.2), (Stem::Wu, 0.1)],
            Branch::Mao => &[(Stem::Yi, 1.0)],
            Branch::Chen => &[(Stem::Wu, 0.7), (Stem::Yi, 0.2), (Stem::Gui, 0.1)],
            Branch::Si => &[(Stem::Bing, 0.7), (Stem::Geng, 0.2), (Stem::Wu, 0.1)],
            Branch::Wu => &[(Stem::Ding, 0.8), (Stem::Ji, 0.2)],
            Branch::Wei => &[(Stem::Ji, 0.7), (Stem::Ding, 0.2), (Stem::Yi, 0.1)],
            Branch::Shen => &[(Stem::Geng, 0.7), (Stem::Ren, 0.2), (Stem::Wu, 0.1)],
            Branch::You => &[(Stem::Xin, 1.0)],
            Branch::Xu => &[(Stem::Wu, 0.7), (Stem::Xin, 0.2), (Stem::Ding, 0.1)],
            Branch::Hai => &[(Stem::Ren, 0.8), (Stem::Jia, 0.2)],
        }
    }

    /// Seasonal state of every element when this branch rules the month.
    pub fn seasonal_states(self) -> ElementMap<SeasonalState> {
        use SeasonalState::*;

        // Wood, Fire, Earth, Metal, Water
        let states = match self {
            Branch::Yin | Branch::Mao => [Flourishing, Growing, Resting, Restricted, Fading],
            Branch::Chen => [Surplus, Flourishing, Growing, Resting, Restricted],
            Branch::Si | Branch::Wu => [Resting, Flourishing, Growing, Restricted, Fading],
            Branch::Wei => [Resting, Growing, Flourishing, Restricted, Fading],
            Branch::Shen | Branch::You => [Restricted, Fading, Resting, Flourishing, Growing],
            Branch::Xu => [Restricted, Resting, Flourishing, Growing, Fading],
            Branch::Hai | Branch::Zi => [Growing, Restricted, Fading, Resting, Flourishing],
            Branch::Chou => [Restricted, Fading, Flourishing, Growing, Resting],
        };
        ElementMap(states)
    }

    pub fn seasonal_state(self, element: Element) -> SeasonalState {
        self.seasonal_states()[element]
    }

    pub fn hanzi(self) -> char {
        match self {
            Branch::Zi => '子',
            Branch::Chou => '丑',
            Branch::Yin => '寅',
            Branch::Mao => '卯',
            Branch::Chen => '辰',
            Branch::Si => '巳',
            Branch::Wu => '午',
            Branch::Wei => '未',
            Branch::Shen => '申',
            Branch::You => '酉',
            Branch::Xu => '戌',
            Branch::Hai => '亥',
        }
    }

    pub fn pinyin(self) -> &'static str {
        match self {
            Branch::Zi => "zi",
            Branch::Chou => "chou",
            Branch::Yin => "yin",
            Branch::Mao => "mao",
            Branch::Chen => "chen",
            Branch::Si => "si",
            Branch::Wu => "wu",
            Branch::Wei => "wei",
            Branch::Shen => "shen",
            Branch::You => "you",
            Branch::Xu => "xu",
            Branch::Hai => "hai",
        }
    }

    pub fn from_char(c: char) -> Option<Branch> {
        Branch::ALL.into_iter().find(|branch| branch.hanzi() == c)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanzi())
    }
}

impl FromStr for Branch {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let parsed = match (chars.next(), chars.next()) {
            (Some(c), None) => Branch::from_char(c),
            _ => None,
        };
        parsed.ok_or_else(|| BaziError::UnknownSymbol {
            kind: "branch",
            symbol: s.to_string(),
        })
    }
}

// ---------------------------
// ## Pillars
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] = [
        PillarPosition::Year,
        PillarPosition::Month,
        PillarPosition::Day,
        PillarPosition::Hour,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Pillar { stem, branch }
    }

    /// Pillar at `index` in the sixty-pillar cycle (0 is 甲子).
    pub fn from_cycle_index(index: usize) -> Self {
        Pillar::new(Stem::from_index(index), Branch::from_index(index))
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for Pillar {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(stem), Some(branch), None) => Ok(Pillar::new(
                stem.to_string().parse()?,
                branch.to_string().parse()?,
            )),
            _ => Err(BaziError::MalformedPillar(format!(
                "expected a stem and a branch, got {s:?}"
            ))),
        }
    }
}

/// The four pillars of a chart. The day stem is the day master.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    pub fn new(year: Pillar, month: Pillar, day: Pillar, hour: Pillar) -> Self {
        FourPillars {
            year,
            month,
            day,
            hour,
        }
    }

    pub fn get(&self, position: PillarPosition) -> Pillar {
        match position {
            PillarPosition::Year => self.year,
            PillarPosition::Month => self.month,
            PillarPosition::Day => self.day,
            PillarPosition::Hour => self.hour,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PillarPosition, Pillar)> + '_ {
        PillarPosition::ALL
            .into_iter()
            .map(move |position| (position, self.get(position)))
    }

    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    /// The month branch sets the seasonal states of the whole chart.
    pub fn month_branch(&self) -> Branch {
        self.month.branch
    }
}

impl fmt::Display for FourPillars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

impl FromStr for FourPillars {
    type Err = BaziError;

    /// Parses four whitespace-separated pillars in year, month, day, hour order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pillars = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Pillar>, _>>()?;
        match pillars.as_slice() {
            [year, month, day, hour] => Ok(FourPillars::new(*year, *month, *day, *hour)),
            _ => Err(BaziError::MalformedPillar(format!(
                "expected 4 pillars, got {}",
                pillars.len()
            ))),
        }
    }
}
