//! Bilingual rendering of a [`Report`].
//!
//! The engine only produces typed values. Every label, trace line, advisor
//! statement and prescription is turned into Chinese or English text here.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::advice::{Advice, Disposition};
use crate::advisor::Statement;
use crate::elements::round3;
use crate::strength::{Strength, StrengthReport};
use crate::symbols::{Element, Pillar, PillarPosition, SeasonalState};
use crate::ten_gods::{PillarTenGods, StemLabel, TenGod};
use crate::Report;

// ---------------------------
// ## Language
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    Chinese,
    English,
}

impl Language {
    fn pick(self, zh: &'static str, en: &'static str) -> &'static str {
        match self {
            Language::Chinese => zh,
            Language::English => en,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "cn" | "chinese" | "中文" => Ok(Language::Chinese),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unknown language {other:?}, expected zh or en")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pick("zh", "en"))
    }
}

// ---------------------------
// ## Localized Report
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedPillar {
    pub label: String,
    pub pillar: String,
    /// e.g. `己(土) + 卯(木)`
    pub elements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementLine {
    pub element: String,
    pub raw: f64,
    pub adjusted: f64,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodColumn {
    pub label: String,
    pub stem: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenGodWeight {
    pub ten_god: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedReport {
    pub language: Language,
    pub pillars: Vec<LocalizedPillar>,
    pub elements: Vec<ElementLine>,
    pub day_element: String,
    pub day_state: String,
    pub strength: String,
    pub strength_explanation: Vec<String>,
    pub ten_god_table: Vec<TenGodColumn>,
    pub ten_god_summary: Vec<TenGodWeight>,
    pub favored: Vec<String>,
    pub unfavored: Vec<String>,
    pub suggestion: Vec<String>,
    pub advice: Vec<String>,
}

impl Report {
    pub fn localize(&self, language: Language) -> LocalizedReport {
        let name = |e: Element| element_name(e, language).to_string();

        let pillars = self
            .elements
            .pillars
            .iter()
            .map(|p| {
                let pillar = Pillar::new(p.stem, p.branch);
                let separator = language.pick("", " and ");
                let hidden: Vec<&str> = p
                    .hidden_elements
                    .iter()
                    .map(|&e| element_name(e, language))
                    .collect();
                LocalizedPillar {
                    label: position_label(p.position, language).to_string(),
                    pillar: pillar_text(pillar, language),
                    elements: format!(
                        "{}({}) + {}({})",
                        p.stem,
                        element_name(p.stem_element, language),
                        p.branch,
                        hidden.join(separator)
                    ),
                }
            })
            .collect();

        let elements = Element::ALL
            .into_iter()
            .map(|e| ElementLine {
                element: name(e),
                raw: round3(self.elements.raw[e]),
                adjusted: self.elements.adjusted[e],
                state: state_name(self.elements.states[e], language).to_string(),
            })
            .collect();

        let ten_god_summary = TenGod::ALL
            .into_iter()
            .map(|tg| TenGodWeight {
                ten_god: ten_god_name(tg, language).to_string(),
                weight: round3(self.ten_god_summary.weight(tg)),
            })
            .collect();

        LocalizedReport {
            language,
            pillars,
            elements,
            day_element: name(self.strength.day_element),
            day_state: state_name(self.strength.day_state, language).to_string(),
            strength: strength_label(self.strength.strength, language).to_string(),
            strength_explanation: strength_trace(&self.strength, language),
            ten_god_table: self
                .ten_gods
                .pillars
                .iter()
                .map(|column| ten_god_column(column, language))
                .collect(),
            ten_god_summary,
            favored: self.suggestion.favored.iter().map(|&e| name(e)).collect(),
            unfavored: self.suggestion.unfavored.iter().map(|&e| name(e)).collect(),
            suggestion: self
                .suggestion
                .statements
                .iter()
                .map(|s| statement_text(s, language))
                .collect(),
            advice: self.advice.iter().map(|a| advice_text(a, language)).collect(),
        }
    }
}

// ---------------------------
// ## Labels
// ---------------------------

/// Numbers as the trace lines show them: `5.2`, `0.0`, `4.05`.
pub fn number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn element_name(element: Element, language: Language) -> &'static str {
    language.pick(element.hanzi(), element.english())
}

fn state_name(state: SeasonalState, language: Language) -> &'static str {
    language.pick(state.hanzi(), state.english())
}

fn ten_god_name(ten_god: TenGod, language: Language) -> &'static str {
    language.pick(ten_god.hanzi(), ten_god.english())
}

fn position_label(position: PillarPosition, language: Language) -> &'static str {
    match position {
        PillarPosition::Year => language.pick("年柱", "Year Pillar"),
        PillarPosition::Month => language.pick("月柱", "Month Pillar"),
        PillarPosition::Day => language.pick("日柱", "Day Pillar"),
        PillarPosition::Hour => language.pick("时柱", "Hour Pillar"),
    }
}

fn pillar_text(pillar: Pillar, language: Language) -> String {
    match language {
        Language::Chinese => pillar.to_string(),
        Language::English => format!(
            "{}({}){}({})",
            pillar.stem,
            pillar.stem.pinyin(),
            pillar.branch,
            pillar.branch.pinyin()
        ),
    }
}

fn strength_label(strength: Strength, language: Language) -> &'static str {
    match strength {
        Strength::Strong => language.pick("身强", "Strong"),
        Strength::Weak => language.pick("身弱", "Weak"),
        Strength::Neutral => language.pick("中和", "Neutral"),
    }
}

fn ten_god_column(column: &PillarTenGods, language: Language) -> TenGodColumn {
    let stem = match &column.label {
        StemLabel::Relation(tg) => ten_god_name(*tg, language).to_string(),
        StemLabel::DayMaster { gender: Some(g) } => match language {
            Language::Chinese => format!("元{g}"),
            Language::English => format!("Day Master ({g})"),
        },
        StemLabel::DayMaster { gender: None } => language.pick("日主", "Day Master").to_string(),
    };
    let branch = column
        .hidden
        .iter()
        .map(|h| format!("{}({})", ten_god_name(h.ten_god, language), number(h.weight)))
        .collect::<Vec<_>>()
        .join("; ");

    TenGodColumn {
        label: position_label(column.position, language).to_string(),
        stem,
        branch,
    }
}

// ---------------------------
// ## Strength Trace
// ---------------------------

fn strength_trace(report: &StrengthReport, language: Language) -> Vec<String> {
    let s = &report.stars;
    let (peers, resource, output, wealth, authority) = (
        number(s.peers),
        number(s.resource),
        number(s.output),
        number(s.wealth),
        number(s.authority),
    );
    let support = number(report.support);
    let resistance = number(report.resistance);

    let mut lines = match language {
        Language::Chinese => vec![
            format!("比劫 = {peers}"),
            format!("印星 = {resource}"),
            format!("助力合计 = {peers} + {resource} = {support}"),
            format!("食伤 = {output}"),
            format!("财星 = {wealth}"),
            format!("官杀 = {authority}"),
            format!("克泄合计 = {output} + {wealth} + {authority} = {resistance}"),
        ],
        Language::English => vec![
            format!("Stars of Peers (power of allies/competitors) = {peers}"),
            format!("Stars of Resource (power of support/learning) = {resource}"),
            format!("Stars of Support in Total = {peers} + {resource} = {support}"),
            format!("Stars of Output (power of creativity/expression) = {output}"),
            format!("Stars of Wealth (power of money/resources) = {wealth}"),
            format!("Stars of Authority (power of discipline/challenges) = {authority}"),
            format!("Stars of Resistance in Total = {output} + {wealth} + {authority} = {resistance}"),
        ],
    };

    let verdict = match (report.strength, language) {
        (Strength::Strong, Language::Chinese) => {
            format!("因为 助力 {support} 明显大于 克泄 {resistance}，所以日主偏强。")
        }
        (Strength::Weak, Language::Chinese) => {
            format!("因为 克泄 {resistance} 明显大于 助力 {support}，所以日主偏弱。")
        }
        (Strength::Neutral, Language::Chinese) => {
            format!("因为 助力 {support} 与 克泄 {resistance} 接近，所以日主中和。")
        }
        (Strength::Strong, Language::English) => format!(
            "Since Support Power {support} is significantly greater than Resistance Power {resistance}, the Day Master is considered Strong."
        ),
        (Strength::Weak, Language::English) => format!(
            "Since Resistance Power {resistance} is significantly greater than Support Power {support}, the Day Master is considered Weak."
        ),
        (Strength::Neutral, Language::English) => format!(
            "Since Support Power {support} and Resistance Power {resistance} are close, the Day Master is considered Neutral."
        ),
    };
    lines.push(verdict);
    lines
}

// ---------------------------
// ## Advisor Statements
// ---------------------------

pub fn statement_text(statement: &Statement, language: Language) -> String {
    match language {
        Language::Chinese => statement_zh(statement),
        Language::English => statement_en(statement),
    }
}

fn statement_zh(statement: &Statement) -> String {
    match statement {
        Statement::StrongBase => "日主偏强，应以制衡和泄耗为主。".to_string(),
        Statement::WealthFavorable { wealth } => format!("日主不弱，财星（{wealth}）为喜。"),
        Statement::WealthSuppressed { wealth } => {
            format!("财星（{wealth}）在命局中较弱，宜补财星。")
        }
        Statement::ResourceOverbearing { resource, .. } => {
            format!("印星（{resource}）在命局中过旺，导致财星被压制，宜补财星。")
        }
        Statement::WeakBase => "日主偏弱，应以扶助和生养为主。".to_string(),
        Statement::WealthUnbearable { wealth } => {
            format!("财星（{wealth}）在命局中过旺，而日主偏弱，难以承受，因此财星为忌。")
        }
        Statement::WealthManageable { wealth, resource } => format!(
            "财星（{wealth}）虽比日主强，但有印星帮扶，整体能驾驭财，财可为喜，但需要有印来护日主（{resource}）。"
        ),
        Statement::NeutralBase => "日主中和，五行能量相对均衡。".to_string(),
        Statement::MaxDraining { max, controller } => {
            format!("{max} 过旺，起到一定制衡和泄耗作用，可补充些许 {controller} 来制衡。")
        }
        Statement::MaxSupporting {
            max,
            controller,
            controller_mother,
        } => format!("{max} 过旺，起到扶助作用，可考虑补充 {controller} {controller_mother} 来缓冲克制；"),
        Statement::MaxNurturing {
            max,
            controller,
            controller_mother,
        } => format!("{max} 过旺，起到生养作用，可考虑补充 {controller} {controller_mother} 来缓冲克制；"),
        Statement::MaxWealth { max, resource } => format!(
            "财星（{max}）在命局中过旺，而日主偏弱，难以承受，因此财星为忌, 宜补印星（{resource}）来护日主。"
        ),
        Statement::MinSupport {
            min,
            mother: Some(mother),
        } => format!("五行最弱的是 {min}，起到扶助和生养作用，可适当补充 {min} 和 {mother}。"),
        Statement::MinSupport { min, mother: None } => {
            format!("五行最弱的是 {min}，起到扶助和生养作用，可适当补充 {min}。")
        }
        Statement::MinBalanced { min } => {
            format!("五行最弱的是 {min}，起到一定制衡和泄耗作用，无需特殊处理。")
        }
        Statement::MinAuthorityLacking { min } => {
            format!("五行最弱的是 {min}，如果官杀太小，命局缺少约束与规范，宜补官杀({min})。")
        }
        Statement::MinOutputLacking { min } => format!(
            "五行最弱的是 {min}，食伤表现了日主的才华、创造力、表达欲、子女运，同时是生财之源宜。如果食伤太小，宜补({min})。"
        ),
        Statement::MinWealth { min, wealth } => {
            format!("五行最弱的是 {min}，代表财星（{wealth}），宜补财星。")
        }
        Statement::FavoredSummary { favored } => {
            let names: Vec<&str> = favored.iter().map(|e| e.hanzi()).collect();
            format!("喜用神五行为: {}。", names.join(" "))
        }
    }
}

fn statement_en(statement: &Statement) -> String {
    match statement {
        Statement::StrongBase => {
            "The Day Master is strong, so balancing and releasing energy should be prioritized.".to_string()
        }
        Statement::WealthFavorable { .. } => {
            "The Day Master is not weak, so Stars of Wealth is favorable.".to_string()
        }
        Statement::WealthSuppressed { .. } => {
            "Stars of Wealth is relatively weak in the chart, so it should be reinforced.".to_string()
        }
        Statement::ResourceOverbearing { .. } => "Stars of Resource is overly strong, suppressing Stars of Wealth, so Stars of Wealth should be reinforced.".to_string(),
        Statement::WeakBase => {
            "The Day Master is weak, so assistance and nurturing should be prioritized.".to_string()
        }
        Statement::WealthUnbearable { .. } => "Stars of Wealth is overly strong in the chart, but the Day Master is weak and cannot bear it, so Stars of Wealth is considered unfavorable.".to_string(),
        Statement::WealthManageable { .. } => "Stars of Wealth is stronger than the Day Master, but with Stars of Resource's support, it can still be managed. In this case, Stars of Wealth can be favorable, but Stars of Resource is needed to protect the Day Master.".to_string(),
        Statement::NeutralBase => {
            "The Day Master is neutral, with the five elements relatively balanced.".to_string()
        }
        Statement::MaxDraining { max, controller } => format!(
            "{} is overly strong, providing control or draining effect. Consider adding some elements from {} to balance.",
            max.english(),
            controller.english()
        ),
        Statement::MaxSupporting {
            max,
            controller,
            controller_mother,
        } => format!(
            "{} is overly strong, giving extra support. Consider adding elements from {} and {} to soften its effect.",
            max.english(),
            controller.english(),
            controller_mother.english()
        ),
        Statement::MaxNurturing {
            max,
            controller,
            controller_mother,
        } => format!(
            "{} is overly strong, giving nurturing support. Consider adding elements from {} and {} to moderate it.",
            max.english(),
            controller.english(),
            controller_mother.english()
        ),
        Statement::MaxWealth { resource, .. } => format!(
            "Stars of Wealth is overly strong while the Day Master is weaker, making it unfavorable. Consider adding Stars of Resource ({}) to protect the Day Master.",
            resource.english()
        ),
        Statement::MinSupport {
            min,
            mother: Some(mother),
        } => format!(
            "The weakest element is {}, which provides support and nurturing. Consider adding some elements from {} and {}.",
            min.english(),
            min.english(),
            mother.english()
        ),
        Statement::MinSupport { min, mother: None } => format!(
            "The weakest element is {}, which provides support and nurturing. Consider adding some elements from {}.",
            min.english(),
            min.english()
        ),
        Statement::MinBalanced { min } => format!(
            "The weakest element is {}, giving some balance or draining effect. No special action needed.",
            min.english()
        ),
        Statement::MinAuthorityLacking { min } => format!(
            "The weakest element is {}. If Stars of Authority is too low, the chart lacks discipline. Consider adding elements from {}.",
            min.english(),
            min.english()
        ),
        Statement::MinOutputLacking { min } => format!(
            "The weakest element is {}. Output represents talent, creativity, expression, children, and the source of wealth, consider adding elements from {}.",
            min.english(),
            min.english()
        ),
        Statement::MinWealth { min, .. } => format!(
            "The weakest element is {}, representing Stars of Wealth. Consider adding elements from {}.",
            min.english(),
            min.english()
        ),
        Statement::FavoredSummary { favored } => {
            let names: Vec<&str> = favored.iter().map(|e| e.english()).collect();
            format!("Favored element(s): {}.", names.join("; "))
        }
    }
}

// ---------------------------
// ## Ten-God Prescriptions
// ---------------------------

pub fn advice_text(advice: &Advice, language: Language) -> String {
    let tg = advice.ten_god;
    match (advice.disposition, language) {
        (Disposition::Favorable, Language::Chinese) => {
            format!("喜{}：{}", tg.hanzi(), favorable_zh(tg))
        }
        (Disposition::Unfavorable, Language::Chinese) => {
            format!("忌{}：{}", tg.hanzi(), unfavorable_zh(tg))
        }
        (Disposition::Favorable, Language::English) => {
            format!("Favorable {}: {}", tg.english(), favorable_en(tg))
        }
        (Disposition::Unfavorable, Language::English) => {
            format!("Unfavorable {}: {}", tg.english(), unfavorable_en(tg))
        }
    }
}

fn favorable_zh(ten_god: TenGod) -> &'static str {
    match ten_god {
        TenGod::BiJian => "代表自我、兄弟、伙伴。喜比肩时，多合作、结交志同道合的人，可以增强自信和行动力",
        TenGod::JieCai => "代表朋友、同伴、竞争。喜劫财时，朋友能带来帮助和资源共享",
        TenGod::ZhengYin => "代表学习、贵人、保护。喜正印时，应多学习、提升学识，并依靠贵人支持",
        TenGod::PianYin => "代表灵感、创造、直觉。喜偏印时，有助于发展创造力、灵性与直觉",
        TenGod::ShiShen => "代表才华、子女、表达。喜食神时，应多发挥才华，注重表达与分享",
        TenGod::ShangGuan => "代表创造力、叛逆、表现。喜伤官时，可以勇于创新与表达自我",
        TenGod::ZhengCai => "代表财富、责任、配偶。喜正财时，宜脚踏实地、注重理财和责任",
        TenGod::PianCai => "代表机会、变通、人脉。喜偏财时，应抓住机会、灵活变通，注重人脉关系",
        TenGod::ZhengGuan => "代表事业、责任、纪律。喜正官时，守纪律、重责任，有助于事业发展",
        TenGod::QiSha => "代表挑战、竞争、魄力。喜七杀时，敢于挑战、果断有魄力，有助于开拓事业",
    }
}

fn unfavorable_zh(ten_god: TenGod) -> &'static str {
    match ten_god {
        TenGod::BiJian => "忌比肩时，容易固执，与人对抗，需避免争强好胜",
        TenGod::JieCai => "忌劫财时，易生竞争与冲突，需要学会分享与设立界限",
        TenGod::ZhengYin => "忌正印时，过于依赖他人，缺乏独立，需保持自主",
        TenGod::PianYin => "忌偏印时，容易不切实际或精神不安定，应脚踏实地",
        TenGod::ShiShen => "忌食神时，易懒散、贪图享乐，应自律",
        TenGod::ShangGuan => "忌伤官时，易冲动叛逆，与权威对抗，需控制情绪",
        TenGod::ZhengCai => "忌正财时，可能过于物质或劳累，应适度理财并平衡生活",
        TenGod::PianCai => "忌偏财时，易投机取巧、感情不稳，应谨慎理财与感情",
        TenGod::ZhengGuan => "忌正官时，容易受束缚或压力过大，应学会调适与放松",
        TenGod::QiSha => "忌七杀时，过度压力或冲动冒险，需谨慎行事",
    }
}

fn favorable_en(ten_god: TenGod) -> &'static str {
    match ten_god {
        TenGod::BiJian => "Represents self, siblings, and partners. When favorable, BiJian encourages cooperation and connecting with like-minded people, boosting confidence and initiative.",
        TenGod::JieCai => "Represents friends, companions, and competition. When favorable, JieCai means friends can bring help and share resources.",
        TenGod::ZhengYin => "Represents learning, mentors, and protection. When favorable, ZhengYin suggests focusing on study, knowledge growth, and support from benefactors.",
        TenGod::PianYin => "Represents inspiration, creativity, and intuition. When favorable, PianYin enhances imagination, spirituality, and intuitive insight.",
        TenGod::ShiShen => "Represents talent, children, and expression. When favorable, ShiShen encourages showcasing talents and sharing with others.",
        TenGod::ShangGuan => "Represents creativity, rebellion, and performance. When favorable, ShangGuan brings courage to innovate and express oneself boldly.",
        TenGod::ZhengCai => "Represents wealth, responsibility, and spouse. When favorable, ZhengCai emphasizes diligence, financial management, and responsibility.",
        TenGod::PianCai => "Represents opportunity, adaptability, and connections. When favorable, PianCai encourages seizing opportunities, flexibility, and building networks.",
        TenGod::ZhengGuan => "Represents career, responsibility, and discipline. When favorable, ZhengGuan supports following rules, taking responsibility, and career advancement.",
        TenGod::QiSha => "Represents challenges, competition, and drive. When favorable, QiSha brings courage, decisiveness, and the power to pioneer new paths.",
    }
}

fn unfavorable_en(ten_god: TenGod) -> &'static str {
    match ten_god {
        TenGod::BiJian => "When unfavorable, BiJian may cause stubbornness and conflict with others; avoid being overly competitive.",
        TenGod::JieCai => "When unfavorable, JieCai can bring rivalry and conflict; learn to share and set healthy boundaries.",
        TenGod::ZhengYin => "When unfavorable, ZhengYin may cause over-reliance on others and lack of independence; maintain autonomy.",
        TenGod::PianYin => "When unfavorable, PianYin may lead to unrealistic thinking or mental instability; stay grounded.",
        TenGod::ShiShen => "When unfavorable, ShiShen may cause laziness and indulgence in pleasure; practice self-discipline.",
        TenGod::ShangGuan => "When unfavorable, ShangGuan may cause impulsiveness, rebellion, and conflict with authority; control emotions.",
        TenGod::ZhengCai => "When unfavorable, ZhengCai may lead to materialism or overwork; manage finances wisely and seek balance.",
        TenGod::PianCai => "When unfavorable, PianCai may cause opportunism and unstable relationships; be cautious in money and love matters.",
        TenGod::ZhengGuan => "When unfavorable, ZhengGuan may bring restrictions or excessive pressure; learn to adjust and relax.",
        TenGod::QiSha => "When unfavorable, QiSha may cause excessive stress or reckless risk-taking; act with caution.",
    }
}
