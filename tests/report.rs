use std::collections::BTreeSet;

use approx::assert_relative_eq;
use bazi_core::{
    BaziError, BirthInfo, BirthRequest, Disposition, Element, EngineConfig, FourPillars, Language,
    Report, SexagenaryCalendar, Stem, Statement, Strength, TenGod,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn new_year_2000() -> BirthInfo {
    BirthInfo::parse("2000-01-01", "12:00", "Asia/Shanghai", "男").unwrap()
}

#[test]
fn full_pipeline_for_a_known_birth() {
    let config = EngineConfig::default();
    let report = Report::calculate(&new_year_2000(), &SexagenaryCalendar::default(), &config).unwrap();

    assert_eq!(report.pillars.to_string(), "己卯 丙子 戊午 戊午");
    assert_eq!(report.day_master, Stem::Wu);
    assert_eq!(report.gender.as_deref(), Some("男"));

    let strength = &report.strength;
    assert_eq!(strength.day_element, Element::Earth);
    assert_relative_eq!(strength.stars.peers, 5.2);
    assert_relative_eq!(strength.stars.resource, 4.05);
    assert_relative_eq!(strength.stars.output, 0.0);
    assert_relative_eq!(strength.stars.wealth, 4.55);
    assert_relative_eq!(strength.stars.authority, 0.6);
    assert_relative_eq!(strength.support, 9.25);
    assert_relative_eq!(strength.resistance, 5.15);
    assert_eq!(strength.strength, Strength::Strong);

    let favored: BTreeSet<Element> = [Element::Metal, Element::Water].into();
    let unfavored: BTreeSet<Element> = [Element::Fire, Element::Earth].into();
    assert_eq!(report.suggestion.favored, favored);
    assert_eq!(report.suggestion.unfavored, unfavored);
    assert_eq!(
        report.suggestion.statements,
        vec![
            Statement::StrongBase,
            Statement::WealthFavorable {
                wealth: Element::Water
            },
            Statement::FavoredSummary {
                favored: vec![Element::Metal, Element::Water]
            },
        ]
    );

    let advice: Vec<(Disposition, TenGod)> = report
        .advice
        .iter()
        .map(|a| (a.disposition, a.ten_god))
        .collect();
    assert_eq!(
        advice,
        vec![
            (Disposition::Favorable, TenGod::ShiShen),
            (Disposition::Favorable, TenGod::ShangGuan),
            (Disposition::Favorable, TenGod::PianCai),
            (Disposition::Favorable, TenGod::ZhengCai),
            (Disposition::Unfavorable, TenGod::PianYin),
            (Disposition::Unfavorable, TenGod::ZhengYin),
            (Disposition::Unfavorable, TenGod::BiJian),
            (Disposition::Unfavorable, TenGod::JieCai),
        ]
    );
}

#[test]
fn calculated_and_direct_reports_agree() {
    let config = EngineConfig::default();
    let resolved = Report::calculate(&new_year_2000(), &SexagenaryCalendar::default(), &config).unwrap();
    let direct = Report::from_pillars(&resolved.pillars, Some("男"), &config);

    assert_eq!(direct.elements, resolved.elements);
    assert_eq!(direct.strength, resolved.strength);
    assert_eq!(direct.ten_god_summary, resolved.ten_god_summary);
    assert_eq!(direct.suggestion, resolved.suggestion);
    assert!(direct.birth.is_none());
    assert!(resolved.birth.is_some());
}

#[rstest]
#[case("己卯 丙子 戊午 戊午")]
#[case("辛未 乙未 癸丑 己未")]
#[case("庚申 甲申 壬戌 辛亥")]
#[case("甲辰 丙寅 甲辰 庚午")]
#[case("癸亥 癸亥 癸亥 癸亥")]
fn report_invariants_hold(#[case] chart: &str) {
    let pillars: FourPillars = chart.parse().unwrap();
    let report = Report::from_pillars(&pillars, None, &EngineConfig::default());

    let raw_total: f64 = report.elements.raw.values().sum();
    assert_relative_eq!(raw_total, 15.0, epsilon = 1e-9);
    assert_relative_eq!(report.ten_god_summary.total(), 6.0, epsilon = 1e-9);

    let expected_advice = 2 * (report.suggestion.favored.len() + report.suggestion.unfavored.len());
    assert_eq!(report.advice.len(), expected_advice);

    for (element, &adjusted) in report.elements.adjusted.iter() {
        assert!(adjusted >= 0.0, "{element} scored {adjusted}");
    }
}

#[test]
fn serializes_canonical_json() {
    let report = new_year_2000().generate_report().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["day_master"], "Wu");
    assert_eq!(json["strength"]["strength"], "Strong");
    assert_eq!(json["elements"]["adjusted"]["Earth"], 5.2);
    assert_eq!(json["suggestion"]["statements"][0]["rule"], "strong_base");
    assert_eq!(json["resolved"]["reference_timezone"], "Asia/Shanghai");
    assert_eq!(json["birth"]["timezone"], "Asia/Shanghai");
}

#[test]
fn localizes_both_languages() {
    let report = new_year_2000().generate_report().unwrap();

    let zh = report.localize(Language::Chinese);
    assert_eq!(zh.strength, "身强");
    assert_eq!(zh.ten_god_table[2].stem, "元男");

    let en = report.localize(Language::English);
    assert_eq!(en.strength, "Strong");
    assert_eq!(en.ten_god_table[2].stem, "Day Master (男)");
    assert_eq!(
        en.suggestion[0],
        "The Day Master is strong, so balancing and releasing energy should be prioritized."
    );
}

#[test]
fn birth_request_deserializes_from_json() {
    let request: BirthRequest = serde_json::from_str(
        r#"{"birth": "1999-12-31", "time": "20:00", "tz": "America/New_York"}"#,
    )
    .unwrap();
    let info = BirthInfo::try_from(request).unwrap();
    let report = info.generate_report().unwrap();

    assert_eq!(report.pillars.to_string(), "己卯 丙子 戊午 丁巳");
    assert_eq!(report.gender, None);
}

#[test]
fn malformed_chart_is_a_client_error() {
    let err = "己卯 丙子 戊午".parse::<FourPillars>().unwrap_err();
    assert!(err.is_client_error());

    let err = "己卯 丙子 戊X 戊午".parse::<FourPillars>().unwrap_err();
    assert!(matches!(err, BaziError::UnknownSymbol { .. }));
}

#[test]
fn configuration_changes_the_verdict() {
    let pillars: FourPillars = "己卯 丙子 戊午 戊午".parse().unwrap();
    let mut config = EngineConfig::default();
    config.thresholds.strong_ratio = 2.0;

    let report = Report::from_pillars(&pillars, None, &config);
    assert_eq!(report.strength.strength, Strength::Neutral);
    assert_eq!(report.suggestion.statements[0], Statement::NeutralBase);
}
