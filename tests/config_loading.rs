use bazi_core::config::EngineConfig;
use bazi_core::ConfigError;
use figment::Jail;

#[test]
fn toml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bazi.toml",
            r#"
            [position]
            month_branch = 4.0

            [thresholds]
            strong_ratio = 1.2
            "#,
        )?;

        let config = EngineConfig::load().expect("config loads");
        assert_eq!(config.position.month_branch, 4.0);
        assert_eq!(config.position.month_stem, 1.5);
        assert_eq!(config.thresholds.strong_ratio, 1.2);
        assert_eq!(config.calendar.reference_timezone, "Asia/Shanghai");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("bazi.toml", "[state]\nflourishing = 1.4\n")?;
        jail.set_env("BAZI_STATE__FLOURISHING", "1.5");
        jail.set_env("BAZI_CALENDAR__REFERENCE_TIMEZONE", "Asia/Taipei");

        let config = EngineConfig::load().expect("config loads");
        assert_eq!(config.state.flourishing, 1.5);
        assert_eq!(config.calendar.reference_timezone, "Asia/Taipei");
        Ok(())
    });
}

#[test]
fn explicit_file_is_used() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[thresholds]\ndominant_star_ratio = 3.0\n")?;

        let config = EngineConfig::load_from("custom.toml").expect("config loads");
        assert_eq!(config.thresholds.dominant_star_ratio, 3.0);
        Ok(())
    });
}

#[test]
fn missing_file_falls_back_to_defaults() {
    Jail::expect_with(|_jail| {
        let config = EngineConfig::load().expect("config loads");
        assert_eq!(config, EngineConfig::default());
        Ok(())
    });
}

#[test]
fn invalid_values_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("bazi.toml", "[state]\nfading = 1.1\n")?;

        let err = EngineConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "state.fading"));
        Ok(())
    });
}

#[test]
fn malformed_values_surface_figment_errors() {
    Jail::expect_with(|jail| {
        jail.set_env("BAZI_POSITION__DAY_STEM", "heavy");

        let err = EngineConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
