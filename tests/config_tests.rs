use persona_affect_matrix::config::{CrazyModeConfig, PersistenceConfig};
use persona_affect_matrix::{ConfigError, EngineConfig, GradientConfig, InertiaConfig};
use std::io::Write;

#[test]
fn test_inertia_config() {
    let inertia = InertiaConfig::new(0.8, 0.25);
    assert_eq!(inertia.base_factor, 0.8);
    assert_eq!(inertia.heavy_scale, 0.25);
    assert!(inertia.validate().is_ok());

    let default = InertiaConfig::default();
    assert_eq!(default.base_factor, 0.5);
    assert_eq!(default.heavy_scale, 0.5);

    assert!(InertiaConfig::new(0.0, 0.5).validate().is_err());
    assert!(InertiaConfig::new(0.5, 1.5).validate().is_err());
}

#[test]
fn test_gradient_config() {
    let gradient = GradientConfig::default();
    assert_eq!(gradient.threshold, 20);
    assert_eq!(gradient.max_stops, 4);
    assert_eq!(gradient.angle_deg, 135);
    assert_eq!(gradient.min_lightness, 0.1);

    let broken = GradientConfig { max_stops: 0, ..GradientConfig::default() };
    assert!(broken.validate().is_err());
}

#[test]
fn test_engine_config_from_partial_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
        [inertia]
        base_factor = 0.6

        [persistence]
        storage_key = "companion"
        "#,
    )
    .unwrap();

    assert_eq!(config.inertia.base_factor, 0.6);
    assert_eq!(config.inertia.heavy_scale, 0.5);
    assert_eq!(config.persistence.storage_key, "companion");
    assert_eq!(config.persistence.history_limit, PersistenceConfig::default().history_limit);
    assert_eq!(config.crazy_mode, CrazyModeConfig::default());
    assert_eq!(config.gradient, GradientConfig::default());
}

#[test]
fn test_engine_config_rejects_invalid_values() {
    let result = EngineConfig::from_toml_str("[crazy_mode]\ninterval_ms = 0\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let result = EngineConfig::from_toml_str("[inertia]\nbase_factor = \"fast\"\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_engine_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[gradient]\nthreshold = 35\nmax_stops = 3").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.gradient.threshold, 35);
    assert_eq!(config.gradient.max_stops, 3);

    let missing = EngineConfig::load(file.path().with_extension("missing"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}
