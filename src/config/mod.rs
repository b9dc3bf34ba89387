pub mod engine_config;

pub use engine_config::{
    ConfigError, CrazyModeConfig, EngineConfig, GradientConfig, InertiaConfig, PersistenceConfig,
};
