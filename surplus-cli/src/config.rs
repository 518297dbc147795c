//! Application configuration management.
//!
//! Configuration is merged from default values, an optional TOML file and
//! environment variables, in increasing order of precedence.

use crate::CliError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use surplus_solver::{Settings, charts::ChartConfig};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// How charts are to be rendered (sampling density, fonts, resolution)
    #[serde(default)]
    pub chart: ChartConfig,

    /// Numerical settings for the solver
    #[serde(default)]
    pub solver: Settings,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given on the command line
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `APP_<SECTION>__<KEY>` to `<section>.<key>`. Font families are a
    /// comma-separated list:
    ///
    /// ```bash
    /// export APP_CHART__SAMPLES=500
    /// export APP_CHART__FONT_FAMILIES="Noto Sans CJK SC,DejaVu Sans"
    /// export APP_SOLVER__TOLERANCE=1e-12
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(CliError::MissingConfig(path.to_path_buf()))?;
            }
        }

        config = config.add_source(Self::environment());

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("chart.font_families")
    }
}
