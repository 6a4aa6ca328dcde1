use anyhow::{anyhow, Context as AnyhowContext, Result};
use apery_graph::{AnalysisConfig, SolverConfig, MAX_CLOSURE_BOUND};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub(crate) const CONFIG_ENV: &str = "APERY_CONFIG";
pub(crate) const CLOSURE_BOUND_ENV: &str = "APERY_CLOSURE_BOUND";
pub(crate) const MAX_MODULUS_ENV: &str = "APERY_MAX_MODULUS";
pub(crate) const PARALLEL_MIN_CANDIDATES_ENV: &str = "APERY_PARALLEL_MIN_CANDIDATES";

/// Largest modulus the adapters will hand to the exact search by default.
pub const DEFAULT_MAX_MODULUS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub max_modulus: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            max_modulus: DEFAULT_MAX_MODULUS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    closure_bound: Option<u64>,
    max_modulus: Option<u64>,
    parallel_min_candidates: Option<usize>,
}

impl AppConfig {
    /// Defaults, then the config file (`--config` or `APERY_CONFIG`), then
    /// `APERY_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    pub(crate) fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

        let mut raw = match &path {
            Some(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                parse_raw(&bytes).with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => RawConfig::default(),
        };

        if let Some(value) = env_value(&lookup, CLOSURE_BOUND_ENV)? {
            raw.closure_bound = Some(value);
        }
        if let Some(value) = env_value(&lookup, MAX_MODULUS_ENV)? {
            raw.max_modulus = Some(value);
        }
        if let Some(value) = env_value(&lookup, PARALLEL_MIN_CANDIDATES_ENV)? {
            raw.parallel_min_candidates = Some(value);
        }

        let config = merge(raw)?;
        log::debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}

fn merge(raw: RawConfig) -> Result<AppConfig> {
    let defaults = AppConfig::default();
    let closure_bound = raw.closure_bound.unwrap_or(defaults.analysis.closure_bound);
    if closure_bound > MAX_CLOSURE_BOUND {
        anyhow::bail!("closure_bound {closure_bound} exceeds the maximum of {MAX_CLOSURE_BOUND}");
    }
    let parallel_min_candidates = raw
        .parallel_min_candidates
        .unwrap_or(defaults.analysis.solver.parallel_min_candidates);
    if parallel_min_candidates == 0 {
        anyhow::bail!("parallel_min_candidates must be at least 1");
    }

    Ok(AppConfig {
        analysis: AnalysisConfig {
            closure_bound,
            solver: SolverConfig {
                parallel_min_candidates,
            },
        },
        max_modulus: raw.max_modulus.unwrap_or(defaults.max_modulus),
    })
}

fn env_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|err| anyhow!("{key}={raw:?} is not a valid number: {err}"))
}

fn parse_raw(bytes: &[u8]) -> Result<RawConfig> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML config to JSON: {err}"))?
        }
    };

    serde_json::from_value(value).map_err(|err| anyhow!("Config parse error: {err}"))
}
