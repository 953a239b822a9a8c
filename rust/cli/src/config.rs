use gtolens_engine::pipeline::PipelineSettings;
use gtolens_engine::stakes::RAKE_TIERS;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub rake: u32,
    pub default_stack_bb: f64,
    pub hero: Option<String>,
    /// Solved-game store: a SQLite database, or a `.json` document.
    pub store: Option<String>,
    pub flop_decisions: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub rake: ValueSource,
    pub default_stack_bb: ValueSource,
    pub hero: ValueSource,
    pub store: ValueSource,
    pub flop_decisions: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            rake: ValueSource::Default,
            default_stack_bb: ValueSource::Default,
            hero: ValueSource::Default,
            store: ValueSource::Default,
            flop_decisions: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rake: 500,
            default_stack_bb: 100.0,
            hero: None,
            store: None,
            flop_decisions: false,
        }
    }
}

impl Config {
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            rake: self.rake,
            default_stack_bb: self.default_stack_bb,
            hero: self.hero.clone(),
            flop_decisions: self.flop_decisions,
        }
    }
}

/// Values given on the command line; they win over file and env.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rake: Option<u32>,
    pub default_stack_bb: Option<f64>,
    pub hero: Option<String>,
    pub store: Option<String>,
    pub flop_decisions: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_with_overrides(&Overrides::default())
}

pub fn load_with_overrides(overrides: &Overrides) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("GTOLENS_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.rake {
            cfg.rake = v;
            sources.rake = ValueSource::File;
        }
        if let Some(v) = f.default_stack_bb {
            cfg.default_stack_bb = v;
            sources.default_stack_bb = ValueSource::File;
        }
        if let Some(v) = f.hero {
            cfg.hero = Some(v);
            sources.hero = ValueSource::File;
        }
        if let Some(v) = f.store {
            cfg.store = Some(v);
            sources.store = ValueSource::File;
        }
        if let Some(v) = f.flop_decisions {
            cfg.flop_decisions = v;
            sources.flop_decisions = ValueSource::File;
        }
    }

    if let Ok(rake) = std::env::var("GTOLENS_RAKE")
        && !rake.is_empty()
    {
        cfg.rake = rake
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid rake: {}", rake)))?;
        sources.rake = ValueSource::Env;
    }
    if let Ok(stack) = std::env::var("GTOLENS_STACK_BB")
        && !stack.is_empty()
    {
        cfg.default_stack_bb = stack
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid stack: {}", stack)))?;
        sources.default_stack_bb = ValueSource::Env;
    }
    if let Ok(hero) = std::env::var("GTOLENS_HERO")
        && !hero.is_empty()
    {
        cfg.hero = Some(hero);
        sources.hero = ValueSource::Env;
    }
    if let Ok(store) = std::env::var("GTOLENS_STORE")
        && !store.is_empty()
    {
        cfg.store = Some(store);
        sources.store = ValueSource::Env;
    }
    if let Ok(flop) = std::env::var("GTOLENS_FLOP_DECISIONS")
        && !flop.is_empty()
    {
        cfg.flop_decisions = parse_bool(&flop)
            .ok_or_else(|| ConfigError::Invalid("Invalid flop_decisions".into()))?;
        sources.flop_decisions = ValueSource::Env;
    }

    if let Some(v) = overrides.rake {
        cfg.rake = v;
        sources.rake = ValueSource::Cli;
    }
    if let Some(v) = overrides.default_stack_bb {
        cfg.default_stack_bb = v;
        sources.default_stack_bb = ValueSource::Cli;
    }
    if let Some(v) = &overrides.hero {
        cfg.hero = Some(v.clone());
        sources.hero = ValueSource::Cli;
    }
    if let Some(v) = &overrides.store {
        cfg.store = Some(v.clone());
        sources.store = ValueSource::Cli;
    }
    // a bare switch can only turn flop decisions on
    if overrides.flop_decisions {
        cfg.flop_decisions = true;
        sources.flop_decisions = ValueSource::Cli;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    rake: Option<u32>,
    #[serde(default)]
    default_stack_bb: Option<f64>,
    #[serde(default)]
    hero: Option<String>,
    #[serde(default)]
    store: Option<String>,
    #[serde(default)]
    flop_decisions: Option<bool>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !RAKE_TIERS.contains(&cfg.rake) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: rake must be one of {:?}, got {}",
            RAKE_TIERS, cfg.rake
        )));
    }
    if !(cfg.default_stack_bb.is_finite() && cfg.default_stack_bb > 0.0) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: default_stack_bb must be >0".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
