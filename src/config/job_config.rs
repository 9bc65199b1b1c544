use crate::core::bruteforce::DEFAULT_MAX_COMBINATIONS;
use crate::core::hashcat::HashcatConfig;
use crate::core::scrape::ScrapeOptions;
use crate::domain::model::{CharsetSpec, CombineMode, RuleSet};
use crate::utils::error::{Result, WordlistError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobInfo,
    pub source: SourceConfig,
    pub rules: Option<RulesConfig>,
    pub combine: Option<CombineConfig>,
    pub output: OutputConfig,
    pub hashcat: Option<HashcatConfig>,
    pub monitoring: Option<MonitoringConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    File {
        paths: Vec<String>,
    },
    Inline {
        words: Vec<String>,
    },
    Bruteforce {
        charset: CharsetSpec,
        max_combinations: Option<u64>,
    },
    Scrape {
        url: String,
        min_length: Option<usize>,
        max_length: Option<usize>,
        lowercase: Option<bool>,
        include_meta: Option<bool>,
        timeout_seconds: Option<u64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(flatten)]
    pub ruleset: RuleSet,
    /// Extra rules in hashcat syntax, one per line.
    pub rules_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineConfig {
    #[serde(default)]
    pub mode: CombineMode,
    /// Files forming the second list.
    pub with: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub dedup: Option<bool>,
    pub sort: Option<bool>,
    /// Write the rule set as a hashcat `.rule` file here.
    pub export_rules: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl JobConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| WordlistError::file(path.as_ref(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| WordlistError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown variables untouched.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("output.path", &self.output.path)?;

        match &self.source {
            SourceConfig::File { paths } => {
                if paths.is_empty() {
                    return Err(WordlistError::MissingConfigError {
                        field: "source.paths".to_string(),
                    });
                }
                for path in paths {
                    validation::validate_path("source.paths", path)?;
                }
            }
            SourceConfig::Inline { words } => {
                if words.iter().all(|w| w.trim().is_empty()) {
                    return Err(WordlistError::MissingConfigError {
                        field: "source.words".to_string(),
                    });
                }
            }
            SourceConfig::Bruteforce {
                charset,
                max_combinations,
            } => {
                charset.validate()?;
                if let Some(limit) = max_combinations {
                    validation::validate_positive_number("source.max_combinations", *limit, 1)?;
                }
            }
            SourceConfig::Scrape { url, .. } => {
                validation::validate_url("source.url", url)?;
                if self.scrape_options().min_length > self.scrape_options().max_length {
                    return Err(WordlistError::InvalidConfigValueError {
                        field: "source.min_length".to_string(),
                        value: self.scrape_options().min_length.to_string(),
                        reason: "must not exceed source.max_length".to_string(),
                    });
                }
            }
        }

        if let Some(rules) = &self.rules {
            if let Some(path) = &rules.rules_file {
                validation::validate_path("rules.rules_file", path)?;
            } else {
                rules.ruleset.validate()?;
            }
        }

        if let Some(combine) = &self.combine {
            if combine.with.is_empty() {
                return Err(WordlistError::MissingConfigError {
                    field: "combine.with".to_string(),
                });
            }
        }

        if let Some(hashcat) = &self.hashcat {
            self.hashcat_config(hashcat).validate()?;
        }

        Ok(())
    }

    pub fn max_combinations(&self) -> u128 {
        match &self.source {
            SourceConfig::Bruteforce {
                max_combinations: Some(limit),
                ..
            } => *limit as u128,
            _ => DEFAULT_MAX_COMBINATIONS,
        }
    }

    pub fn scrape_options(&self) -> ScrapeOptions {
        let defaults = ScrapeOptions::default();
        match &self.source {
            SourceConfig::Scrape {
                min_length,
                max_length,
                lowercase,
                include_meta,
                timeout_seconds,
                ..
            } => ScrapeOptions {
                min_length: min_length.unwrap_or(defaults.min_length),
                max_length: max_length.unwrap_or(defaults.max_length),
                lowercase: lowercase.unwrap_or(defaults.lowercase),
                include_meta: include_meta.unwrap_or(defaults.include_meta),
                timeout_secs: timeout_seconds.unwrap_or(defaults.timeout_secs),
                user_agent: defaults.user_agent,
            },
            _ => defaults,
        }
    }

    /// The hashcat section with the job output as wordlist when none is given.
    pub fn hashcat_config(&self, hashcat: &HashcatConfig) -> HashcatConfig {
        let mut config = hashcat.clone();
        if config.wordlists.is_empty() {
            config.wordlists.push(self.output.path.clone().into());
        }
        config
    }

    pub fn dedup_enabled(&self) -> bool {
        self.output.dedup.unwrap_or(true)
    }

    pub fn sort_enabled(&self) -> bool {
        self.output.sort.unwrap_or(false)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn source_kind(&self) -> &'static str {
        match self.source {
            SourceConfig::File { .. } => "file",
            SourceConfig::Inline { .. } => "inline",
            SourceConfig::Bruteforce { .. } => "bruteforce",
            SourceConfig::Scrape { .. } => "scrape",
        }
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
