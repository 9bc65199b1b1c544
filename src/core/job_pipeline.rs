use crate::config::job_config::{JobConfig, SourceConfig};
use crate::core::bruteforce::BruteForce;
use crate::core::combine::combine;
use crate::core::rules::{apply_rules, parse_rules_file};
use crate::core::scrape::Scraper;
use crate::core::{tools, wordlist_io, Pipeline, Storage, TransformResult};
use crate::domain::model::RuleSet;
use crate::utils::error::{Result, WordlistError};

/// Runs a TOML-described job: gather words from the source, combine and
/// transform them, then write the list through `Storage`.
pub struct JobPipeline<S: Storage> {
    storage: S,
    config: JobConfig,
}

impl<S: Storage> JobPipeline<S> {
    pub fn new(storage: S, config: JobConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    async fn read_words(&self, paths: &[String]) -> Result<Vec<String>> {
        let mut words = Vec::new();
        for path in paths {
            let data = self.storage.read_file(path).await?;
            let parsed = wordlist_io::parse_words(&data);
            tracing::debug!("Read {} words from {}", parsed.len(), path);
            words.extend(parsed);
        }
        Ok(words)
    }

    /// The configured rule set with any rules file merged in.
    async fn ruleset(&self) -> Result<Option<RuleSet>> {
        let Some(rules) = &self.config.rules else {
            return Ok(None);
        };
        let mut ruleset = rules.ruleset.clone();
        if let Some(path) = &rules.rules_file {
            let data = self.storage.read_file(path).await?;
            ruleset
                .rules
                .extend(parse_rules_file(&String::from_utf8_lossy(&data))?);
        }
        Ok(Some(ruleset))
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for JobPipeline<S> {
    async fn extract(&self) -> Result<Vec<String>> {
        match &self.config.source {
            SourceConfig::File { paths } => self.read_words(paths).await,
            SourceConfig::Inline { words } => Ok(words
                .iter()
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect()),
            SourceConfig::Bruteforce { charset, .. } => {
                let generator = BruteForce::new(charset)?;
                let limit = self.config.max_combinations();
                tracing::info!(
                    "Brute forcing {} combinations over {} characters",
                    generator.total(),
                    generator.alphabet().len()
                );
                tokio::task::spawn_blocking(move || generator.generate(limit))
                    .await
                    .map_err(|e| WordlistError::ProcessingError {
                        message: format!("Generator task failed: {}", e),
                    })?
            }
            SourceConfig::Scrape { url, .. } => {
                let scraper = Scraper::new(self.config.scrape_options())?;
                scraper.scrape(url).await
            }
        }
    }

    async fn transform(&self, words: Vec<String>) -> Result<TransformResult> {
        let input_count = words.len();

        let mut words = match &self.config.combine {
            Some(combine_config) => {
                let second = self.read_words(&combine_config.with).await?;
                tracing::debug!(
                    "Combining {} words with {} words ({:?})",
                    words.len(),
                    second.len(),
                    combine_config.mode
                );
                combine(&words, &second, combine_config.mode)?
            }
            None => words,
        };

        let mut duplicates_removed = 0;
        if let Some(ruleset) = self.ruleset().await? {
            // rule output is already unique, so repeated inputs are counted here
            if self.config.dedup_enabled() {
                let (unique, removed) = tools::dedup(words);
                words = unique;
                duplicates_removed += removed;
            }
            words = apply_rules(&words, &ruleset)?;
        }

        if self.config.dedup_enabled() {
            let (unique, removed) = tools::dedup(words);
            words = unique;
            duplicates_removed += removed;
        }
        if self.config.sort_enabled() {
            tools::sort(&mut words);
        }

        Ok(TransformResult {
            words,
            input_count,
            duplicates_removed,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output.path.clone();

        tracing::debug!("Writing {} words to {}", result.words.len(), output_path);
        self.storage
            .write_file(&output_path, &wordlist_io::to_bytes(&result.words))
            .await?;

        if let Some(rules_path) = &self.config.output.export_rules {
            if let Some(ruleset) = self.ruleset().await? {
                let lines = ruleset.to_hashcat_rules();
                tracing::info!("Exporting {} hashcat rules to {}", lines.len(), rules_path);
                self.storage
                    .write_file(rules_path, &wordlist_io::to_bytes(&lines))
                    .await?;
            } else {
                tracing::warn!("output.export_rules is set but the job has no [rules] section");
            }
        }

        Ok(output_path)
    }
}
