use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_path: String,
    pub extracted: usize,
    pub written: usize,
    pub duplicates_removed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct WordlistEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> WordlistEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &SystemMonitor {
        &self.monitor
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Starting wordlist job...");

        tracing::info!("Extracting words...");
        let words = self.pipeline.extract().await?;
        let extracted = words.len();
        tracing::info!("Extracted {} words", extracted);
        self.monitor.record_stage("Extract", extracted);

        tracing::info!("Transforming words...");
        let result = self.pipeline.transform(words).await?;
        let written = result.words.len();
        let duplicates_removed = result.duplicates_removed;
        tracing::info!(
            "Transformed into {} words ({} duplicates removed)",
            written,
            duplicates_removed
        );
        self.monitor.record_stage("Transform", written);

        tracing::info!("Writing wordlist...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.record_stage("Load", written);
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            extracted,
            written,
            duplicates_removed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TransformResult;
    use crate::utils::error::WordlistError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct FakePipeline {
        loaded: Arc<Mutex<Vec<String>>>,
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for FakePipeline {
        async fn extract(&self) -> Result<Vec<String>> {
            if self.fail_extract {
                return Err(WordlistError::validation("no source"));
            }
            Ok(vec!["a".to_string(), "b".to_string(), "a".to_string()])
        }

        async fn transform(&self, words: Vec<String>) -> Result<TransformResult> {
            let input_count = words.len();
            let (words, removed) = crate::core::tools::dedup(words);
            Ok(TransformResult {
                words,
                input_count,
                duplicates_removed: removed,
            })
        }

        async fn load(&self, result: TransformResult) -> Result<String> {
            *self.loaded.lock().await = result.words;
            Ok("memory".to_string())
        }
    }

    #[tokio::test]
    async fn test_engine_runs_all_stages() {
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let engine = WordlistEngine::new(FakePipeline {
            loaded: loaded.clone(),
            fail_extract: false,
        });

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.output_path, "memory");
        assert_eq!(summary.extracted, 3);
        assert_eq!(summary.written, 2);
        assert_eq!(summary.duplicates_removed, 1);
        assert!(summary.finished_at >= summary.started_at);
        assert_eq!(*loaded.lock().await, vec!["a", "b"]);

        let stages: Vec<(String, usize)> = engine
            .monitor()
            .stages()
            .into_iter()
            .map(|s| (s.stage, s.words))
            .collect();
        assert_eq!(
            stages,
            vec![
                ("Extract".to_string(), 3),
                ("Transform".to_string(), 2),
                ("Load".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_engine_stops_on_extract_error() {
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let engine = WordlistEngine::new(FakePipeline {
            loaded: loaded.clone(),
            fail_extract: true,
        });

        assert!(engine.run().await.is_err());
        assert!(loaded.lock().await.is_empty());
    }
}
