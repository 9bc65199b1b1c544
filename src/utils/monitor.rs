use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Word count and resources seen at the end of one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSample {
    pub stage: String,
    pub words: usize,
    pub elapsed: Duration,
    /// `None` when monitoring is off or the process could not be sampled.
    pub memory_mb: Option<u64>,
    pub cpu_usage: Option<f32>,
}

impl StageSample {
    pub fn words_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.words as f64 / secs
        } else {
            0.0
        }
    }
}

/// Tracks how many words each stage produced. With `enabled` it also samples
/// CPU and memory of the current process and keeps the peak.
pub struct SystemMonitor {
    #[cfg(feature = "cli")]
    system: Mutex<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    start_time: Instant,
    samples: Mutex<Vec<StageSample>>,
    peak_memory_mb: Mutex<u64>,
    enabled: bool,
}

impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            #[cfg(feature = "cli")]
            system: Mutex::new(System::new_with_specifics(RefreshKind::everything())),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            start_time: Instant::now(),
            samples: Mutex::new(Vec::new()),
            peak_memory_mb: Mutex::new(0),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Memory in MB and CPU percentage of this process.
    #[cfg(feature = "cli")]
    fn sample_process(&self) -> Option<(u64, f32)> {
        if !self.enabled {
            return None;
        }
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid?)?;
        Some((process.memory() / 1024 / 1024, process.cpu_usage()))
    }

    #[cfg(not(feature = "cli"))]
    fn sample_process(&self) -> Option<(u64, f32)> {
        None
    }

    /// Records the word count a stage ended with and logs it when enabled.
    pub fn record_stage(&self, stage: &str, words: usize) {
        let process = self.sample_process();
        let sample = StageSample {
            stage: stage.to_string(),
            words,
            elapsed: self.start_time.elapsed(),
            memory_mb: process.map(|(memory, _)| memory),
            cpu_usage: process.map(|(_, cpu)| cpu),
        };

        let peak = match (sample.memory_mb, self.peak_memory_mb.lock()) {
            (Some(memory), Ok(mut peak)) => {
                *peak = (*peak).max(memory);
                *peak
            }
            (_, Ok(peak)) => *peak,
            (_, Err(_)) => 0,
        };

        if self.enabled {
            match (sample.memory_mb, sample.cpu_usage) {
                (Some(memory), Some(cpu)) => tracing::info!(
                    "📊 {} - {} words, CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                    stage,
                    words,
                    cpu,
                    memory,
                    peak,
                    sample.elapsed
                ),
                _ => tracing::info!("📊 {} - {} words, Time: {:?}", stage, words, sample.elapsed),
            }
        }

        if let Ok(mut samples) = self.samples.lock() {
            samples.push(sample);
        }
    }

    pub fn stages(&self) -> Vec<StageSample> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }

    pub fn peak_memory_mb(&self) -> u64 {
        self.peak_memory_mb.lock().map(|peak| *peak).unwrap_or(0)
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        match self.stages().last() {
            Some(last) => tracing::info!(
                "📊 Final Stats - Total Time: {:?}, {} words ({:.0} words/s), Peak Memory: {}MB",
                last.elapsed,
                last.words,
                last.words_per_second(),
                self.peak_memory_mb()
            ),
            None => {
                let memory = self
                    .sample_process()
                    .map(|(memory, _)| memory)
                    .unwrap_or(0)
                    .max(self.peak_memory_mb());
                tracing::info!(
                    "📊 Final Stats - Total Time: {:?}, Memory: {}MB",
                    self.start_time.elapsed(),
                    memory
                )
            }
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
