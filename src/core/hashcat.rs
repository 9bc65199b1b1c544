use crate::utils::error::{Result, WordlistError};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum AttackMode {
    #[default]
    Straight,
    Combination,
    BruteForce,
    HybridWordlistMask,
    HybridMaskWordlist,
}

impl AttackMode {
    /// Value passed to `-a`.
    pub fn code(self) -> u8 {
        match self {
            AttackMode::Straight => 0,
            AttackMode::Combination => 1,
            AttackMode::BruteForce => 3,
            AttackMode::HybridWordlistMask => 6,
            AttackMode::HybridMaskWordlist => 7,
        }
    }
}

fn default_binary() -> String {
    "hashcat".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashcatConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default)]
    pub attack_mode: AttackMode,
    /// Hash type passed to `-m`, e.g. 0 for MD5.
    #[serde(default)]
    pub hash_type: u32,
    pub hash_file: PathBuf,
    #[serde(default)]
    pub wordlists: Vec<PathBuf>,
    pub mask: Option<String>,
    pub rules_file: Option<PathBuf>,
    pub outfile: Option<PathBuf>,
    pub potfile: Option<PathBuf>,
    pub status_timer: Option<u32>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl HashcatConfig {
    pub fn new(hash_file: impl Into<PathBuf>, hash_type: u32) -> Self {
        Self {
            binary: default_binary(),
            attack_mode: AttackMode::Straight,
            hash_type,
            hash_file: hash_file.into(),
            wordlists: Vec::new(),
            mask: None,
            rules_file: None,
            outfile: None,
            potfile: None,
            status_timer: None,
            extra_args: Vec::new(),
        }
    }

    fn mask(&self) -> Result<&str> {
        validate_required_field("hashcat.mask", &self.mask).map(String::as_str)
    }

    fn wordlist(&self, index: usize) -> Result<String> {
        self.wordlists
            .get(index)
            .map(|p| p.display().to_string())
            .ok_or_else(|| WordlistError::MissingConfigError {
                field: "hashcat.wordlists".to_string(),
            })
    }

    /// Command-line arguments, without the program name.
    pub fn args(&self) -> Result<Vec<String>> {
        let mut args = vec![
            "-a".to_string(),
            self.attack_mode.code().to_string(),
            "-m".to_string(),
            self.hash_type.to_string(),
        ];
        if let Some(timer) = self.status_timer {
            args.extend(["--status".to_string(), "--status-timer".to_string(), timer.to_string()]);
        }
        if let Some(rules) = &self.rules_file {
            args.extend(["-r".to_string(), rules.display().to_string()]);
        }
        if let Some(outfile) = &self.outfile {
            args.extend(["-o".to_string(), outfile.display().to_string()]);
        }
        if let Some(potfile) = &self.potfile {
            args.push(format!("--potfile-path={}", potfile.display()));
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(self.hash_file.display().to_string());

        match self.attack_mode {
            AttackMode::Straight => {
                if self.wordlists.is_empty() {
                    self.wordlist(0)?;
                }
                args.extend(self.wordlists.iter().map(|p| p.display().to_string()));
            }
            AttackMode::Combination => {
                args.push(self.wordlist(0)?);
                args.push(self.wordlist(1)?);
            }
            AttackMode::BruteForce => args.push(self.mask()?.to_string()),
            AttackMode::HybridWordlistMask => {
                args.push(self.wordlist(0)?);
                args.push(self.mask()?.to_string());
            }
            AttackMode::HybridMaskWordlist => {
                args.push(self.mask()?.to_string());
                args.push(self.wordlist(0)?);
            }
        }
        Ok(args)
    }
}

impl Validate for HashcatConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("hashcat.binary", &self.binary)?;
        if self.rules_file.is_some() && self.attack_mode != AttackMode::Straight {
            return Err(WordlistError::InvalidConfigValueError {
                field: "hashcat.rules_file".to_string(),
                value: format!("{:?}", self.attack_mode),
                reason: "rules files only apply to the straight attack mode".to_string(),
            });
        }
        self.args().map(|_| ())
    }
}

/// How a hashcat run ended, from its exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashcatOutcome {
    Cracked,
    Exhausted,
    Aborted,
    AbortedCheckpoint,
    AbortedRuntime,
    /// Killed by us or by a signal.
    Interrupted,
    Failed(i32),
}

impl HashcatOutcome {
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => HashcatOutcome::Cracked,
            Some(1) => HashcatOutcome::Exhausted,
            Some(2) => HashcatOutcome::Aborted,
            Some(3) => HashcatOutcome::AbortedCheckpoint,
            Some(4) => HashcatOutcome::AbortedRuntime,
            Some(other) => HashcatOutcome::Failed(other),
            None => HashcatOutcome::Interrupted,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, HashcatOutcome::Cracked | HashcatOutcome::Exhausted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
        }
    }
}

fn status_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\S.*?)\.{2,}:\s*(.*)$").expect("status pattern is valid"))
}

/// Parses `Key.......: value` status screen lines.
pub fn parse_status_line(line: &str) -> Option<(String, String)> {
    let caps = status_pattern().captures(line.trim_end())?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

/// Latest value seen for every status key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashcatStatus {
    pub fields: BTreeMap<String, String>,
}

impl HashcatStatus {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.get("Status")
    }

    pub fn recovered(&self) -> Option<&str> {
        self.get("Recovered")
    }

    pub fn progress(&self) -> Option<&str> {
        self.get("Progress")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrackedHash {
    pub hash: String,
    pub plain: String,
}

/// Parses `hash:plain` outfile lines. The split happens at the last colon,
/// so salted hashes keep their salt.
pub fn parse_outfile(content: &str) -> Vec<CrackedHash> {
    content
        .lines()
        .filter_map(|line| line.rsplit_once(':'))
        .map(|(hash, plain)| CrackedHash {
            hash: hash.to_string(),
            plain: plain.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct HashcatReport {
    pub outcome: HashcatOutcome,
    pub exit_code: Option<i32>,
    pub status: HashcatStatus,
    pub cracked: Vec<CrackedHash>,
    pub output_lines: usize,
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<OutputLine>, wrap: fn(String) -> OutputLine)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                // device names and cracked plains are not always UTF-8
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                if tx.send(wrap(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read hashcat output: {}", e);
                break;
            }
        }
    }
}

pub struct HashcatRunner {
    config: HashcatConfig,
}

impl HashcatRunner {
    pub fn new(config: HashcatConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HashcatConfig {
        &self.config
    }

    pub async fn run(&self, sink: Option<mpsc::UnboundedSender<OutputLine>>) -> Result<HashcatReport> {
        self.run_until(sink, std::future::pending()).await
    }

    /// Runs hashcat until it exits or `cancel` resolves, in which case the
    /// child is killed and the outcome is `Interrupted`.
    pub async fn run_until<F>(
        &self,
        sink: Option<mpsc::UnboundedSender<OutputLine>>,
        cancel: F,
    ) -> Result<HashcatReport>
    where
        F: Future<Output = ()>,
    {
        let args = self.config.args()?;
        tracing::info!("🔨 Launching {} {}", self.config.binary, args.join(" "));

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| WordlistError::ToolLaunchError {
                program: self.config.binary.clone(),
                source,
            })?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone(), OutputLine::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone(), OutputLine::Stderr));
        }
        drop(tx);

        tokio::pin!(cancel);
        let mut cancelled = false;
        let mut status = HashcatStatus::default();
        let mut output_lines = 0usize;

        loop {
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else { break };
                    output_lines += 1;
                    match &line {
                        OutputLine::Stdout(text) => {
                            tracing::debug!("hashcat: {}", text);
                            if let Some((key, value)) = parse_status_line(text) {
                                status.fields.insert(key, value);
                            }
                        }
                        OutputLine::Stderr(text) => tracing::warn!("hashcat: {}", text),
                    }
                    if let Some(sink) = &sink {
                        // a dropped receiver only means nobody is watching
                        let _ = sink.send(line);
                    }
                }
                _ = &mut cancel, if !cancelled => {
                    tracing::warn!("⏹️ Cancelling hashcat");
                    cancelled = true;
                    child.start_kill()?;
                }
            }
        }

        let exit = child.wait().await?;
        let outcome = if cancelled {
            HashcatOutcome::Interrupted
        } else {
            HashcatOutcome::from_exit_code(exit.code())
        };

        let cracked = match &self.config.outfile {
            Some(path) if path.exists() => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| WordlistError::file(path, e))?;
                parse_outfile(&content)
            }
            _ => Vec::new(),
        };

        tracing::info!(
            "hashcat finished: {:?} (exit code {:?}), {} cracked",
            outcome,
            exit.code(),
            cracked.len()
        );

        Ok(HashcatReport {
            outcome,
            exit_code: exit.code(),
            status,
            cracked,
            output_lines,
        })
    }
}
