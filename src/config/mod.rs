pub mod job_config;
pub mod storage;

#[cfg(feature = "cli")]
use crate::core::hashcat::AttackMode;
#[cfg(feature = "cli")]
use crate::domain::model::{CharClass, CombineMode};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "wlaio")]
#[command(about = "Generate, transform, combine and scrape wordlists, and feed them to hashcat")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Enumerate every string over a character set within a length range
    Generate(GenerateArgs),
    /// Apply transformation rules to a group of words
    Rules(RulesArgs),
    /// Combine two wordlists
    Combine(CombineArgs),
    /// Join every ordering of a few words, with optional variations
    Permute(PermuteArgs),
    /// Extract candidate words from a single web page
    Scrape(ScrapeArgs),
    /// Remove duplicate words, keeping the first occurrence
    Dedup(FileArgs),
    /// Sort by length, then alphabetically
    Sort(FileArgs),
    /// Show wordlist statistics
    Stats(StatsArgs),
    /// Run hashcat against a hash file
    Crack(CrackArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Write here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(short, long, value_enum, value_delimiter = ',', required_unless_present = "custom")]
    pub charset: Vec<CharClass>,

    /// Extra characters appended to the alphabet
    #[arg(long, default_value = "")]
    pub custom: String,

    /// Sets both --min-length and --max-length
    #[arg(short, long, conflicts_with_all = ["min_length", "max_length"])]
    pub length: Option<usize>,

    #[arg(long, default_value = "1")]
    pub min_length: usize,

    #[arg(long, default_value = "4")]
    pub max_length: usize,

    #[arg(long, default_value = "1000000")]
    pub max_combinations: u128,

    /// Stream even when above --max-combinations
    #[arg(long)]
    pub force: bool,

    /// Only print how many words would be generated
    #[arg(long)]
    pub estimate: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct RuleFlags {
    #[arg(long)]
    pub leet: bool,
    #[arg(long = "case")]
    pub case_variations: bool,
    #[arg(long)]
    pub append_numbers: bool,
    #[arg(long)]
    pub prepend_numbers: bool,
    #[arg(long)]
    pub append_special: bool,
    #[arg(long)]
    pub prepend_special: bool,

    /// Raw hashcat rule, may be repeated
    #[arg(long = "hashcat-rule")]
    pub hashcat_rules: Vec<String>,

    /// Hashcat rules file to apply as well
    #[arg(long)]
    pub rules_file: Option<PathBuf>,

    /// Number affixes, replacing the defaults
    #[arg(long, value_delimiter = ',')]
    pub numbers: Vec<String>,

    /// Special character affixes, replacing the defaults
    #[arg(long, value_delimiter = ',')]
    pub specials: Vec<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct RulesArgs {
    /// Comma separated words
    #[arg(short, long, required_unless_present = "input")]
    pub words: Option<String>,

    /// Read words from a wordlist file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub rules: RuleFlags,

    /// Also write the rule set as a hashcat .rule file
    #[arg(long)]
    pub export_rules: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CombineArgs {
    pub first: PathBuf,
    pub second: PathBuf,

    #[arg(short, long, value_enum, default_value = "append")]
    pub mode: CombineMode,

    /// Rules applied to the combined words, if any are selected
    #[command(flatten)]
    pub rules: RuleFlags,

    #[arg(long)]
    pub dedup: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct PermuteArgs {
    /// Comma separated words
    #[arg(short, long)]
    pub words: String,

    #[arg(long = "case")]
    pub case_words: bool,
    #[arg(long)]
    pub leet: bool,
    #[arg(long)]
    pub append_numbers: bool,
    #[arg(long)]
    pub prepend_numbers: bool,
    #[arg(long)]
    pub append_special: bool,
    #[arg(long)]
    pub prepend_special: bool,
    /// Also pair each joined word with every input word
    #[arg(long)]
    pub combine_words: bool,

    #[arg(long)]
    pub dedup: bool,

    /// Only print the size and time estimate
    #[arg(long)]
    pub estimate: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    pub url: String,

    #[arg(long, default_value = "3")]
    pub min_length: usize,

    #[arg(long, default_value = "32")]
    pub max_length: usize,

    #[arg(long)]
    pub lowercase: bool,

    /// Ignore meta tags and image alt text
    #[arg(long)]
    pub no_meta: bool,

    #[arg(long, default_value = "15")]
    pub timeout: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    pub input: PathBuf,

    #[arg(long)]
    pub json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CrackArgs {
    #[arg(long)]
    pub hash_file: PathBuf,

    /// Hashcat hash mode (-m)
    #[arg(short = 'm', long, default_value = "0")]
    pub hash_type: u32,

    #[arg(short = 'a', long, value_enum, default_value = "straight")]
    pub attack_mode: AttackMode,

    #[arg(short, long)]
    pub wordlist: Vec<PathBuf>,

    #[arg(long)]
    pub mask: Option<String>,

    #[arg(short, long)]
    pub rules_file: Option<PathBuf>,

    #[arg(long)]
    pub outfile: Option<PathBuf>,

    #[arg(long)]
    pub potfile: Option<PathBuf>,

    #[arg(long, default_value = "hashcat")]
    pub binary: String,

    #[arg(long)]
    pub status_timer: Option<u32>,

    /// Passed through to hashcat unchanged
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}
