use clap::Parser;
use std::path::PathBuf;
use wlaio::app::commands::run_hashcat;
use wlaio::config::job_config::{JobConfig, SourceConfig};
use wlaio::core::bruteforce::BruteForce;
use wlaio::core::hashcat::HashcatRunner;
use wlaio::utils::{logger, validation::Validate};
use wlaio::{JobPipeline, LocalStorage, WordlistEngine, WordlistError};

#[derive(Parser)]
#[command(name = "wordlist-job")]
#[command(about = "Build a wordlist from a TOML job file and optionally hand it to hashcat")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "wordlist-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run summary here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Build the wordlist but skip the [hashcat] section
    #[arg(long)]
    no_crack: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting wordlist job");
    tracing::info!("📁 Loading job from: {}", args.config);

    let config = match JobConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load job file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        fail(e);
    }

    tracing::info!("✅ Job loaded and validated successfully");
    display_job_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No words will be written");
        if let Err(e) = perform_dry_run(&config) {
            fail(e);
        }
        return;
    }

    if let Err(e) = run_job(config, &args).await {
        fail(e);
    }
}

async fn run_job(config: JobConfig, args: &Args) -> wlaio::Result<()> {
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let hashcat = config.hashcat.as_ref().map(|h| config.hashcat_config(h));

    let storage = LocalStorage::new(".");
    let pipeline = JobPipeline::new(storage, config);
    let engine = WordlistEngine::new_with_monitoring(pipeline, monitor_enabled);

    let summary = engine.run().await?;
    tracing::info!("✅ Wordlist job completed successfully!");
    println!("✅ Wrote {} words to {}", summary.written, summary.output_path);
    if summary.duplicates_removed > 0 {
        println!("🧹 Removed {} duplicates", summary.duplicates_removed);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).map_err(|e| WordlistError::file(path, e))?;
        tracing::info!("📝 Run summary written to {}", path.display());
    }

    match hashcat {
        Some(_) if args.no_crack => {
            tracing::info!("Skipping hashcat (--no-crack)");
            Ok(())
        }
        Some(hashcat) => run_hashcat(&HashcatRunner::new(hashcat)?).await,
        None => Ok(()),
    }
}

fn fail(e: WordlistError) -> ! {
    tracing::error!(
        "❌ Wordlist job failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // Low severity still counts as a failed job here
    std::process::exit(e.exit_code().max(1));
}

fn display_job_summary(config: &JobConfig, args: &Args) {
    println!("📋 Job Summary:");
    match &config.job.version {
        Some(version) => println!("  Job: {} v{}", config.job.name, version),
        None => println!("  Job: {}", config.job.name),
    }
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source_kind());
    println!("  Output: {}", config.output.path);
    println!("  Dedup: {}", config.dedup_enabled());
    println!("  Sort: {}", config.sort_enabled());

    if let Some(rules) = &config.rules {
        println!("  Rules: {}", rules.ruleset.rules.len());
    }
    if let Some(combine) = &config.combine {
        println!("  Combine: {:?} with {}", combine.mode, combine.with.join(", "));
    }
    if let Some(hashcat) = &config.hashcat {
        println!(
            "  Hashcat: {:?} mode, hash type {}",
            hashcat.attack_mode, hashcat.hash_type
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &JobConfig) -> wlaio::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📥 Word Source:");
    match &config.source {
        SourceConfig::File { paths } => {
            for path in paths {
                println!("  File: {}", path);
            }
        }
        SourceConfig::Inline { words } => println!("  Inline words: {}", words.len()),
        SourceConfig::Bruteforce { charset, .. } => {
            let generator = BruteForce::new(charset)?;
            println!("  Alphabet size: {}", generator.alphabet().len());
            println!(
                "  Lengths: {}..={}",
                charset.min_length, charset.max_length
            );
            println!("  Combinations: {}", generator.total());
            println!("  Limit: {}", config.max_combinations());
            if generator.total() > config.max_combinations() {
                println!("  ⚠️ Over the limit, the job would be refused");
            }
        }
        SourceConfig::Scrape { url, .. } => {
            let options = config.scrape_options();
            println!("  URL: {}", url);
            println!(
                "  Word length: {}..={}",
                options.min_length, options.max_length
            );
        }
    }

    if let Some(rules) = &config.rules {
        println!();
        println!("🛠️ Rules:");
        for rule in &rules.ruleset.rules {
            println!("  ✅ {:?}", rule);
        }
        if let Some(path) = &rules.rules_file {
            println!("  Rules file: {}", path);
        }
    }

    if let Some(hashcat) = &config.hashcat {
        let hashcat = config.hashcat_config(hashcat);
        println!();
        println!("🔨 Hashcat:");
        println!("  {} {}", hashcat.binary, hashcat.args()?.join(" "));
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
    Ok(())
}
