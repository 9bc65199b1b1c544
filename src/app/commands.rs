use crate::config::{
    CombineArgs, Command, CrackArgs, FileArgs, GenerateArgs, OutputArgs, PermuteArgs, RuleFlags,
    RulesArgs, ScrapeArgs, StatsArgs,
};
use crate::core::bruteforce::{log_progress, BruteForce};
use crate::core::combine::{
    combine, estimate_duration, estimate_permutations, permute, permute_unique, PermuteOptions,
};
use crate::core::hashcat::{HashcatConfig, HashcatRunner, OutputLine};
use crate::core::rules::{apply_rules, parse_rules_file};
use crate::core::scrape::{ScrapeOptions, Scraper};
use crate::core::{tools, wordlist_io};
use crate::domain::model::{CharsetSpec, Rule, RuleSet};
use crate::utils::error::{Result, WordlistError};
use std::io::{BufWriter, Write};

pub async fn run(command: &Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate(args).await,
        Command::Rules(args) => rules(args),
        Command::Combine(args) => combine_lists(args),
        Command::Permute(args) => permute_words(args),
        Command::Scrape(args) => scrape(args).await,
        Command::Dedup(args) => dedup(args),
        Command::Sort(args) => sort(args),
        Command::Stats(args) => stats(args),
        Command::Crack(args) => crack(args).await,
    }
}

/// Writes words to the output file, or to stdout when none is given.
fn emit<I, S>(words: I, output: &OutputArgs) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(path) = &output.output {
        let written = wordlist_io::save_lines(path, words)?;
        tracing::info!("📁 Saved {} words to {}", written, path.display());
        return Ok(written);
    }

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let mut written = 0u64;
    for word in words {
        match writeln!(writer, "{}", word.as_ref()) {
            Ok(()) => written += 1,
            // downstream closed, e.g. piped into `head`
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(written),
            Err(e) => return Err(e.into()),
        }
    }
    match writer.flush() {
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e.into()),
        _ => Ok(written),
    }
}

fn charset_spec(args: &GenerateArgs) -> CharsetSpec {
    let (min, max) = match args.length {
        Some(length) => (length, length),
        None => (args.min_length, args.max_length),
    };
    CharsetSpec::new(args.charset.clone(), min, max).with_custom(args.custom.clone())
}

async fn generate(args: &GenerateArgs) -> Result<()> {
    let generator = BruteForce::new(&charset_spec(args))?;
    let total = generator.total();

    if args.estimate {
        println!(
            "{} combinations over a {}-character alphabet",
            total,
            generator.alphabet().len()
        );
        return Ok(());
    }

    if args.force {
        if total > args.max_combinations {
            tracing::warn!("⚠️ Generating {} combinations, this may take a long time", total);
        }
    } else {
        generator.ensure_within(args.max_combinations)?;
    }

    let output = args.output.clone();
    let written = tokio::task::spawn_blocking(move || {
        let words = generator
            .iter()
            .enumerate()
            .inspect(|(i, _)| log_progress(*i as u128, total))
            .map(|(_, word)| word);
        emit(words, &output)
    })
    .await
    .map_err(|e| WordlistError::ProcessingError {
        message: format!("Generator task failed: {}", e),
    })??;

    tracing::info!("Generated {} brute force combinations", written);
    Ok(())
}

fn ruleset_from_flags(flags: &RuleFlags) -> Result<RuleSet> {
    let toggles = [
        (flags.leet, Rule::LeetSpeak),
        (flags.case_variations, Rule::CaseVariations),
        (flags.append_numbers, Rule::AppendNumbers),
        (flags.prepend_numbers, Rule::PrependNumbers),
        (flags.append_special, Rule::AppendSpecial),
        (flags.prepend_special, Rule::PrependSpecial),
    ];
    let mut ruleset = RuleSet::new(
        toggles
            .into_iter()
            .filter_map(|(enabled, rule)| enabled.then_some(rule))
            .collect(),
    );
    ruleset
        .rules
        .extend(flags.hashcat_rules.iter().cloned().map(Rule::Hashcat));

    if let Some(path) = &flags.rules_file {
        let content = std::fs::read_to_string(path).map_err(|e| WordlistError::file(path, e))?;
        ruleset.rules.extend(parse_rules_file(&content)?);
    }
    if !flags.numbers.is_empty() {
        ruleset.numbers = flags.numbers.clone();
    }
    if !flags.specials.is_empty() {
        ruleset.specials = flags.specials.clone();
    }
    Ok(ruleset)
}

fn rules(args: &RulesArgs) -> Result<()> {
    let mut words = match &args.words {
        Some(text) => wordlist_io::split_inline(text),
        None => Vec::new(),
    };
    if let Some(path) = &args.input {
        words.extend(wordlist_io::load_wordlist(path)?);
    }

    let ruleset = ruleset_from_flags(&args.rules)?;
    let variations = apply_rules(&words, &ruleset)?;

    if let Some(path) = &args.export_rules {
        let lines = ruleset.to_hashcat_rules();
        wordlist_io::save_wordlist(path, &lines)?;
        tracing::info!("Exported {} hashcat rules to {}", lines.len(), path.display());
    }

    emit(&variations, &args.output)?;
    tracing::info!("Generated {} word variations", variations.len());
    Ok(())
}

fn combine_lists(args: &CombineArgs) -> Result<()> {
    let first = wordlist_io::load_wordlist(&args.first)?;
    let second = wordlist_io::load_wordlist(&args.second)?;

    let mut combined = combine(&first, &second, args.mode)?;
    let ruleset = ruleset_from_flags(&args.rules)?;
    if !ruleset.is_empty() {
        combined = apply_rules(&combined, &ruleset)?;
    }
    if args.dedup {
        let (unique, removed) = tools::dedup(combined);
        tracing::info!("Removed {} duplicate words", removed);
        combined = unique;
    }

    emit(&combined, &args.output)?;
    tracing::info!("Generated {} combined words", combined.len());
    Ok(())
}

fn permute_words(args: &PermuteArgs) -> Result<()> {
    let words = wordlist_io::split_inline(&args.words);

    if args.estimate {
        let size = estimate_permutations(words.len());
        println!("Estimated wordlist size: {} words", size);
        println!("Estimated time to complete: {}", estimate_duration(size));
        return Ok(());
    }

    let options = PermuteOptions {
        case_words: args.case_words,
        leet_speak: args.leet,
        append_numbers: args.append_numbers,
        prepend_numbers: args.prepend_numbers,
        append_special: args.append_special,
        prepend_special: args.prepend_special,
        combine_words: args.combine_words,
        ..PermuteOptions::default()
    };
    let generated = if args.dedup {
        permute_unique(&words, &options)?
    } else {
        permute(&words, &options)?
    };

    emit(&generated, &args.output)?;
    tracing::info!("Generated {} words", generated.len());
    Ok(())
}

async fn scrape(args: &ScrapeArgs) -> Result<()> {
    let scraper = Scraper::new(ScrapeOptions {
        min_length: args.min_length,
        max_length: args.max_length,
        lowercase: args.lowercase,
        include_meta: !args.no_meta,
        timeout_secs: args.timeout,
        ..ScrapeOptions::default()
    })?;
    let words = scraper.scrape(&args.url).await?;
    emit(&words, &args.output)?;
    Ok(())
}

fn dedup(args: &FileArgs) -> Result<()> {
    let words = wordlist_io::load_wordlist(&args.input)?;
    let (unique, removed) = tools::dedup(words);
    emit(&unique, &args.output)?;
    tracing::info!("Removed {} duplicate words", removed);
    Ok(())
}

fn sort(args: &FileArgs) -> Result<()> {
    let mut words = wordlist_io::load_wordlist(&args.input)?;
    tools::sort(&mut words);
    emit(&words, &args.output)?;
    tracing::info!("Sorted {} words by length and alphabetically", words.len());
    Ok(())
}

fn stats(args: &StatsArgs) -> Result<()> {
    let words = wordlist_io::load_wordlist(&args.input)?;
    let stats = tools::stats(&words)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats);
    }
    Ok(())
}

fn hashcat_config(args: &CrackArgs) -> HashcatConfig {
    let mut config = HashcatConfig::new(args.hash_file.clone(), args.hash_type);
    config.binary = args.binary.clone();
    config.attack_mode = args.attack_mode;
    config.wordlists = args.wordlist.clone();
    config.mask = args.mask.clone();
    config.rules_file = args.rules_file.clone();
    config.outfile = args.outfile.clone();
    config.potfile = args.potfile.clone();
    config.status_timer = args.status_timer;
    config.extra_args = args.extra_args.clone();
    config
}

async fn crack(args: &CrackArgs) -> Result<()> {
    let runner = HashcatRunner::new(hashcat_config(args))?;
    run_hashcat(&runner).await
}

/// Runs hashcat with its output echoed to the terminal; Ctrl-C kills the child.
pub async fn run_hashcat(runner: &HashcatRunner) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<OutputLine>();
    let printer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            match line {
                OutputLine::Stdout(text) => println!("{}", text),
                OutputLine::Stderr(text) => eprintln!("{}", text),
            }
        }
    });

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let report = runner.run_until(Some(tx), cancel).await?;
    // the runner dropped its sender, so the printer drains and exits
    let _ = printer.await;

    for cracked in &report.cracked {
        println!("{}:{}", cracked.hash, cracked.plain);
    }
    if let Some(recovered) = report.status.recovered() {
        tracing::info!("Recovered: {}", recovered);
    }

    if report.outcome.is_success() {
        tracing::info!("✅ hashcat finished: {:?}", report.outcome);
        Ok(())
    } else {
        Err(WordlistError::ToolError {
            message: format!(
                "hashcat ended with {:?} (exit code {:?})",
                report.outcome, report.exit_code
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("wlaio").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_length_sets_both_bounds() {
        let cli = parse(&["generate", "-c", "numbers,lowercase", "--length", "3"]);
        let Command::Generate(args) = &cli.command else {
            panic!("expected generate");
        };
        let spec = charset_spec(args);
        assert_eq!((spec.min_length, spec.max_length), (3, 3));
        assert_eq!(spec.alphabet().len(), 36);
    }

    #[test]
    fn test_rule_flags_build_ruleset() {
        let cli = parse(&[
            "rules", "-w", "acme", "--leet", "--append-numbers", "--numbers", "7,77",
            "--hashcat-rule", "u",
        ]);
        let Command::Rules(args) = &cli.command else {
            panic!("expected rules");
        };
        let ruleset = ruleset_from_flags(&args.rules).unwrap();
        assert_eq!(
            ruleset.rules,
            vec![Rule::LeetSpeak, Rule::AppendNumbers, Rule::Hashcat("u".to_string())]
        );
        assert_eq!(ruleset.numbers, vec!["7", "77"]);
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bf.txt");
        let cli = parse(&[
            "generate", "--custom", "ab", "--min-length", "1", "--max-length", "2", "-o",
            out.to_str().unwrap(),
        ]);

        run(&cli.command).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "a\nb\naa\nab\nba\nbb\n"
        );
    }

    #[tokio::test]
    async fn test_generate_refuses_large_output_without_force() {
        let cli = parse(&["generate", "-c", "lowercase", "--length", "6"]);
        let err = run(&cli.command).await.unwrap_err();
        assert!(matches!(err, WordlistError::TooManyCombinations { .. }));
    }

    #[tokio::test]
    async fn test_dedup_and_sort_commands() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "zeta\nab\nzeta\nAa\n").unwrap();
        let deduped = dir.path().join("dedup.txt");
        let sorted = dir.path().join("sorted.txt");

        run(&parse(&["dedup", input.to_str().unwrap(), "-o", deduped.to_str().unwrap()]).command)
            .await
            .unwrap();
        run(&parse(&["sort", deduped.to_str().unwrap(), "-o", sorted.to_str().unwrap()]).command)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&deduped).unwrap(), "zeta\nab\nAa\n");
        assert_eq!(std::fs::read_to_string(&sorted).unwrap(), "Aa\nab\nzeta\n");
    }

    #[test]
    fn test_crack_args_map_to_config() {
        let cli = parse(&[
            "crack", "--hash-file", "h.txt", "-m", "1000", "-w", "w.txt", "--status-timer", "10",
            "--", "--force",
        ]);
        let Command::Crack(args) = &cli.command else {
            panic!("expected crack");
        };
        let config = hashcat_config(args);
        let argv = config.args().unwrap();
        assert_eq!(&argv[..4], &["-a", "0", "-m", "1000"]);
        assert!(argv.contains(&"--force".to_string()));
        assert_eq!(argv.last().unwrap(), "w.txt");
    }
}
