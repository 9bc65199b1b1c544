#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wlaio::core::hashcat::{
    AttackMode, HashcatConfig, HashcatOutcome, HashcatRunner, OutputLine,
};
use wlaio::WordlistError;

/// Writes an executable shell script standing in for hashcat.
fn fake_hashcat(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-hashcat.sh");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config(binary: &Path, dir: &Path) -> HashcatConfig {
    let mut config = HashcatConfig::new(dir.join("hashes.txt"), 0);
    config.binary = binary.display().to_string();
    config.wordlists.push(dir.join("words.txt"));
    config
}

#[tokio::test]
async fn test_status_lines_are_parsed_and_forwarded() {
    let temp_dir = TempDir::new().unwrap();
    let binary = fake_hashcat(
        temp_dir.path(),
        r#"echo "Session..........: hashcat"
echo "Status.............: Cracked"
echo "Recovered..........: 1/1 (100.00%) Digests"
echo "Progress...........: 4/4 (100.00%)"
echo "warning: fake device" >&2
exit 0
"#,
    );

    let runner = HashcatRunner::new(config(&binary, temp_dir.path())).unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let report = runner.run(Some(tx)).await.unwrap();

    assert_eq!(report.outcome, HashcatOutcome::Cracked);
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.output_lines, 5);
    assert_eq!(report.status.status(), Some("Cracked"));
    assert_eq!(report.status.recovered(), Some("1/1 (100.00%) Digests"));
    assert_eq!(report.status.progress(), Some("4/4 (100.00%)"));

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    assert_eq!(lines.len(), 5);
    assert!(lines.contains(&OutputLine::Stderr("warning: fake device".to_string())));
}

#[tokio::test]
async fn test_non_utf8_output_does_not_stop_capture() {
    let temp_dir = TempDir::new().unwrap();
    let binary = fake_hashcat(
        temp_dir.path(),
        r#"printf 'Device #1: caf\377\n'
echo "Status...........: Cracked"
echo "Recovered........: 1/1"
exit 0
"#,
    );

    let runner = HashcatRunner::new(config(&binary, temp_dir.path())).unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let report = runner.run(Some(tx)).await.unwrap();

    assert_eq!(report.outcome, HashcatOutcome::Cracked);
    assert_eq!(report.output_lines, 3);
    assert_eq!(report.status.status(), Some("Cracked"));
    assert_eq!(report.status.recovered(), Some("1/1"));

    let first = rx.recv().await.unwrap();
    assert_eq!(first, OutputLine::Stdout("Device #1: caf\u{FFFD}".to_string()));
}

#[tokio::test]
async fn test_exit_code_one_means_exhausted() {
    let temp_dir = TempDir::new().unwrap();
    let binary = fake_hashcat(temp_dir.path(), "echo 'Status.............: Exhausted'\nexit 1\n");

    let runner = HashcatRunner::new(config(&binary, temp_dir.path())).unwrap();
    let report = runner.run(None).await.unwrap();

    assert_eq!(report.outcome, HashcatOutcome::Exhausted);
    assert!(report.outcome.is_success());
    assert!(report.cracked.is_empty());
}

#[tokio::test]
async fn test_outfile_is_read_back() {
    let temp_dir = TempDir::new().unwrap();
    // the outfile path follows -o in the argument list
    let binary = fake_hashcat(
        temp_dir.path(),
        r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    shift
    printf '5f4dcc3b5aa765d61d8327deb882cf99:password\n' > "$1"
    printf '$2y$10$abc:with:colons\n' >> "$1"
  fi
  shift
done
exit 0
"#,
    );

    let mut hashcat = config(&binary, temp_dir.path());
    hashcat.outfile = Some(temp_dir.path().join("cracked.txt"));
    let report = HashcatRunner::new(hashcat).unwrap().run(None).await.unwrap();

    assert_eq!(report.cracked.len(), 2);
    assert_eq!(report.cracked[0].hash, "5f4dcc3b5aa765d61d8327deb882cf99");
    assert_eq!(report.cracked[0].plain, "password");
    assert_eq!(report.cracked[1].hash, "$2y$10$abc:with");
    assert_eq!(report.cracked[1].plain, "colons");
}

#[tokio::test]
async fn test_cancel_kills_the_process() {
    let temp_dir = TempDir::new().unwrap();
    let binary = fake_hashcat(temp_dir.path(), "echo started\nexec sleep 30\n");

    let runner = HashcatRunner::new(config(&binary, temp_dir.path())).unwrap();
    let started = std::time::Instant::now();
    let report = runner
        .run_until(None, tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    assert_eq!(report.outcome, HashcatOutcome::Interrupted);
    assert!(!report.outcome.is_success());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_missing_binary_is_a_launch_error() {
    let temp_dir = TempDir::new().unwrap();
    let runner = HashcatRunner::new(config(
        &temp_dir.path().join("no-such-hashcat"),
        temp_dir.path(),
    ))
    .unwrap();

    let err = runner.run(None).await.unwrap_err();
    assert!(matches!(err, WordlistError::ToolLaunchError { .. }));
}

#[test]
fn test_mask_mode_requires_mask() {
    let mut hashcat = HashcatConfig::new("hashes.txt", 0);
    hashcat.attack_mode = AttackMode::BruteForce;
    assert!(matches!(
        HashcatRunner::new(hashcat.clone()),
        Err(WordlistError::MissingConfigError { field }) if field == "hashcat.mask"
    ));

    hashcat.mask = Some("?d?d?d?d".to_string());
    let runner = HashcatRunner::new(hashcat).unwrap();
    assert_eq!(
        runner.config().args().unwrap(),
        vec!["-a", "3", "-m", "0", "hashes.txt", "?d?d?d?d"]
    );
}
