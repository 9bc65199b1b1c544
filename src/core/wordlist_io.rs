use crate::utils::error::{Result, WordlistError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Words from raw bytes: lossy UTF-8, one per line, trimmed, blanks dropped.
pub fn parse_words(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn to_bytes(words: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.iter().map(|w| w.len() + 1).sum());
    for word in words {
        out.extend_from_slice(word.as_bytes());
        out.push(b'\n');
    }
    out
}

/// Comma separated words as typed on the command line.
pub fn split_inline(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_wordlist(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| WordlistError::file(path, e))?;
    let words = parse_words(&data);
    tracing::debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Streams words to `path`, one per line. Returns the number written.
pub fn save_lines<I, S>(path: impl AsRef<Path>, words: I) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WordlistError::file(parent, e))?;
    }
    let file = File::create(path).map_err(|e| WordlistError::file(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0u64;
    for word in words {
        writer
            .write_all(word.as_ref().as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| WordlistError::file(path, e))?;
        written += 1;
    }
    writer.flush().map_err(|e| WordlistError::file(path, e))?;

    tracing::debug!("Wrote {} words to {}", written, path.display());
    Ok(written)
}

pub fn save_wordlist(path: impl AsRef<Path>, words: &[String]) -> Result<u64> {
    save_lines(path, words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_words_trims_and_skips_blank_lines() {
        let words = parse_words(b"  alpha \r\n\nbeta\n\t\ngamma");
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_parse_words_tolerates_invalid_utf8() {
        let words = parse_words(b"caf\xff\nok\n");
        assert_eq!(words.len(), 2);
        assert_eq!(words[1], "ok");
    }

    #[test]
    fn test_split_inline() {
        assert_eq!(split_inline(" john, doe ,,1990"), vec!["john", "doe", "1990"]);
    }

    #[test]
    fn test_save_then_load_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.txt");
        let words = vec!["one".to_string(), "two".to_string()];

        assert_eq!(save_wordlist(&path, &words).unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert_eq!(load_wordlist(&path).unwrap(), words);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let err = load_wordlist(&path).unwrap_err();

        assert!(matches!(err, WordlistError::FileError { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }
}
