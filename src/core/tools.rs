use crate::core::rules::dedup_preserving_order;
use crate::domain::model::WordlistStats;
use crate::utils::error::{Result, WordlistError};
use std::collections::HashSet;

/// Drops repeated words, keeping the first occurrence. Returns the number removed.
pub fn dedup(words: Vec<String>) -> (Vec<String>, usize) {
    let before = words.len();
    let unique = dedup_preserving_order(words);
    let removed = before - unique.len();
    (unique, removed)
}

/// Shortest first, then case-insensitive alphabetical.
pub fn sort(words: &mut [String]) {
    words.sort_by_cached_key(|w| (w.chars().count(), w.to_lowercase()));
}

pub fn stats(words: &[String]) -> Result<WordlistStats> {
    if words.is_empty() {
        return Err(WordlistError::validation("No words found"));
    }

    let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
    let unique = words.iter().collect::<HashSet<_>>().len();
    let count = |pred: fn(char) -> bool| words.iter().filter(|w| w.chars().any(pred)).count();

    Ok(WordlistStats {
        total_words: words.len(),
        unique_words: unique,
        duplicates: words.len() - unique,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        avg_length: lengths.iter().sum::<usize>() as f64 / words.len() as f64,
        with_uppercase: count(char::is_uppercase),
        with_lowercase: count(char::is_lowercase),
        with_digits: count(char::is_numeric),
        with_special: count(|c| !c.is_alphanumeric()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedup_counts_removed_and_is_idempotent() {
        let (unique, removed) = dedup(words(&["b", "a", "b", "c", "a"]));
        assert_eq!(unique, words(&["b", "a", "c"]));
        assert_eq!(removed, 2);

        let (again, removed) = dedup(unique.clone());
        assert_eq!(again, unique);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_sort_by_length_then_case_insensitive() {
        let mut list = words(&["banana", "Cat", "apple", "bat", "a"]);
        sort(&mut list);
        assert_eq!(list, words(&["a", "bat", "Cat", "apple", "banana"]));
    }

    #[test]
    fn test_stats() {
        let s = stats(&words(&["pass", "Pass1", "pass", "p@ss!"])).unwrap();

        assert_eq!(s.total_words, 4);
        assert_eq!(s.unique_words, 3);
        assert_eq!(s.duplicates, 1);
        assert_eq!(s.min_length, 4);
        assert_eq!(s.max_length, 5);
        assert!((s.avg_length - 4.5).abs() < f64::EPSILON);
        assert_eq!(s.with_uppercase, 1);
        assert_eq!(s.with_lowercase, 4);
        assert_eq!(s.with_digits, 1);
        assert_eq!(s.with_special, 1);
        assert!((s.percent(s.with_special) - 25.0).abs() < f64::EPSILON);
        assert!(s.to_string().contains("Duplicates: 1"));
    }

    #[test]
    fn test_stats_on_empty_list_fails() {
        assert!(stats(&[]).is_err());
    }
}
