use crate::core::rules::{capitalize, dedup_preserving_order, leet};
use crate::domain::model::CombineMode;
use crate::utils::error::{Result, WordlistError};

pub const MAX_PERMUTE_WORDS: usize = 8;

pub fn combine(list1: &[String], list2: &[String], mode: CombineMode) -> Result<Vec<String>> {
    match mode {
        CombineMode::Append => {
            let mut out = Vec::with_capacity(list1.len() + list2.len());
            out.extend_from_slice(list1);
            out.extend_from_slice(list2);
            Ok(out)
        }
        CombineMode::Cross => {
            if list1.is_empty() || list2.is_empty() {
                return Err(WordlistError::validation("Please load both wordlists"));
            }
            let mut out = Vec::with_capacity(list1.len() * list2.len() * 2);
            for w1 in list1 {
                for w2 in list2 {
                    out.push(format!("{}{}", w1, w2));
                    out.push(format!("{}{}", w2, w1));
                }
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermuteOptions {
    pub case_words: bool,
    pub leet_speak: bool,
    pub append_numbers: bool,
    pub prepend_numbers: bool,
    pub append_special: bool,
    pub prepend_special: bool,
    pub combine_words: bool,
    pub numbers: Vec<String>,
    pub specials: Vec<String>,
}

impl Default for PermuteOptions {
    fn default() -> Self {
        Self {
            case_words: false,
            leet_speak: false,
            append_numbers: false,
            prepend_numbers: false,
            append_special: false,
            prepend_special: false,
            combine_words: false,
            numbers: ["1", "2", "3"].map(String::from).to_vec(),
            specials: ["!", "@", "#"].map(String::from).to_vec(),
        }
    }
}

/// Sum over r of n!/(n-r)!, times four case variants per joined word.
pub fn estimate_permutations(n: usize) -> u128 {
    let mut total: u128 = 0;
    let mut perms: u128 = 1;
    for r in 1..=n {
        perms = perms.saturating_mul((n - r + 1) as u128);
        total = total.saturating_add(perms.saturating_mul(4));
    }
    total
}

pub fn estimate_duration(size: u128) -> &'static str {
    match size {
        s if s < 1_000 => "Less than 1 second",
        s if s < 10_000 => "1-5 seconds",
        s if s < 100_000 => "5-30 seconds",
        s if s < 1_000_000 => "30 seconds to 1 minute",
        s if s < 10_000_000 => "1-5 minutes",
        _ => "More than 5 minutes",
    }
}

/// Visits k-permutations of `0..n` in lexicographic index order.
fn for_each_permutation(n: usize, k: usize, f: &mut impl FnMut(&[usize])) {
    fn visit(n: usize, k: usize, used: &mut [bool], current: &mut Vec<usize>, f: &mut impl FnMut(&[usize])) {
        if current.len() == k {
            f(current);
            return;
        }
        for i in 0..n {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(i);
            visit(n, k, used, current, f);
            current.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; n];
    let mut current = Vec::with_capacity(k);
    visit(n, k, &mut used, &mut current, f);
}

/// Joins every ordered selection of distinct input words and expands each
/// joined word with the enabled options.
pub fn permute(words: &[String], options: &PermuteOptions) -> Result<Vec<String>> {
    let words: Vec<&str> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Err(WordlistError::validation("Please enter some words"));
    }
    if words.len() > MAX_PERMUTE_WORDS {
        return Err(WordlistError::validation(format!(
            "At most {} words can be permuted, got {}",
            MAX_PERMUTE_WORDS,
            words.len()
        )));
    }

    let estimate = estimate_permutations(words.len());
    tracing::info!(
        "Estimated wordlist size: {} words, estimated time: {}",
        estimate,
        estimate_duration(estimate)
    );

    let mut out = Vec::new();
    for r in 1..=words.len() {
        for_each_permutation(words.len(), r, &mut |indices: &[usize]| {
            let joined: String = indices.iter().map(|&i| words[i]).collect();
            expand_joined(&joined, &words, options, &mut out);
        });
    }
    Ok(out)
}

fn expand_joined(word: &str, inputs: &[&str], options: &PermuteOptions, out: &mut Vec<String>) {
    if options.case_words {
        out.push(word.to_string());
        out.push(word.to_uppercase());
        out.push(word.to_lowercase());
        out.push(capitalize(word));
    } else {
        out.push(word.to_string());
    }
    if options.leet_speak {
        out.push(leet(word));
    }
    if options.append_numbers {
        out.extend(options.numbers.iter().map(|n| format!("{}{}", word, n)));
    }
    if options.prepend_numbers {
        out.extend(options.numbers.iter().map(|n| format!("{}{}", n, word)));
    }
    if options.append_special {
        out.extend(options.specials.iter().map(|s| format!("{}{}", word, s)));
    }
    if options.prepend_special {
        out.extend(options.specials.iter().map(|s| format!("{}{}", s, word)));
    }
    if options.combine_words {
        for other in inputs.iter().filter(|other| **other != word) {
            out.push(format!("{}{}", word, other));
            out.push(format!("{}{}", other, word));
        }
    }
}

/// `permute` followed by an order-preserving dedup.
pub fn permute_unique(words: &[String], options: &PermuteOptions) -> Result<Vec<String>> {
    Ok(dedup_preserving_order(permute(words, options)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_append_without_transform_is_m_plus_n() {
        let a = words(&["alpha", "beta", "gamma"]);
        let b = words(&["one", "two"]);
        let out = combine(&a, &b, CombineMode::Append).unwrap();

        assert_eq!(out.len(), a.len() + b.len());
        assert_eq!(out, words(&["alpha", "beta", "gamma", "one", "two"]));
    }

    #[test]
    fn test_cross_emits_both_orders() {
        let out = combine(&words(&["a", "b"]), &words(&["1"]), CombineMode::Cross).unwrap();
        assert_eq!(out, words(&["a1", "1a", "b1", "1b"]));

        assert!(combine(&words(&["a"]), &[], CombineMode::Cross).is_err());
    }

    #[test]
    fn test_permutations_in_index_order() {
        let out = permute(&words(&["a", "b", "c"]), &PermuteOptions::default()).unwrap();
        assert_eq!(
            out,
            words(&["a", "b", "c", "ab", "ac", "ba", "bc", "ca", "cb", "abc", "acb", "bac", "bca", "cab", "cba"])
        );
    }

    #[test]
    fn test_permute_options_expand_each_joined_word() {
        let options = PermuteOptions {
            case_words: true,
            append_numbers: true,
            combine_words: true,
            ..PermuteOptions::default()
        };
        let out = permute(&words(&["hi"]), &options).unwrap();
        assert_eq!(out, words(&["hi", "HI", "hi", "Hi", "hi1", "hi2", "hi3"]));

        let unique = permute_unique(&words(&["hi"]), &options).unwrap();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_permute_rejects_empty_and_oversized_input() {
        assert!(permute(&words(&[" ", ""]), &PermuteOptions::default()).is_err());
        let many: Vec<String> = (0..=MAX_PERMUTE_WORDS).map(|i| i.to_string()).collect();
        assert!(permute(&many, &PermuteOptions::default()).is_err());
    }

    #[test]
    fn test_estimates() {
        // 3 + 6 + 6 permutations, four variants each
        assert_eq!(estimate_permutations(3), 60);
        assert_eq!(estimate_duration(60), "Less than 1 second");
        assert_eq!(estimate_duration(50_000), "5-30 seconds");
        assert_eq!(estimate_duration(u128::MAX), "More than 5 minutes");
    }
}
