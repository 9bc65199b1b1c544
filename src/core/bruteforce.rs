use crate::domain::model::CharsetSpec;
use crate::utils::error::{Result, WordlistError};
use crate::utils::validation::{validate_range, Validate};

pub const MAX_WORD_LENGTH: usize = 10;
/// Upper bound on the up-front reservation in `generate`.
const MAX_PREALLOCATED_WORDS: u128 = 1 << 20;

pub const DEFAULT_MAX_COMBINATIONS: u128 = 1_000_000;

impl CharsetSpec {
    /// Alphabet in class order (upper, lower, numbers, special) followed by
    /// the custom characters, first occurrence wins.
    pub fn alphabet(&self) -> Vec<char> {
        let mut alphabet: Vec<char> = Vec::new();
        let predefined = crate::domain::model::CharClass::ALL
            .into_iter()
            .filter(|class| self.classes.contains(class))
            .flat_map(|class| class.chars().chars());

        for c in predefined.chain(self.custom.chars()) {
            if !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }
        alphabet
    }

    /// Number of strings across the whole length range, saturating.
    pub fn combination_count(&self) -> u128 {
        let size = self.alphabet().len() as u128;
        (self.min_length..=self.max_length).fold(0u128, |acc, len| {
            let per_length = size.checked_pow(len as u32).unwrap_or(u128::MAX);
            acc.saturating_add(per_length)
        })
    }
}

impl Validate for CharsetSpec {
    fn validate(&self) -> Result<()> {
        if self.alphabet().is_empty() {
            return Err(WordlistError::validation("Select at least one character set"));
        }
        validate_range("min_length", self.min_length, 1, MAX_WORD_LENGTH)?;
        validate_range("max_length", self.max_length, 1, MAX_WORD_LENGTH)?;
        if self.min_length > self.max_length {
            return Err(WordlistError::validation(format!(
                "Minimum length {} is greater than maximum length {}",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BruteForce {
    alphabet: Vec<char>,
    min_length: usize,
    max_length: usize,
    total: u128,
}

impl BruteForce {
    pub fn new(spec: &CharsetSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            alphabet: spec.alphabet(),
            min_length: spec.min_length,
            max_length: spec.max_length,
            total: spec.combination_count(),
        })
    }

    pub fn total(&self) -> u128 {
        self.total
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn ensure_within(&self, limit: u128) -> Result<()> {
        if self.total > limit {
            return Err(WordlistError::TooManyCombinations {
                count: self.total,
                limit,
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> BruteForceIter<'_> {
        BruteForceIter {
            alphabet: &self.alphabet,
            indices: vec![0; self.min_length],
            max_length: self.max_length,
            done: self.alphabet.is_empty(),
        }
    }

    /// Materialise every combination, refusing when `limit` would be exceeded.
    pub fn generate(&self, limit: u128) -> Result<Vec<String>> {
        self.ensure_within(limit)?;
        tracing::debug!(
            "Generating {} combinations over a {}-character alphabet",
            self.total,
            self.alphabet.len()
        );
        let mut words = Vec::with_capacity(initial_capacity(self.total));
        for (i, word) in self.iter().enumerate() {
            log_progress(i as u128, self.total);
            words.push(word);
        }
        Ok(words)
    }
}

fn initial_capacity(total: u128) -> usize {
    total.min(MAX_PREALLOCATED_WORDS) as usize
}

pub(crate) fn log_progress(done: u128, total: u128) {
    if total > 0 && done > 0 && done % 100_000 == 0 {
        tracing::debug!(
            "Brute force progress: {}/{} ({:.1}%)",
            done,
            total,
            done as f64 / total as f64 * 100.0
        );
    }
}

/// Odometer over alphabet positions; the rightmost position turns fastest.
pub struct BruteForceIter<'a> {
    alphabet: &'a [char],
    indices: Vec<usize>,
    max_length: usize,
    done: bool,
}

impl BruteForceIter<'_> {
    fn advance(&mut self) {
        let base = self.alphabet.len();
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return;
            }
            *slot = 0;
        }
        // every position wrapped: move on to the next length
        let next_length = self.indices.len() + 1;
        if next_length > self.max_length {
            self.done = true;
        } else {
            self.indices = vec![0; next_length];
        }
    }
}

impl Iterator for BruteForceIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let word: String = self.indices.iter().map(|&i| self.alphabet[i]).collect();
        self.advance();
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CharClass;
    use std::collections::HashSet;

    fn custom(chars: &str, min: usize, max: usize) -> CharsetSpec {
        CharsetSpec::new(vec![], min, max).with_custom(chars)
    }

    #[test]
    fn test_two_char_alphabet_length_two_yields_four_unique() {
        let bf = BruteForce::new(&custom("ab", 2, 2)).unwrap();
        let words: Vec<String> = bf.iter().collect();

        assert_eq!(words, vec!["aa", "ab", "ba", "bb"]);
        assert_eq!(words.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(bf.total(), 4);
    }

    #[test]
    fn test_length_range_emits_shorter_first() {
        let bf = BruteForce::new(&custom("01", 1, 3)).unwrap();
        let words: Vec<String> = bf.iter().collect();

        assert_eq!(words.len(), 2 + 4 + 8);
        assert_eq!(&words[..3], &["0", "1", "00"]);
        assert_eq!(words.last().unwrap(), "111");
        assert_eq!(bf.total(), 14);
    }

    #[test]
    fn test_alphabet_follows_class_order_and_dedups_custom() {
        let spec = CharsetSpec::new(vec![CharClass::Numbers, CharClass::Uppercase], 1, 1)
            .with_custom("A!9");
        let alphabet = spec.alphabet();

        assert_eq!(alphabet.len(), 26 + 10 + 1);
        assert_eq!(alphabet[0], 'A');
        assert_eq!(alphabet[26], '0');
        assert_eq!(*alphabet.last().unwrap(), '!');
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        assert!(BruteForce::new(&custom("", 1, 2)).is_err());
        assert!(BruteForce::new(&custom("ab", 0, 2)).is_err());
        assert!(BruteForce::new(&custom("ab", 3, 2)).is_err());
        assert!(BruteForce::new(&custom("ab", 1, 11)).is_err());
    }

    #[test]
    fn test_generate_respects_limit() {
        let spec = CharsetSpec::new(vec![CharClass::Lowercase], 5, 5);
        let bf = BruteForce::new(&spec).unwrap();

        assert_eq!(bf.total(), 26u128.pow(5));
        let err = bf.generate(DEFAULT_MAX_COMBINATIONS).unwrap_err();
        assert!(matches!(err, WordlistError::TooManyCombinations { .. }));
    }

    #[test]
    fn test_reservation_is_capped_for_raised_limits() {
        assert_eq!(initial_capacity(110), 110);
        assert_eq!(initial_capacity(u128::MAX), 1 << 20);

        let spec = CharsetSpec::new(vec![CharClass::Numbers], 2, 2);
        let words = BruteForce::new(&spec).unwrap().generate(u128::MAX).unwrap();
        assert_eq!(words.len(), 100);
    }

    #[test]
    fn test_combination_count_saturates() {
        let spec = CharsetSpec::new(CharClass::ALL.to_vec(), 10, 10);
        assert!(spec.combination_count() > DEFAULT_MAX_COMBINATIONS);
        assert_eq!(spec.combination_count(), 85u128.pow(10));
    }
}
