use serde::{Deserialize, Serialize};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-={}:<>?,./";

pub const DEFAULT_NUMBER_AFFIXES: [&str; 6] = ["1", "2", "3", "123", "2023", "2024"];
pub const DEFAULT_SPECIAL_AFFIXES: [&str; 5] = ["!", "@", "#", "$", "!@#"];

/// Predefined character classes a brute-force alphabet is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Numbers,
    Special,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Numbers,
        CharClass::Special,
    ];

    pub fn chars(self) -> &'static str {
        match self {
            CharClass::Uppercase => UPPERCASE,
            CharClass::Lowercase => LOWERCASE,
            CharClass::Numbers => NUMBERS,
            CharClass::Special => SPECIAL_CHARACTERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetSpec {
    #[serde(default)]
    pub classes: Vec<CharClass>,
    #[serde(default)]
    pub custom: String,
    pub min_length: usize,
    pub max_length: usize,
}

impl CharsetSpec {
    pub fn new(classes: Vec<CharClass>, min_length: usize, max_length: usize) -> Self {
        Self {
            classes,
            custom: String::new(),
            min_length,
            max_length,
        }
    }

    pub fn with_custom(mut self, custom: impl Into<String>) -> Self {
        self.custom = custom.into();
        self
    }
}

/// A single word transformation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    AppendNumbers,
    PrependNumbers,
    AppendSpecial,
    PrependSpecial,
    LeetSpeak,
    CaseVariations,
    /// A raw rule line in hashcat syntax, e.g. `c$1`.
    Hashcat(String),
}

/// Rules plus the affix lists they draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default = "default_number_affixes")]
    pub numbers: Vec<String>,
    #[serde(default = "default_special_affixes")]
    pub specials: Vec<String>,
}

fn default_number_affixes() -> Vec<String> {
    DEFAULT_NUMBER_AFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_special_affixes() -> Vec<String> {
    DEFAULT_SPECIAL_AFFIXES.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            numbers: default_number_affixes(),
            specials: default_special_affixes(),
        }
    }
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn has(&self, rule: &Rule) -> bool {
        self.rules.contains(rule)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// First list followed by the second.
    #[default]
    Append,
    /// Every pair concatenated in both orders.
    Cross,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub words: Vec<String>,
    pub input_count: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordlistStats {
    pub total_words: usize,
    pub unique_words: usize,
    pub duplicates: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub avg_length: f64,
    pub with_uppercase: usize,
    pub with_lowercase: usize,
    pub with_digits: usize,
    pub with_special: usize,
}

impl WordlistStats {
    pub fn percent(&self, count: usize) -> f64 {
        if self.total_words == 0 {
            0.0
        } else {
            count as f64 / self.total_words as f64 * 100.0
        }
    }
}

impl std::fmt::Display for WordlistStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wordlist Statistics:")?;
        writeln!(f, "Total words: {}", self.total_words)?;
        writeln!(f, "Unique words: {}", self.unique_words)?;
        writeln!(f, "Duplicates: {}", self.duplicates)?;
        writeln!(f)?;
        writeln!(f, "Length Statistics:")?;
        writeln!(f, "- Minimum length: {}", self.min_length)?;
        writeln!(f, "- Maximum length: {}", self.max_length)?;
        writeln!(f, "- Average length: {:.1}", self.avg_length)?;
        writeln!(f)?;
        writeln!(f, "Character Analysis:")?;
        let rows = [
            ("uppercase", self.with_uppercase),
            ("lowercase", self.with_lowercase),
            ("digits", self.with_digits),
            ("special chars", self.with_special),
        ];
        for (label, count) in rows {
            writeln!(
                f,
                "- Contains {}: {} words ({:.1}%)",
                label,
                count,
                self.percent(count)
            )?;
        }
        Ok(())
    }
}
