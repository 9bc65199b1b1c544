use crate::domain::model::{Rule, RuleSet};
use crate::utils::error::{Result, WordlistError};
use crate::utils::validation::Validate;
use std::collections::HashSet;

/// Applied after lowercasing, in this order.
pub const LEET_MAP: [(char, char); 7] = [
    ('e', '3'),
    ('a', '4'),
    ('i', '1'),
    ('o', '0'),
    ('s', '5'),
    ('t', '7'),
    ('l', '1'),
];

pub fn leet(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .map(|c| {
            LEET_MAP
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub(crate) fn dedup_preserving_order(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(words.len());
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Every variation of `word` the rule set produces, the word itself first,
/// without duplicates.
pub fn apply_rules_to_word(word: &str, ruleset: &RuleSet) -> Result<Vec<String>> {
    let mut variations = vec![word.to_string()];

    if ruleset.has(&Rule::LeetSpeak) {
        variations.push(leet(word));
    }
    if ruleset.has(&Rule::CaseVariations) {
        variations.push(word.to_uppercase());
        variations.push(word.to_lowercase());
        variations.push(capitalize(word));
    }
    for rule in &ruleset.rules {
        if let Rule::Hashcat(line) = rule {
            variations.push(apply_hashcat_rule(word, line)?);
        }
    }

    let mut output = Vec::new();
    for var in variations {
        output.push(var.clone());
        if ruleset.has(&Rule::AppendNumbers) {
            output.extend(ruleset.numbers.iter().map(|n| format!("{}{}", var, n)));
        }
        if ruleset.has(&Rule::PrependNumbers) {
            output.extend(ruleset.numbers.iter().map(|n| format!("{}{}", n, var)));
        }
        if ruleset.has(&Rule::AppendSpecial) {
            output.extend(ruleset.specials.iter().map(|s| format!("{}{}", var, s)));
        }
        if ruleset.has(&Rule::PrependSpecial) {
            output.extend(ruleset.specials.iter().map(|s| format!("{}{}", s, var)));
        }
    }

    Ok(dedup_preserving_order(output))
}

/// Apply the rule set to every word and merge the variations.
pub fn apply_rules(words: &[String], ruleset: &RuleSet) -> Result<Vec<String>> {
    if words.iter().all(|w| w.trim().is_empty()) {
        return Err(WordlistError::validation("Please enter some words"));
    }
    ruleset.validate()?;

    let mut all = Vec::new();
    for word in words.iter().map(|w| w.trim()).filter(|w| !w.is_empty()) {
        all.extend(apply_rules_to_word(word, ruleset)?);
    }
    let unique = dedup_preserving_order(all);
    tracing::debug!(
        "Rules produced {} variations from {} words",
        unique.len(),
        words.len()
    );
    Ok(unique)
}

impl Validate for RuleSet {
    fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(WordlistError::validation("Please select at least one rule"));
        }
        for rule in &self.rules {
            if let Rule::Hashcat(line) = rule {
                parse_hashcat_rule(line)?;
            }
        }
        Ok(())
    }
}

impl RuleSet {
    /// The same transforms as hashcat rule lines, one variation per line.
    pub fn to_hashcat_rules(&self) -> Vec<String> {
        let mut bases = vec![":".to_string()];
        if self.has(&Rule::LeetSpeak) {
            let subs: String = LEET_MAP
                .iter()
                .map(|(from, to)| format!("s{}{}", from, to))
                .collect();
            bases.push(format!("l{}", subs));
        }
        if self.has(&Rule::CaseVariations) {
            bases.extend(["u", "l", "c"].map(String::from));
        }
        for rule in &self.rules {
            if let Rule::Hashcat(line) = rule {
                bases.push(line.clone());
            }
        }

        let mut affixes = Vec::new();
        if self.has(&Rule::AppendNumbers) {
            affixes.extend(self.numbers.iter().map(|n| append_ops(n)));
        }
        if self.has(&Rule::PrependNumbers) {
            affixes.extend(self.numbers.iter().map(|n| prepend_ops(n)));
        }
        if self.has(&Rule::AppendSpecial) {
            affixes.extend(self.specials.iter().map(|s| append_ops(s)));
        }
        if self.has(&Rule::PrependSpecial) {
            affixes.extend(self.specials.iter().map(|s| prepend_ops(s)));
        }

        let mut lines = Vec::new();
        for base in &bases {
            lines.push(base.clone());
            for affix in &affixes {
                if base == ":" {
                    lines.push(affix.clone());
                } else {
                    lines.push(format!("{}{}", base, affix));
                }
            }
        }
        dedup_preserving_order(lines)
    }
}

fn append_ops(affix: &str) -> String {
    affix.chars().map(|c| format!("${}", c)).collect()
}

fn prepend_ops(affix: &str) -> String {
    affix.chars().rev().map(|c| format!("^{}", c)).collect()
}

/// One hashcat rule function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOp {
    Noop,
    Lowercase,
    Uppercase,
    Capitalize,
    InvertCapitalize,
    ToggleCase,
    Reverse,
    Duplicate,
    Reflect,
    RotateLeft,
    RotateRight,
    DeleteFirst,
    DeleteLast,
    Append(char),
    Prepend(char),
    Replace(char, char),
    Purge(char),
    ToggleAt(usize),
    DeleteAt(usize),
}

fn position(rule: &str, c: Option<char>) -> Result<usize> {
    c.filter(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        .and_then(|c| c.to_digit(36))
        .map(|n| n as usize)
        .ok_or_else(|| WordlistError::RuleParseError {
            rule: rule.to_string(),
            reason: "expected a position 0-9 or A-Z".to_string(),
        })
}

fn argument(rule: &str, c: Option<char>, cmd: char) -> Result<char> {
    c.ok_or_else(|| WordlistError::RuleParseError {
        rule: rule.to_string(),
        reason: format!("'{}' needs a character argument", cmd),
    })
}

pub fn parse_hashcat_rule(rule: &str) -> Result<Vec<RuleOp>> {
    let mut ops = Vec::new();
    let mut chars = rule.chars();

    while let Some(cmd) = chars.next() {
        let op = match cmd {
            ' ' => continue,
            ':' => RuleOp::Noop,
            'l' => RuleOp::Lowercase,
            'u' => RuleOp::Uppercase,
            'c' => RuleOp::Capitalize,
            'C' => RuleOp::InvertCapitalize,
            't' => RuleOp::ToggleCase,
            'r' => RuleOp::Reverse,
            'd' => RuleOp::Duplicate,
            'f' => RuleOp::Reflect,
            '{' => RuleOp::RotateLeft,
            '}' => RuleOp::RotateRight,
            '[' => RuleOp::DeleteFirst,
            ']' => RuleOp::DeleteLast,
            '$' => RuleOp::Append(argument(rule, chars.next(), cmd)?),
            '^' => RuleOp::Prepend(argument(rule, chars.next(), cmd)?),
            '@' => RuleOp::Purge(argument(rule, chars.next(), cmd)?),
            's' => {
                let from = argument(rule, chars.next(), cmd)?;
                let to = argument(rule, chars.next(), cmd)?;
                RuleOp::Replace(from, to)
            }
            'T' => RuleOp::ToggleAt(position(rule, chars.next())?),
            'D' => RuleOp::DeleteAt(position(rule, chars.next())?),
            other => {
                return Err(WordlistError::RuleParseError {
                    rule: rule.to_string(),
                    reason: format!("unsupported function '{}'", other),
                })
            }
        };
        ops.push(op);
    }
    Ok(ops)
}

fn toggle(c: char) -> Vec<char> {
    if c.is_uppercase() {
        c.to_lowercase().collect()
    } else {
        c.to_uppercase().collect()
    }
}

pub fn apply_ops(word: &str, ops: &[RuleOp]) -> String {
    let mut w: Vec<char> = word.chars().collect();

    for op in ops {
        match *op {
            RuleOp::Noop => {}
            RuleOp::Lowercase => w = w.iter().flat_map(|c| c.to_lowercase()).collect(),
            RuleOp::Uppercase => w = w.iter().flat_map(|c| c.to_uppercase()).collect(),
            RuleOp::Capitalize => w = capitalize(&w.iter().collect::<String>()).chars().collect(),
            RuleOp::InvertCapitalize => {
                w = w
                    .iter()
                    .enumerate()
                    .flat_map(|(i, c)| -> Vec<char> {
                        if i == 0 {
                            c.to_lowercase().collect()
                        } else {
                            c.to_uppercase().collect()
                        }
                    })
                    .collect()
            }
            RuleOp::ToggleCase => w = w.iter().flat_map(|&c| toggle(c)).collect(),
            RuleOp::Reverse => w.reverse(),
            RuleOp::Duplicate => w.extend_from_slice(&w.clone()),
            RuleOp::Reflect => {
                let reversed: Vec<char> = w.iter().rev().copied().collect();
                w.extend(reversed);
            }
            RuleOp::RotateLeft => {
                if !w.is_empty() {
                    w.rotate_left(1);
                }
            }
            RuleOp::RotateRight => {
                if !w.is_empty() {
                    w.rotate_right(1);
                }
            }
            RuleOp::DeleteFirst => {
                if !w.is_empty() {
                    w.remove(0);
                }
            }
            RuleOp::DeleteLast => {
                w.pop();
            }
            RuleOp::Append(c) => w.push(c),
            RuleOp::Prepend(c) => w.insert(0, c),
            RuleOp::Replace(from, to) => {
                for c in w.iter_mut().filter(|c| **c == from) {
                    *c = to;
                }
            }
            RuleOp::Purge(x) => w.retain(|&c| c != x),
            RuleOp::ToggleAt(n) => {
                if n < w.len() {
                    let toggled = toggle(w[n]);
                    w.splice(n..=n, toggled);
                }
            }
            RuleOp::DeleteAt(n) => {
                if n < w.len() {
                    w.remove(n);
                }
            }
        }
    }
    w.into_iter().collect()
}

pub fn apply_hashcat_rule(word: &str, rule: &str) -> Result<String> {
    Ok(apply_ops(word, &parse_hashcat_rule(rule)?))
}

/// Parse a hashcat `.rule` file: one rule per line, `#` comments and blank
/// lines skipped. Spaces are kept since `$ ` and `^ ` take a space argument.
pub fn parse_rules_file(content: &str) -> Result<Vec<Rule>> {
    content
        .lines()
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|line| {
            parse_hashcat_rule(line)?;
            Ok(Rule::Hashcat(line.to_string()))
        })
        .collect()
}
