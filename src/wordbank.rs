use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_uppercase();
    (!word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())).then_some(word)
}

/// Parses a newline-delimited word list, keeping the first occurrence of each word.
pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    data.lines()
        .filter_map(normalize)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?)
            && seen.insert(word.clone())
        {
            words.push(word);
        }
    }
    Ok(words)
}

/// Words starting with `prefix` (case-insensitive), restricted to
/// `fixed_len` characters when the puzzle already has a length.
pub fn suggestions<'a>(
    words: &'a [String],
    prefix: &str,
    fixed_len: Option<usize>,
    limit: usize,
) -> Vec<&'a str> {
    let prefix = prefix.trim().to_uppercase();
    words
        .iter()
        .filter(|word| word.starts_with(&prefix))
        .filter(|word| fixed_len.is_none_or(|len| word.chars().count() == len))
        .take(limit)
        .map(String::as_str)
        .collect()
}
