use std::collections::BTreeSet;
use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SearchConfig;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(?:www\.)?([^/]+)").expect("valid URL regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Deduplicated set of search words. Iterates in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: BTreeSet<String>,
}

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw token along with its derived variants. Tokens made only of
    /// whitespace have no searchable form and are skipped.
    pub fn add_token(&mut self, token: &str, clean_urls: bool) {
        if token.trim().is_empty() {
            return;
        }

        let base = if clean_urls { clean_word(token) } else { token };
        let (compact, hyphenated) = whitespace_variants(base);

        self.insert(base.to_string());
        self.insert(compact);
        self.insert(hyphenated);
    }

    fn insert(&mut self, word: String) {
        if !word.is_empty() {
            self.words.insert(word);
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Reduce `scheme://[www.]host/...` to `host`. Anything else is returned as is.
pub fn clean_word(word: &str) -> &str {
    URL_RE
        .captures(word)
        .and_then(|caps| caps.get(1))
        .map_or(word, |host| host.as_str())
}

/// The word with all whitespace removed, and with each whitespace run
/// replaced by a hyphen.
pub fn whitespace_variants(word: &str) -> (String, String) {
    let compact = SPACE_RE.replace_all(word, "").into_owned();
    let hyphenated = SPACE_RE.replace_all(word, "-").into_owned();
    (compact, hyphenated)
}

/// Build the word set from positional arguments, used verbatim.
pub fn collect_from_args<S: AsRef<str>>(args: &[S], config: &SearchConfig) -> WordSet {
    let mut words = WordSet::new();
    for arg in args {
        words.add_token(arg.as_ref(), config.clean_urls);
    }
    words
}

/// Build the word set from newline-delimited input. Lines are trimmed and
/// blank lines skipped. Invalid UTF-8 is replaced rather than rejected; only
/// an I/O failure aborts collection.
pub fn collect_from_reader<R: BufRead>(
    mut reader: R,
    config: &SearchConfig,
) -> std::io::Result<WordSet> {
    let mut words = WordSet::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        words.add_token(line.trim(), config.clean_urls);
    }
    Ok(words)
}
