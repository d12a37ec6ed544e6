//! Read-only vocabulary corpus: words, their levels, and their roots.

use crate::error::{CoreError, Result};
use crate::types::UserLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Seed corpus bundled with the library.
const BUILTIN_CORPUS: &str = include_str!("../data/corpus.json");

/// Language a root comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootOrigin {
    Latin,
    Greek,
    Germanic,
    French,
    Other,
}

/// A morphological root shared by several words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootEntry {
    pub root: String,
    pub meaning: String,
    pub origin: RootOrigin,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A corpus word with its level and roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    pub meaning: String,
    pub level: UserLevel,
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub related_words: Vec<String>,
}

/// Read-only lookup over the vocabulary corpus.
pub trait Corpus {
    /// Look up a word, ignoring case and surrounding whitespace.
    fn word(&self, word: &str) -> Option<&WordEntry>;

    /// Look up a root.
    fn root(&self, root: &str) -> Option<&RootEntry>;

    /// All words in stable corpus order.
    fn words(&self) -> &[WordEntry];

    /// All roots in stable corpus order.
    fn roots(&self) -> &[RootEntry];

    /// Words at exactly `level`, in corpus order.
    fn words_at_level(&self, level: UserLevel) -> Vec<&WordEntry> {
        self.words().iter().filter(|w| w.level == level).collect()
    }

    /// Words built on `root`, in corpus order.
    fn words_with_root(&self, root: &str) -> Vec<&WordEntry> {
        self.words()
            .iter()
            .filter(|w| w.roots.iter().any(|r| r == root))
            .collect()
    }

    /// Known roots appearing as substrings of `word`.
    fn roots_in(&self, word: &str) -> Vec<&RootEntry> {
        let word = word.to_lowercase();
        self.roots()
            .iter()
            .filter(|r| word.contains(r.root.as_str()))
            .collect()
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    roots: Vec<RootEntry>,
    words: Vec<WordEntry>,
}

/// In-memory corpus.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    words: Vec<WordEntry>,
    roots: Vec<RootEntry>,
    word_index: HashMap<String, usize>,
    root_index: HashMap<String, usize>,
}

impl StaticCorpus {
    /// Build from entries. Words are lower-cased; duplicates are rejected.
    pub fn new(roots: Vec<RootEntry>, words: Vec<WordEntry>) -> Result<Self> {
        let mut corpus = Self::default();
        for root in roots {
            if corpus.root_index.contains_key(&root.root) {
                return Err(CoreError::Corpus(format!("duplicate root {}", root.root)));
            }
            corpus.root_index.insert(root.root.clone(), corpus.roots.len());
            corpus.roots.push(root);
        }
        for mut entry in words {
            entry.word = entry.word.trim().to_lowercase();
            if entry.word.is_empty() {
                return Err(CoreError::Corpus("empty word".to_string()));
            }
            if corpus.word_index.contains_key(&entry.word) {
                return Err(CoreError::Corpus(format!("duplicate word {}", entry.word)));
            }
            corpus.word_index.insert(entry.word.clone(), corpus.words.len());
            corpus.words.push(entry);
        }
        Ok(corpus)
    }

    /// Parse a corpus from `{"roots": [...], "words": [...]}` JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CorpusFile =
            serde_json::from_str(json).map_err(|e| CoreError::Corpus(e.to_string()))?;
        Self::new(file.roots, file.words)
    }

    /// The bundled seed corpus.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CORPUS)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Corpus for StaticCorpus {
    fn word(&self, word: &str) -> Option<&WordEntry> {
        self.word_index
            .get(&word.trim().to_lowercase())
            .map(|&i| &self.words[i])
    }

    fn root(&self, root: &str) -> Option<&RootEntry> {
        self.root_index.get(root).map(|&i| &self.roots[i])
    }

    fn words(&self) -> &[WordEntry] {
        &self.words
    }

    fn roots(&self) -> &[RootEntry] {
        &self.roots
    }
}
