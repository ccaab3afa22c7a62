//! Categories: the rule that decides which tiles are worth eating
//!
//! Word categories come from a word->tags dataset; numeric categories are a
//! range plus a membership rule. Either way the correct and distractor pools
//! are disjoint by construction.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_TAG_ENTRIES;
use crate::error::{ConfigError, Result};
use crate::settings::GameMode;

/// Built-in word list, used when no dataset file is configured
const BUILTIN_WORDS: &str = include_str!("../../data/words.json");

/// Word vs. number categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Word,
    Numeric,
}

/// How labels are cased on screen. Never touches the underlying value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelCase {
    #[default]
    Title,
    Upper,
    Verbatim,
}

impl LabelCase {
    pub fn apply(self, text: &str) -> String {
        match self {
            LabelCase::Verbatim => text.to_string(),
            LabelCase::Upper => text.to_uppercase(),
            LabelCase::Title => text
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Underlying content of a tile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileValue {
    Word(String),
    Number(i64),
}

impl fmt::Display for TileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileValue::Word(word) => f.write_str(word),
            TileValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Membership rule for numeric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericRule {
    Even,
    Odd,
    MultipleOf(i64),
    FactorOf(i64),
    Prime,
    Square,
    GreaterThan(i64),
}

impl NumericRule {
    pub fn matches(self, n: i64) -> bool {
        match self {
            NumericRule::Even => n % 2 == 0,
            NumericRule::Odd => n % 2 != 0,
            NumericRule::MultipleOf(m) => m != 0 && n % m == 0,
            NumericRule::FactorOf(m) => n != 0 && m % n == 0,
            NumericRule::Prime => is_prime(n),
            NumericRule::Square => {
                if n < 0 {
                    return false;
                }
                let root = (n as f64).sqrt().round() as i64;
                root * root == n
            }
            NumericRule::GreaterThan(m) => n > m,
        }
    }
}

fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// What a category is made of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategoryContent {
    Words {
        correct: Vec<String>,
        distractors: Vec<String>,
    },
    Numeric {
        rule: NumericRule,
        min: i64,
        max: i64,
    },
}

/// A rule set for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Display label ("Animals", "Multiples of 3")
    pub name: String,
    pub content: CategoryContent,
    pub case: LabelCase,
}

impl Category {
    pub fn words(
        name: impl Into<String>,
        correct: Vec<String>,
        distractors: Vec<String>,
    ) -> Self {
        let name = name.into();
        // Keep the pools disjoint even if the caller didn't
        let correct_set: BTreeSet<&String> = correct.iter().collect();
        let distractors = distractors
            .iter()
            .filter(|d| !correct_set.contains(d))
            .cloned()
            .collect();
        Self {
            id: format!("words:{}", name.to_lowercase()),
            name,
            content: CategoryContent::Words {
                correct,
                distractors,
            },
            case: LabelCase::Title,
        }
    }

    pub fn numeric(name: impl Into<String>, rule: NumericRule, min: i64, max: i64) -> Self {
        let name = name.into();
        Self {
            id: format!("math:{}", name.to_lowercase().replace(' ', "-")),
            name,
            content: CategoryContent::Numeric {
                rule,
                min: min.min(max),
                max: max.max(min),
            },
            case: LabelCase::Verbatim,
        }
    }

    pub fn with_case(mut self, case: LabelCase) -> Self {
        self.case = case;
        self
    }

    pub fn kind(&self) -> CategoryKind {
        match self.content {
            CategoryContent::Words { .. } => CategoryKind::Word,
            CategoryContent::Numeric { .. } => CategoryKind::Numeric,
        }
    }

    /// Whether a value satisfies this category
    pub fn is_correct(&self, value: &TileValue) -> bool {
        match (&self.content, value) {
            (CategoryContent::Words { correct, .. }, TileValue::Word(word)) => {
                correct.iter().any(|c| c == word)
            }
            (CategoryContent::Numeric { rule, .. }, TileValue::Number(n)) => rule.matches(*n),
            _ => false,
        }
    }

    /// Every value that counts as correct
    pub fn correct_values(&self) -> Vec<TileValue> {
        match &self.content {
            CategoryContent::Words { correct, .. } => {
                correct.iter().cloned().map(TileValue::Word).collect()
            }
            CategoryContent::Numeric { rule, min, max } => (*min..=*max)
                .filter(|n| rule.matches(*n))
                .map(TileValue::Number)
                .collect(),
        }
    }

    /// Every value that counts as wrong
    pub fn distractor_values(&self) -> Vec<TileValue> {
        match &self.content {
            CategoryContent::Words { distractors, .. } => {
                distractors.iter().cloned().map(TileValue::Word).collect()
            }
            CategoryContent::Numeric { rule, min, max } => (*min..=*max)
                .filter(|n| !rule.matches(*n))
                .map(TileValue::Number)
                .collect(),
        }
    }

    /// On-screen text for a value
    pub fn label_for(&self, value: &TileValue) -> String {
        self.case.apply(&value.to_string())
    }

    /// Draw one value of the requested correctness.
    ///
    /// Falls back to the other pool if the requested one is empty. Returns
    /// None only when the category has no values at all.
    pub fn draw_value<R: Rng>(&self, want_correct: bool, rng: &mut R) -> Option<TileValue> {
        let (primary, secondary) = if want_correct {
            (self.correct_values(), self.distractor_values())
        } else {
            (self.distractor_values(), self.correct_values())
        };
        let pool = if primary.is_empty() { secondary } else { primary };
        if pool.is_empty() {
            return None;
        }
        let index = rng.random_range(0..pool.len());
        pool.into_iter().nth(index)
    }
}

/// External word dataset collaborator
pub trait TagSource {
    /// All tags, in a stable order
    fn list_tags(&self) -> Vec<String>;
    /// Words carrying `tag`
    fn entries_for_tag(&self, tag: &str) -> Vec<String>;
    /// Every word in the dataset
    fn all_entries(&self) -> Vec<String>;
}

/// word -> tags mapping loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordDataset {
    entries: BTreeMap<String, Vec<String>>,
}

impl WordDataset {
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: WordDataset = serde_json::from_str(json)?;
        if dataset.entries.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let dataset = Self::from_json(&json)?;
        log::info!(
            "Loaded {} words from {}",
            dataset.entries.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_WORDS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TagSource for WordDataset {
    fn list_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self.entries.values().flatten().collect();
        tags.into_iter().cloned().collect()
    }

    fn entries_for_tag(&self, tag: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, tags)| tags.iter().any(|t| t == tag))
            .map(|(word, _)| word.clone())
            .collect()
    }

    fn all_entries(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Numeric categories that ship with the game
pub fn builtin_numeric_categories() -> Vec<Category> {
    vec![
        Category::numeric("Even numbers", NumericRule::Even, 1, 50),
        Category::numeric("Odd numbers", NumericRule::Odd, 1, 50),
        Category::numeric("Multiples of 3", NumericRule::MultipleOf(3), 1, 99),
        Category::numeric("Multiples of 4", NumericRule::MultipleOf(4), 1, 60),
        Category::numeric("Multiples of 5", NumericRule::MultipleOf(5), 1, 100),
        Category::numeric("Prime numbers", NumericRule::Prime, 1, 50),
        Category::numeric("Perfect squares", NumericRule::Square, 1, 100),
        Category::numeric("Factors of 36", NumericRule::FactorOf(36), 1, 40),
        Category::numeric("Greater than 50", NumericRule::GreaterThan(50), 20, 80),
    ]
}

/// Build one word category per usable tag
pub fn word_categories_from(source: &dyn TagSource) -> Vec<Category> {
    let all = source.all_entries();
    let mut categories = Vec::new();
    for tag in source.list_tags() {
        let correct = source.entries_for_tag(&tag);
        if correct.len() < MIN_TAG_ENTRIES {
            log::debug!("Skipping tag {tag:?}: only {} words", correct.len());
            continue;
        }
        let distractors: Vec<String> = all
            .iter()
            .filter(|word| !correct.contains(word))
            .cloned()
            .collect();
        if distractors.is_empty() {
            continue;
        }
        categories.push(Category::words(tag, correct, distractors));
    }
    categories
}

/// Every category a run can draw from
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    words: Vec<Category>,
    numeric: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(words: Vec<Category>, numeric: Vec<Category>) -> Result<Self> {
        if words.is_empty() && numeric.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        Ok(Self { words, numeric })
    }

    /// Catalog from a word dataset plus the built-in numeric set
    pub fn from_source(source: &dyn TagSource) -> Result<Self> {
        let words = word_categories_from(source);
        if words.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }
        Self::new(words, builtin_numeric_categories())
    }

    pub fn builtin() -> Result<Self> {
        Self::from_source(&WordDataset::builtin()?)
    }

    /// Fail fast if `mode` would have nothing to pick from
    pub fn ensure_mode(&self, mode: GameMode) -> Result<()> {
        let ok = match mode {
            GameMode::Mixed => !self.words.is_empty() || !self.numeric.is_empty(),
            GameMode::WordsOnly => !self.words.is_empty(),
            GameMode::MathOnly => !self.numeric.is_empty(),
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::NoCategories)
        }
    }

    pub fn list_categories(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Word => &self.words,
            CategoryKind::Numeric => &self.numeric,
        }
    }

    /// Which kind of category a level uses under `mode`
    pub fn kind_for_mode<R: Rng>(&self, mode: GameMode, rng: &mut R) -> CategoryKind {
        match mode {
            GameMode::WordsOnly => CategoryKind::Word,
            GameMode::MathOnly => CategoryKind::Numeric,
            GameMode::Mixed => {
                if rng.random_bool(0.5) {
                    CategoryKind::Word
                } else {
                    CategoryKind::Numeric
                }
            }
        }
    }

    /// Pick a category of `kind`: round-robin by `level_index` when
    /// `rotate` is set, uniformly at random otherwise. An empty kind falls
    /// back to the other one.
    pub fn pick_category<R: Rng>(
        &self,
        kind: CategoryKind,
        level_index: u32,
        rotate: bool,
        rng: &mut R,
    ) -> &Category {
        let mut list = self.list_categories(kind);
        if list.is_empty() {
            let other = match kind {
                CategoryKind::Word => CategoryKind::Numeric,
                CategoryKind::Numeric => CategoryKind::Word,
            };
            log::warn!("No {kind:?} categories, using {other:?}");
            list = self.list_categories(other);
        }
        let index = if rotate {
            level_index as usize % list.len()
        } else {
            rng.random_range(0..list.len())
        };
        &list[index]
    }
}
