//! Mood taxonomy: the ordered set of selectable moods.
//!
//! A taxonomy is seeded from a built-in default list and replaced wholesale
//! whenever the user saves a customized one. Entries copy a mood's emoji at
//! save time, so edits here never change how past entries render.

pub mod resolver;

use crate::constants::DEFAULT_MOOD_COLOR;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub use resolver::TaxonomyResolver;

/// A single selectable mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDefinition {
    /// Identifier referenced by entries. Unique within a taxonomy.
    pub value: String,
    pub emoji: String,
    pub label: String,
    /// Display color, usually a `#rrggbb` hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MoodDefinition {
    pub fn new(value: &str, emoji: &str, label: &str, color: Option<&str>) -> Self {
        MoodDefinition {
            value: value.to_string(),
            emoji: emoji.to_string(),
            label: label.to_string(),
            color: color.map(str::to_string),
        }
    }

    /// The definition's color, or the default grey when it has none.
    pub fn color_or_default(&self) -> &str {
        match self.color.as_deref() {
            Some(color) if !color.trim().is_empty() => color,
            _ => DEFAULT_MOOD_COLOR,
        }
    }
}

/// An ordered sequence of mood definitions. Order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodTaxonomy {
    pub moods: Vec<MoodDefinition>,
}

impl MoodTaxonomy {
    pub fn new(moods: Vec<MoodDefinition>) -> Self {
        MoodTaxonomy { moods }
    }

    /// The built-in taxonomy used whenever no configuration has been saved.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::mood::MoodTaxonomy;
    ///
    /// let defaults = MoodTaxonomy::defaults();
    /// assert_eq!(defaults.moods[0].value, "happy");
    /// assert!(defaults.validate().is_ok());
    /// ```
    pub fn defaults() -> Self {
        MoodTaxonomy::new(vec![
            MoodDefinition::new("happy", "😀", "Happy", Some("#22c55e")),
            MoodDefinition::new("content", "🙂", "Content", Some("#10b981")),
            MoodDefinition::new("meh", "😐", "Meh", Some("#a3a3a3")),
            MoodDefinition::new("anxious", "😕", "Anxious", Some("#f59e0b")),
            MoodDefinition::new("sad", "😢", "Sad", Some("#3b82f6")),
            MoodDefinition::new("angry", "😠", "Angry", Some("#ef4444")),
            MoodDefinition::new("tired", "😴", "Tired", Some("#8b5cf6")),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn find(&self, value: &str) -> Option<&MoodDefinition> {
        self.moods.iter().find(|m| m.value == value)
    }

    /// Checks the structural rules a saved taxonomy must satisfy: at least one
    /// mood, no blank values, and no two moods sharing a `value`.
    pub fn validate(&self) -> AppResult<()> {
        if self.moods.is_empty() {
            return Err(AppError::Validation(
                "Mood taxonomy must contain at least one mood".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for mood in &self.moods {
            if mood.value.trim().is_empty() {
                return Err(AppError::Validation(
                    "Mood value must not be empty".to_string(),
                ));
            }
            if !seen.insert(mood.value.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate mood value '{}'",
                    mood.value
                )));
            }
        }

        Ok(())
    }

    /// Parses a taxonomy document: either `{"moods": [...]}` or a bare array
    /// of definitions. The result is not validated.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::mood::MoodTaxonomy;
    ///
    /// let bare = MoodTaxonomy::from_json(r#"[{"value":"ok","emoji":"👌","label":"Ok"}]"#).unwrap();
    /// assert_eq!(bare.moods[0].color, None);
    /// assert!(MoodTaxonomy::from_json("{}").is_err());
    /// ```
    pub fn from_json(raw: &str) -> AppResult<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Wrapped(MoodTaxonomy),
            Bare(Vec<MoodDefinition>),
        }

        let document: Document = serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("Invalid mood configuration JSON: {}", e)))?;
        match document {
            Document::Wrapped(taxonomy) => Ok(taxonomy),
            Document::Bare(moods) => Ok(MoodTaxonomy::new(moods)),
        }
    }

    /// Builds the value→color and value→label joins used when rendering.
    pub fn palette(&self) -> MoodPalette<'_> {
        let mut colors = HashMap::with_capacity(self.moods.len());
        let mut labels = HashMap::with_capacity(self.moods.len());
        for mood in &self.moods {
            colors.insert(mood.value.as_str(), mood.color_or_default());
            labels.insert(mood.value.as_str(), mood.label.as_str());
        }
        MoodPalette { colors, labels }
    }
}

/// Lookup tables joining entries' `mood_value` against a taxonomy.
#[derive(Debug)]
pub struct MoodPalette<'a> {
    colors: HashMap<&'a str, &'a str>,
    labels: HashMap<&'a str, &'a str>,
}

impl<'a> MoodPalette<'a> {
    /// Color for a mood value, `None` when the taxonomy no longer has it.
    pub fn color(&self, value: &str) -> Option<&'a str> {
        self.colors.get(value).copied()
    }

    /// Label for a mood value, falling back to the raw value.
    pub fn label<'v>(&self, value: &'v str) -> &'v str
    where
        'a: 'v,
    {
        self.labels.get(value).copied().unwrap_or(value)
    }
}
