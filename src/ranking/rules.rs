//! Deterministic persona-aware score adjustments.
//!
//! Applied in order to the cosine similarity of each chunk:
//! 1. generic section titles are penalized (×0.70), except "conclusion" for
//!    researcher personas;
//! 2. the first boost keyword (in lexicon order) found as a whole word in the
//!    section title multiplies the score by the archetype's factor. At most
//!    one boost is applied.

use crate::persona::{BOOST_LEXICON, BoostArchetype, boost_archetype};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Multiplier for generic section titles.
pub const GENERIC_TITLE_PENALTY: f32 = 0.70;

/// Section titles considered too generic to be actionable.
pub const PENALIZED_TITLES: &[&str] = &[
    "introduction",
    "conclusion",
    "summary",
    "preface",
    "contents",
    "table of contents",
    "abstract",
    "foreword",
    "epilogue",
];

lazy_static! {
    /// Whole-word keyword patterns per boost archetype, in keyword order.
    static ref BOOST_PATTERNS: HashMap<&'static str, Vec<Regex>> = BOOST_LEXICON
        .iter()
        .map(|a| {
            let patterns = a
                .keywords
                .iter()
                .map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))).unwrap())
                .collect();
            (a.name, patterns)
        })
        .collect();
}

/// Why a score changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Generic-title penalty applied
    Penalty(f32),
    /// Keyword boost applied
    Boost {
        /// Archetype name
        archetype: &'static str,
        /// Matched keyword
        keyword: &'static str,
        /// Multiplier
        factor: f32,
    },
}

/// Applies title penalties and persona boosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAdjuster;

impl ScoreAdjuster {
    /// Create an adjuster over the built-in lexicons.
    pub fn new() -> Self {
        Self
    }

    /// Final score for a chunk.
    ///
    /// # Examples
    ///
    /// ```
    /// use outline_oxide::ranking::ScoreAdjuster;
    ///
    /// let adjuster = ScoreAdjuster::new();
    /// assert!((adjuster.adjust(0.5, "Menu Planning", "Food Contractor") - 0.65).abs() < 1e-6);
    /// assert!((adjuster.adjust(0.5, "Introduction", "Food Contractor") - 0.35).abs() < 1e-6);
    /// assert!((adjuster.adjust(0.4, "Conclusion", "Researcher") - 0.40).abs() < 1e-6);
    /// ```
    pub fn adjust(&self, base: f32, section_title: &str, persona: &str) -> f32 {
        self.explain(section_title, persona)
            .iter()
            .fold(base, |score, adj| match adj {
                Adjustment::Penalty(f) => score * f,
                Adjustment::Boost { factor, .. } => score * factor,
            })
    }

    /// The adjustments that apply to a title, in application order.
    pub fn explain(&self, section_title: &str, persona: &str) -> Vec<Adjustment> {
        let title = section_title.trim().to_lowercase();
        let mut applied = Vec::with_capacity(2);

        if PENALIZED_TITLES.contains(&title.as_str()) && !is_waived(&title, persona) {
            applied.push(Adjustment::Penalty(GENERIC_TITLE_PENALTY));
        }

        if let Some(archetype) = boost_archetype(persona) {
            if let Some(keyword) = first_keyword_match(archetype, &title) {
                applied.push(Adjustment::Boost {
                    archetype: archetype.name,
                    keyword,
                    factor: archetype.factor,
                });
            }
        }

        applied
    }
}

fn is_waived(title: &str, persona: &str) -> bool {
    title == "conclusion" && persona.to_lowercase().contains("researcher")
}

fn first_keyword_match(archetype: &'static BoostArchetype, title: &str) -> Option<&'static str> {
    let patterns = BOOST_PATTERNS.get(archetype.name)?;
    archetype
        .keywords
        .iter()
        .zip(patterns)
        .find(|(_, re)| re.is_match(title))
        .map(|(kw, _)| *kw)
}
