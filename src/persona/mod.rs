//! Persona archetypes and query expansion.
//!
//! A persona string ("Travel Planner for a student group") is matched against
//! a small fixed lexicon of archetypes by case-insensitive substring
//! containment. The first archetype in lexicon order wins. Two lexicons exist:
//! one expands the search query, the other drives score boosts in
//! [`crate::ranking`].

/// Something matchable by name against a persona string.
pub trait Archetype {
    /// Archetype name ("Travel Planner")
    fn name(&self) -> &str;
}

/// Query-expansion entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryArchetype {
    /// Archetype name
    pub name: &'static str,
    /// Comma-separated focus keywords appended to the query
    pub keywords: &'static str,
}

impl Archetype for QueryArchetype {
    fn name(&self) -> &str {
        self.name
    }
}

/// Boost entry: a multiplier and the title keywords that trigger it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostArchetype {
    /// Archetype name
    pub name: &'static str,
    /// Score multiplier
    pub factor: f32,
    /// Whole-word title keywords in priority order
    pub keywords: &'static [&'static str],
}

impl Archetype for BoostArchetype {
    fn name(&self) -> &str {
        self.name
    }
}

/// Keywords used when no query archetype matches.
pub const DEFAULT_QUERY_KEYWORDS: &str = "relevant information, key insights, actionable details";

/// Query-expansion lexicon. Order is significant.
pub const QUERY_LEXICON: &[QueryArchetype] = &[
    QueryArchetype {
        name: "Travel Planner",
        keywords: "planning, itinerary, schedule, activities, budget, accommodation, attractions, transportation, destinations, tours, booking, travel tips",
    },
    QueryArchetype {
        name: "Food Contractor",
        keywords: "menu planning, food preparation, catering services, ingredient sourcing, kitchen operations, food safety, nutrition, cost management, supplier relations, quality control",
    },
    QueryArchetype {
        name: "HR Professional",
        keywords: "employee management, recruitment, policy compliance, training programs, performance evaluation, workplace procedures, staff development, benefits administration, labor relations",
    },
    QueryArchetype {
        name: "Researcher",
        keywords: "methodology, data analysis, findings, literature review, results, study design, experimental procedures",
    },
    QueryArchetype {
        name: "Financial Analyst",
        keywords: "revenue analysis, profit margins, investment strategies, financial forecasting, risk assessment, market performance",
    },
    QueryArchetype {
        name: "Investment Analyst",
        keywords: "market analysis, portfolio management, investment returns, valuation methods, growth opportunities",
    },
];

/// Boost lexicon. Order is significant, both across archetypes and within
/// each keyword list.
pub const BOOST_LEXICON: &[BoostArchetype] = &[
    BoostArchetype {
        name: "Travel Planner",
        factor: 1.25,
        keywords: &[
            "hotel", "restaurant", "budget", "itinerary", "plan", "schedule", "activities",
            "packing", "tips", "things to do", "nightlife", "accommodation", "attractions",
            "transportation", "booking", "tour", "guide", "travel", "destination", "sightseeing",
            "flights",
        ],
    },
    BoostArchetype {
        name: "Food Contractor",
        factor: 1.3,
        keywords: &[
            "menu", "recipe", "ingredient", "catering", "food", "cuisine", "cooking", "restaurant",
            "chef", "kitchen", "dining", "meal", "service", "nutrition", "preparation", "contract",
            "supplier", "procurement", "cost", "quality",
        ],
    },
    BoostArchetype {
        name: "HR Professional",
        factor: 1.2,
        keywords: &[
            "employee", "policy", "compliance", "recruitment", "hiring", "performance", "training",
            "onboarding", "benefits", "payroll", "management", "staff", "workplace", "procedures",
            "regulations", "human resources", "personnel", "development", "evaluation",
            "compensation",
        ],
    },
    BoostArchetype {
        name: "Researcher",
        factor: 1.3,
        keywords: &[
            "methodology", "methods", "results", "findings", "data", "analysis", "study",
            "experiment", "discussion",
        ],
    },
];

/// First archetype whose name occurs (case-insensitively) in `persona`.
pub fn match_archetype<'a, A: Archetype>(persona: &str, lexicon: &'a [A]) -> Option<&'a A> {
    let persona = persona.to_lowercase();
    lexicon
        .iter()
        .find(|a| persona.contains(&a.name().to_lowercase()))
}

/// Focus keywords for a persona, or [`DEFAULT_QUERY_KEYWORDS`].
pub fn query_keywords(persona: &str) -> &'static str {
    match_archetype(persona, QUERY_LEXICON).map_or(DEFAULT_QUERY_KEYWORDS, |a| a.keywords)
}

/// Boost archetype for a persona, if any.
pub fn boost_archetype(persona: &str) -> Option<&'static BoostArchetype> {
    match_archetype(persona, BOOST_LEXICON)
}

/// Expand a persona and task into a natural-language search query.
///
/// # Examples
///
/// ```
/// use outline_oxide::persona::generate_query;
///
/// let q = generate_query("Food Contractor", "prepare a vegetarian buffet");
/// assert!(q.starts_with("As a Food Contractor, I need to prepare a vegetarian buffet. "));
/// assert!(q.contains("menu planning, food preparation"));
/// ```
pub fn generate_query(persona: &str, task: &str) -> String {
    format!(
        "As a {}, I need to {}. Focus on information related to {}. Provide actionable insights \
         that help me organize or coordinate or arrange the relevant aspects. Prioritize \
         practical, detailed information over general overviews.",
        persona,
        task,
        query_keywords(persona)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_substring_match() {
        assert_eq!(query_keywords("senior travel planner (EU)"), QUERY_LEXICON[0].keywords);
        assert_eq!(query_keywords("PhD RESEARCHER"), QUERY_LEXICON[3].keywords);
    }

    #[test]
    fn test_lexicon_order_breaks_ties() {
        // Both "Financial Analyst" and "Investment Analyst" are absent, but
        // "Researcher" and "HR Professional" both match: the earlier wins.
        assert_eq!(
            match_archetype("HR Professional and Researcher", QUERY_LEXICON).map(|a| a.name),
            Some("HR Professional")
        );
    }

    #[test]
    fn test_default_keywords() {
        assert_eq!(query_keywords("Astronaut"), DEFAULT_QUERY_KEYWORDS);
        assert_eq!(query_keywords(""), DEFAULT_QUERY_KEYWORDS);
    }

    #[test]
    fn test_query_template() {
        let q = generate_query("Astronaut", "fix the airlock");
        assert_eq!(
            q,
            "As a Astronaut, I need to fix the airlock. Focus on information related to relevant \
             information, key insights, actionable details. Provide actionable insights that help \
             me organize or coordinate or arrange the relevant aspects. Prioritize practical, \
             detailed information over general overviews."
        );
    }

    #[test]
    fn test_boost_lexicon_is_distinct() {
        assert!(boost_archetype("Investment Analyst").is_none());
        assert_eq!(boost_archetype("food contractor").map(|a| a.factor), Some(1.3));
        assert!(!BOOST_LEXICON[3].keywords.contains(&"conclusion"));
    }
}
