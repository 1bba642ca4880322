//! JSON input and output artifacts of a ranking run.

use crate::ranking::RankingResult;
use serde::{Deserialize, Serialize};

/// Collection input file name.
pub const INPUT_FILE: &str = "challenge1b_input.json";

/// Collection output file name.
pub const OUTPUT_FILE: &str = "challenge1b_output.json";

/// Directory (inside a collection) holding the documents.
pub const DOCUMENTS_DIR: &str = "PDFs";

/// Optional run description echoed by callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeInfo {
    /// Challenge identifier
    pub challenge_id: Option<String>,
    /// Test case name
    pub test_case_name: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A document named by the collection input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name inside the documents directory
    pub filename: String,
    /// Human title
    #[serde(default)]
    pub title: String,
}

/// The reader persona.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Role description ("Travel Planner")
    #[serde(default)]
    pub role: String,
}

/// The reader's task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    /// Task description
    #[serde(default)]
    pub task: String,
}

/// Contents of `challenge1b_input.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInput {
    /// Optional run description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_info: Option<ChallengeInfo>,
    /// Documents to analyze, in order
    pub documents: Vec<DocumentRef>,
    /// Reader persona
    #[serde(default)]
    pub persona: Persona,
    /// Reader task
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
}

/// Run metadata echoed into the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingMetadata {
    /// Input document file names, in input order
    pub input_documents: Vec<String>,
    /// Persona role
    pub persona: String,
    /// Task
    pub job_to_be_done: String,
    /// Expanded query
    pub generated_query: String,
    /// Chunks ranked before diversity filtering
    pub total_chunks_processed: usize,
    /// Whether the per-document cap was applied
    pub diversity_enforced: bool,
    /// UTC RFC 3339 time of the run
    pub processing_timestamp: String,
}

/// One ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document
    pub document: String,
    /// Section title
    pub section_title: String,
    /// 1-based rank
    pub importance_rank: usize,
    /// Page where the passage began
    pub page_number: u32,
}

/// The passage text behind a ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Source document
    pub document: String,
    /// Cleaned passage text
    pub refined_text: String,
    /// Page where the passage began
    pub page_number: u32,
}

/// Contents of `challenge1b_output.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingArtifact {
    /// Run metadata
    pub metadata: RankingMetadata,
    /// Ranked sections
    pub extracted_sections: Vec<ExtractedSection>,
    /// Passage text per ranked section, same order
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl RankingArtifact {
    /// Assemble the artifact for a finished run.
    pub fn new(
        input: &CollectionInput,
        generated_query: String,
        result: &RankingResult,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let metadata = RankingMetadata {
            input_documents: input.documents.iter().map(|d| d.filename.clone()).collect(),
            persona: input.persona.role.clone(),
            job_to_be_done: input.job_to_be_done.task.clone(),
            generated_query,
            total_chunks_processed: result.considered,
            diversity_enforced: true,
            processing_timestamp: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        };

        let extracted_sections = result
            .chunks
            .iter()
            .map(|s| ExtractedSection {
                document: s.chunk.document.clone(),
                section_title: s.chunk.section_title.clone(),
                importance_rank: s.importance_rank,
                page_number: s.chunk.page_number,
            })
            .collect();

        let subsection_analysis = result
            .chunks
            .iter()
            .map(|s| SubsectionAnalysis {
                document: s.chunk.document.clone(),
                refined_text: s.chunk.text.clone(),
                page_number: s.chunk.page_number,
            })
            .collect();

        Self {
            metadata,
            extracted_sections,
            subsection_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_input_without_challenge_info() {
        let input: CollectionInput = serde_json::from_str(
            r#"{"documents": [{"filename": "a.pdf", "title": "A"}],
                "persona": {"role": "Travel Planner"},
                "job_to_be_done": {"task": "Plan a trip"}}"#,
        )
        .unwrap();
        assert!(input.challenge_info.is_none());
        assert_eq!(input.documents[0].filename, "a.pdf");
        assert_eq!(input.persona.role, "Travel Planner");
    }

    #[test]
    fn test_parse_input_with_challenge_info() {
        let input: CollectionInput = serde_json::from_str(
            r#"{"challenge_info": {"challenge_id": "round_1b_002", "test_case_name": "travel_planner"},
                "documents": [], "persona": {"role": "x"}, "job_to_be_done": {"task": "y"}}"#,
        )
        .unwrap();
        let info = input.challenge_info.unwrap();
        assert_eq!(info.challenge_id.as_deref(), Some("round_1b_002"));
        assert!(info.description.is_none());
    }

    #[test]
    fn test_empty_result_artifact() {
        let input = CollectionInput {
            challenge_info: None,
            documents: vec![DocumentRef {
                filename: "a.pdf".to_string(),
                title: String::new(),
            }],
            persona: Persona { role: "HR Professional".to_string() },
            job_to_be_done: JobToBeDone { task: "Onboard staff".to_string() },
        };
        let ts = chrono::Utc.with_ymd_and_hms(2025, 7, 10, 9, 30, 0).unwrap();
        let artifact = RankingArtifact::new(&input, "q".to_string(), &RankingResult::default(), ts);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["metadata"]["processing_timestamp"], "2025-07-10T09:30:00Z");
        assert_eq!(json["metadata"]["total_chunks_processed"], 0);
        assert_eq!(json["metadata"]["diversity_enforced"], true);
        assert_eq!(json["extracted_sections"], serde_json::json!([]));
        assert_eq!(json["subsection_analysis"], serde_json::json!([]));
    }
}
