//! Data contract for the analysis exchange.

use serde::{Deserialize, Serialize};

/// Structured feedback from one analysis call. The result is atomic: either
/// every required field parses or the whole payload is rejected — partial
/// results never exist. Wire format is camelCase, matching the response
/// schema sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_plan: Vec<String>,
    pub interview_tips: Vec<String>,
    #[serde(default)]
    pub linkedin_post: Option<String>,
    #[serde(default)]
    pub job_search_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_six_field_payload_deserializes() {
        let json = r#"{
            "strengths": ["a"],
            "weaknesses": ["b"],
            "improvementPlan": ["c"],
            "interviewTips": ["d"],
            "linkedinPost": "p",
            "jobSearchQuery": "q"
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.strengths, vec!["a"]);
        assert_eq!(result.weaknesses, vec!["b"]);
        assert_eq!(result.improvement_plan, vec!["c"]);
        assert_eq!(result.interview_tips, vec!["d"]);
        assert_eq!(result.linkedin_post.as_deref(), Some("p"));
        assert_eq!(result.job_search_query.as_deref(), Some("q"));
    }

    #[test]
    fn test_four_field_payload_still_deserializes() {
        // The auxiliary fields are optional in the canonical schema.
        let json = r#"{
            "strengths": ["s"],
            "weaknesses": [],
            "improvementPlan": ["i1", "i2"],
            "interviewTips": ["t"]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert!(result.linkedin_post.is_none());
        assert!(result.job_search_query.is_none());
        assert_eq!(result.improvement_plan.len(), 2);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = r#"{
            "strengths": ["a"],
            "weaknesses": ["b"],
            "interviewTips": ["d"]
        }"#;

        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }
}
