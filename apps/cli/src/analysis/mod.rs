/// Analysis client — the single point of entry for all Gemini API calls in
/// MatchSkill.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
///
/// Model: gemini-3-flash-preview (hardcoded — do not make configurable to
/// prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::models::AnalysisResult;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all analysis calls.
pub const MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Boundary seam for the analysis exchange. Lets the view layer be driven
/// against a mock model in tests.
#[async_trait]
pub trait MatchAnalyzer: Send + Sync {
    /// One prompt, one request, one atomic structured result. The credential
    /// is supplied per request, sourced from the user settings.
    async fn analyze(
        &self,
        job_description: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<AnalysisResult, AppError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_tokens: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidate_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate part, if any.
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

/// Response schema sent with every request — the canonical six-field
/// superset. The four list fields are required; the post draft and search
/// query are optional.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Pontos onde o currículo atende perfeitamente à vaga."
            },
            "weaknesses": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Gaps técnicos ou comportamentais identificados."
            },
            "improvementPlan": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Passos práticos para melhorar o perfil para essa vaga específica."
            },
            "interviewTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Dicas de como se portar ou o que enfatizar em uma entrevista para esta posição."
            },
            "linkedinPost": {
                "type": "STRING",
                "description": "Rascunho de post para o LinkedIn sobre a busca por esta vaga."
            },
            "jobSearchQuery": {
                "type": "STRING",
                "description": "Termo curto de busca para encontrar vagas semelhantes."
            }
        },
        "required": ["strengths", "weaknesses", "improvementPlan", "interviewTips"],
        "propertyOrdering": [
            "strengths", "weaknesses", "improvementPlan",
            "interviewTips", "linkedinPost", "jobSearchQuery"
        ]
    })
}

/// The single Gemini client used by the application. Holds no credential:
/// the API key travels with each request.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn build_request(prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: prompts::ANALYSIS_SYSTEM.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchAnalyzer for GeminiClient {
    async fn analyze(
        &self,
        job_description: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<AnalysisResult, AppError> {
        let prompt = prompts::ANALYSIS_PROMPT_TEMPLATE
            .replace("{job_description}", job_description)
            .replace("{resume_text}", resume_text);
        let body = GeminiClient::build_request(prompt);

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        // Single attempt. A failed exchange is surfaced whole and the user
        // re-triggers manually.
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AnalysisRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AppError::AnalysisRequest(format!(
                "status {status}: {message}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::AnalysisRequest(e.to_string()))?;

        if let Some(usage) = &payload.usage {
            debug!(
                "analysis call succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                usage.prompt_tokens, usage.candidate_tokens
            );
        }

        let text = payload
            .text()
            .ok_or_else(|| AppError::AnalysisParse("empty model response".to_string()))?;
        parse_result(text)
    }
}

/// Parses the model's JSON payload against the canonical schema. Malformed
/// or incomplete payloads are rejected whole — no partial result escapes.
pub fn parse_result(text: &str) -> Result<AnalysisResult, AppError> {
    let text = strip_json_fences(text);
    serde_json::from_str(text).map_err(|e| AppError::AnalysisParse(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "strengths": ["a"],
        "weaknesses": ["b"],
        "improvementPlan": ["c"],
        "interviewTips": ["d"],
        "linkedinPost": "p",
        "jobSearchQuery": "q"
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_result_accepts_full_payload() {
        let result = parse_result(FULL_PAYLOAD).unwrap();
        assert_eq!(result.strengths, vec!["a"]);
        assert_eq!(result.job_search_query.as_deref(), Some("q"));
    }

    #[test]
    fn test_parse_result_accepts_fenced_payload() {
        let fenced = format!("```json\n{FULL_PAYLOAD}\n```");
        assert!(parse_result(&fenced).is_ok());
    }

    #[test]
    fn test_parse_result_rejects_malformed_json() {
        let err = parse_result("strengths: a, b, c").unwrap_err();
        assert!(matches!(err, AppError::AnalysisParse(_)));
    }

    #[test]
    fn test_parse_result_rejects_missing_required_fields() {
        let err = parse_result(r#"{"strengths": ["a"]}"#).unwrap_err();
        assert!(matches!(err, AppError::AnalysisParse(_)));
    }

    #[test]
    fn test_request_body_carries_schema_constraint_and_prompt() {
        let prompt = prompts::ANALYSIS_PROMPT_TEMPLATE
            .replace("{job_description}", "Senior Go Engineer")
            .replace("{resume_text}", "5 years Go");
        let body = GeminiClient::build_request(prompt);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            prompts::ANALYSIS_SYSTEM
        );
        let user_text = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(user_text.contains("Senior Go Engineer"));
        assert!(user_text.contains("5 years Go"));
    }

    #[test]
    fn test_response_schema_requires_exactly_the_four_list_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["strengths", "weaknesses", "improvementPlan", "interviewTips"]
        );
        assert_eq!(schema["properties"].as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("hello"));
    }

    #[test]
    fn test_empty_candidates_yield_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), None);
    }
}
