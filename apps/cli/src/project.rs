//! Project view — orchestrates extraction and analysis and holds all
//! transient screen state. The view itself performs no I/O: the driver runs
//! the jobs it hands out and delivers completions back.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::AppError;
use crate::extractor;
use crate::models::AnalysisResult;
use crate::settings::UserSettings;

/// Fixed query-string template for the external job-search action.
const JOB_SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/?keywords=";

/// An extraction the driver must run. Its completion is delivered back
/// through [`ProjectView::apply_extraction`], tagged with the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    pub file_name: String,
    pub path: PathBuf,
}

/// Payload for one analysis request, produced only after every precondition
/// holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume_text: String,
    pub api_key: String,
}

#[derive(Debug, Default)]
pub struct ProjectView {
    job_description: String,
    resume_text: String,
    file_name: Option<String>,
    extracting: bool,
    analyzing: bool,
    error: Option<String>,
    result: Option<AnalysisResult>,
}

impl ProjectView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn extracting(&self) -> bool {
        self.extracting
    }

    pub fn analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Starts an upload. A new selection always supersedes the previous
    /// one: the returned job's file name becomes the only identity whose
    /// completion will still be accepted.
    pub fn begin_upload(&mut self, path: &Path) -> Option<ExtractionJob> {
        if !extractor::is_pdf(path) {
            self.error =
                Some(AppError::UnsupportedFileType(path.display().to_string()).user_message());
            return None;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("curriculo.pdf")
            .to_string();

        self.error = None;
        self.file_name = Some(file_name.clone());
        self.resume_text.clear();
        self.extracting = true;

        Some(ExtractionJob {
            file_name,
            path: path.to_path_buf(),
        })
    }

    /// Delivers an extraction completion. Completions for a superseded
    /// upload are discarded by file identity, regardless of arrival order.
    pub fn apply_extraction(&mut self, file_name: &str, outcome: Result<String, AppError>) {
        if self.file_name.as_deref() != Some(file_name) {
            debug!("discarding stale extraction result for {file_name}");
            return;
        }

        self.extracting = false;
        match outcome {
            Ok(text) => self.resume_text = text,
            Err(e) => {
                self.error = Some(e.user_message());
                self.file_name = None;
                self.resume_text.clear();
            }
        }
    }

    /// Clears the uploaded résumé and its extracted text.
    pub fn remove_resume(&mut self) {
        self.file_name = None;
        self.resume_text.clear();
        self.extracting = false;
    }

    /// Validates preconditions and, when they all hold, marks an analysis
    /// as in flight and returns its request payload. While extraction or a
    /// prior analysis is pending this is a no-op: the triggering control is
    /// disabled, so no duplicate request can start.
    pub fn begin_analysis(&mut self, settings: &UserSettings) -> Option<AnalysisRequest> {
        if self.extracting || self.analyzing {
            return None;
        }

        self.error = None;
        if settings.api_key.trim().is_empty() {
            self.error = Some(AppError::MissingCredential.user_message());
            return None;
        }
        if self.job_description.trim().is_empty() || self.resume_text.trim().is_empty() {
            self.error = Some(
                AppError::MissingInput("job description and resume text".to_string())
                    .user_message(),
            );
            return None;
        }

        self.analyzing = true;
        Some(AnalysisRequest {
            job_description: self.job_description.clone(),
            resume_text: self.resume_text.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Delivers the analysis outcome. A failure fills the error slot and
    /// leaves any previous result untouched.
    pub fn apply_analysis(&mut self, outcome: Result<AnalysisResult, AppError>) {
        self.analyzing = false;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(e) => self.error = Some(e.user_message()),
        }
    }

    pub fn linkedin_post(&self) -> Option<&str> {
        self.result.as_ref()?.linkedin_post.as_deref()
    }

    /// Builds the external job-search URL from the returned query, or
    /// `None` when the result carries no query.
    pub fn job_search_url(&self) -> Option<String> {
        let query = self.result.as_ref()?.job_search_query.as_deref()?;
        Some(format!("{JOB_SEARCH_URL}{}", urlencoding::encode(query)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::MatchAnalyzer;
    use crate::theme::ThemeColor;

    fn settings_with_key(api_key: &str) -> UserSettings {
        UserSettings {
            name: "Candidato".to_string(),
            api_key: api_key.to_string(),
            theme_color: ThemeColor::Emerald,
        }
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            strengths: vec!["a".to_string()],
            weaknesses: vec!["b".to_string()],
            improvement_plan: vec!["c".to_string()],
            interview_tips: vec!["d".to_string()],
            linkedin_post: Some("p".to_string()),
            job_search_query: Some("q".to_string()),
        }
    }

    /// Uploads a résumé and completes its extraction with the given text.
    fn view_with_resume(text: &str) -> ProjectView {
        let mut view = ProjectView::new();
        let job = view.begin_upload(Path::new("cv.pdf")).unwrap();
        view.apply_extraction(&job.file_name, Ok(text.to_string()));
        view
    }

    #[test]
    fn test_missing_credential_blocks_analysis_before_any_request() {
        let mut view = view_with_resume("5 years Go");
        view.set_job_description("Senior Go Engineer");

        let request = view.begin_analysis(&settings_with_key(""));

        assert!(request.is_none());
        assert_eq!(
            view.error(),
            Some(AppError::MissingCredential.user_message().as_str())
        );
    }

    #[test]
    fn test_missing_inputs_block_analysis() {
        let mut view = ProjectView::new();
        view.set_job_description("Senior Go Engineer");

        let request = view.begin_analysis(&settings_with_key("abc123"));

        assert!(request.is_none());
        assert_eq!(
            view.error(),
            Some(
                AppError::MissingInput(String::new())
                    .user_message()
                    .as_str()
            )
        );
    }

    #[test]
    fn test_analysis_request_carries_both_texts_and_credential() {
        let mut view = view_with_resume("5 anos de Go");
        view.set_job_description("Engenheiro Go Sênior");

        let request = view.begin_analysis(&settings_with_key("abc123")).unwrap();

        assert_eq!(request.job_description, "Engenheiro Go Sênior");
        assert_eq!(request.resume_text, "5 anos de Go");
        assert_eq!(request.api_key, "abc123");
        assert!(view.analyzing());
    }

    #[test]
    fn test_no_duplicate_analysis_while_one_is_in_flight() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");
        let settings = settings_with_key("abc123");

        assert!(view.begin_analysis(&settings).is_some());
        assert!(view.begin_analysis(&settings).is_none());
    }

    #[test]
    fn test_analysis_blocked_while_extraction_in_flight() {
        let mut view = ProjectView::new();
        view.set_job_description("X");
        view.begin_upload(Path::new("cv.pdf")).unwrap();

        assert!(view.extracting());
        assert!(view.begin_analysis(&settings_with_key("abc123")).is_none());
    }

    #[test]
    fn test_non_pdf_upload_is_rejected_with_error() {
        let mut view = ProjectView::new();
        let job = view.begin_upload(Path::new("foto.png"));

        assert!(job.is_none());
        assert!(!view.extracting());
        assert!(view.file_name().is_none());
        assert_eq!(
            view.error(),
            Some("Por favor, selecione apenas arquivos PDF.")
        );
    }

    #[test]
    fn test_new_upload_supersedes_in_flight_extraction() {
        let mut view = ProjectView::new();
        let first = view.begin_upload(Path::new("resume.pdf")).unwrap();
        let second = view.begin_upload(Path::new("resume2.pdf")).unwrap();

        // The first completion arrives after the second upload started.
        view.apply_extraction(&first.file_name, Ok("texto antigo".to_string()));
        assert!(view.extracting());
        assert_eq!(view.resume_text(), "");

        view.apply_extraction(&second.file_name, Ok("texto novo".to_string()));
        assert!(!view.extracting());
        assert_eq!(view.resume_text(), "texto novo");
        assert_eq!(view.file_name(), Some("resume2.pdf"));
    }

    #[test]
    fn test_failed_extraction_clears_file_and_reports() {
        let mut view = ProjectView::new();
        let job = view.begin_upload(Path::new("cv.pdf")).unwrap();

        view.apply_extraction(&job.file_name, Err(AppError::NoExtractableText));

        assert!(view.file_name().is_none());
        assert_eq!(view.resume_text(), "");
        assert_eq!(
            view.error(),
            Some("Não foi possível extrair texto deste PDF. Tente um arquivo diferente.")
        );
    }

    #[test]
    fn test_failed_reanalysis_keeps_previous_result() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");
        let settings = settings_with_key("abc123");

        view.begin_analysis(&settings).unwrap();
        view.apply_analysis(Ok(sample_result()));
        assert!(view.result().is_some());

        view.begin_analysis(&settings).unwrap();
        view.apply_analysis(Err(AppError::AnalysisRequest("timeout".to_string())));

        assert!(view.result().is_some(), "previous result must be retained");
        assert_eq!(view.error(), Some("Erro de processamento. Tente novamente."));
    }

    #[test]
    fn test_error_slot_cleared_when_new_action_starts() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");

        // Leave a validation error in the slot.
        assert!(view.begin_analysis(&settings_with_key("")).is_none());
        assert!(view.error().is_some());

        // A valid trigger clears it immediately.
        assert!(view.begin_analysis(&settings_with_key("abc123")).is_some());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_successful_result_exposes_all_sections() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");

        view.begin_analysis(&settings_with_key("abc123")).unwrap();
        view.apply_analysis(Ok(sample_result()));

        let result = view.result().unwrap();
        assert_eq!(result.strengths, vec!["a"]);
        assert_eq!(result.weaknesses, vec!["b"]);
        assert_eq!(result.improvement_plan, vec!["c"]);
        assert_eq!(result.interview_tips, vec!["d"]);
        assert_eq!(view.linkedin_post(), Some("p"));
        assert_eq!(
            view.job_search_url().unwrap(),
            "https://www.linkedin.com/jobs/search/?keywords=q"
        );
    }

    #[test]
    fn test_job_search_url_is_percent_encoded() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");
        view.begin_analysis(&settings_with_key("abc123")).unwrap();

        let mut result = sample_result();
        result.job_search_query = Some("engenheiro go sênior".to_string());
        view.apply_analysis(Ok(result));

        let url = view.job_search_url().unwrap();
        assert!(url.starts_with("https://www.linkedin.com/jobs/search/?keywords="));
        assert!(url.contains("engenheiro%20go%20s%C3%AAnior"));
    }

    #[test]
    fn test_job_search_url_absent_without_query() {
        let mut view = view_with_resume("Y");
        view.set_job_description("X");
        view.begin_analysis(&settings_with_key("abc123")).unwrap();

        let mut result = sample_result();
        result.job_search_query = None;
        result.linkedin_post = None;
        view.apply_analysis(Ok(result));

        assert!(view.job_search_url().is_none());
        assert!(view.linkedin_post().is_none());
    }

    #[test]
    fn test_remove_resume_clears_slot() {
        let mut view = view_with_resume("texto");
        assert_eq!(view.file_name(), Some("cv.pdf"));

        view.remove_resume();

        assert!(view.file_name().is_none());
        assert_eq!(view.resume_text(), "");
    }

    struct FakeAnalyzer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MatchAnalyzer for FakeAnalyzer {
        async fn analyze(
            &self,
            job_description: &str,
            resume_text: &str,
            api_key: &str,
        ) -> Result<AnalysisResult, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(job_description, "X");
            assert_eq!(resume_text, "Y");
            assert_eq!(api_key, "abc123");
            Ok(sample_result())
        }
    }

    #[tokio::test]
    async fn test_full_trigger_flow_against_mock_boundary() {
        let analyzer = FakeAnalyzer {
            calls: AtomicUsize::new(0),
        };
        let mut view = view_with_resume("Y");
        view.set_job_description("X");

        let request = view.begin_analysis(&settings_with_key("abc123")).unwrap();
        let outcome = analyzer
            .analyze(
                &request.job_description,
                &request.resume_text,
                &request.api_key,
            )
            .await;
        view.apply_analysis(outcome);

        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
        assert!(!view.analyzing());
        assert!(view.result().is_some());
        assert!(view.error().is_none());
    }
}
