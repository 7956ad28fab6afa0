use thiserror::Error;

/// Application-level error taxonomy. Every failure is terminal for the
/// action that triggered it; recovery is always a manual retry by the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("no extractable text in PDF")]
    NoExtractableText,

    #[error("PDF extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("API credential is not configured")]
    MissingCredential,

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("analysis request failed: {0}")]
    AnalysisRequest(String),

    #[error("analysis response could not be parsed: {0}")]
    AnalysisParse(String),
}

impl AppError {
    /// Converts the error into the single human-readable message shown in
    /// the view's error slot. Internal detail goes to the logs only.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnsupportedFileType(path) => {
                tracing::debug!("rejected non-PDF upload: {path}");
                "Por favor, selecione apenas arquivos PDF.".to_string()
            }
            AppError::NoExtractableText => {
                "Não foi possível extrair texto deste PDF. Tente um arquivo diferente.".to_string()
            }
            AppError::ExtractionFailed(e) => {
                tracing::error!("PDF extraction failed: {e}");
                "Falha ao processar o PDF.".to_string()
            }
            AppError::MissingCredential => {
                "Configure sua Gemini API Key nas definições.".to_string()
            }
            AppError::MissingInput(_) => {
                "Insira a descrição da vaga e faça upload do currículo.".to_string()
            }
            AppError::AnalysisRequest(e) => {
                tracing::error!("analysis request failed: {e}");
                "Erro de processamento. Tente novamente.".to_string()
            }
            AppError::AnalysisParse(e) => {
                tracing::error!("analysis response parse failed: {e}");
                "Falha ao analisar os dados. Tente novamente.".to_string()
            }
        }
    }
}
