// Prompt constants for the analysis exchange. The wording is the product's
// original Portuguese copy; both inputs are interpolated verbatim.

/// System instruction — frames the model as a recruiting expert and
/// enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str =
    "Você é um especialista em Recrutamento e Seleção de alto nível. \
     Analise criticamente currículos contra descrições de vagas. \
     Seja honesto, direto e construtivo. Retorne sempre em formato JSON.";

/// Analysis prompt template. Replace `{job_description}` and `{resume_text}`
/// before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = "\
Analise a compatibilidade entre esta descrição de vaga e este currículo.

Vaga:
{job_description}

Currículo:
{resume_text}
";
