//! Instruction templates for the language-model calls.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing how sections are summarised or
//!    translated requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the rendered prompts directly
//!    without a live model, making prompt regressions easy to catch.
//!
//! Callers can override the summary system prompt via
//! [`crate::config::AnalysisConfig::summary_system_prompt`]; the constants
//! here are used only when no override is provided.

/// Default system prompt for summarising a paper abstract.
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"As an expert academic researcher and technical writing specialist with extensive experience in analyzing and summarizing scientific literature, your task is to transform complex academic abstracts into clear, structured Korean summaries.

### INSTRUCTIONS

Analyze the provided academic paper abstract and create a comprehensive summary following the structure and requirements below.

### STRUCTURE REQUIREMENTS

Your summary must follow this exact three-part framework in sequential order:

1. **문제상황 (Problem Context)**: the limitations of existing methods or the core problem the research addresses
2. **실험방법 (Methodology)**: the proposed approach, methodology, or experimental design
3. **결과 (Results/Outcomes)**: the key findings, achievements, or conclusions reached

### FORMATTING SPECIFICATIONS

- **Length**: exactly 3-5 bullet points (adjust based on abstract complexity)
- **Language**: all content in Korean, except for technical terminology
- **Sentence Structure**: each bullet point must be exactly one concise sentence
- **Organization**: front-loaded — place the most critical information at the beginning of each sentence
- **Technical Terms**: preserve original English technical terminology and specialized vocabulary
- **Sequence**: maintain strict problem → method → results progression

### OUTPUT FORMAT

```
• [문제상황 관련 핵심 내용을 담은 간결한 문장]
• [실험방법 관련 핵심 내용을 담은 간결한 문장]
• [결과 관련 핵심 내용을 담은 간결한 문장]
• [추가 문제상황/방법/결과 내용 - 필요시만]
• [추가 문제상황/방법/결과 내용 - 필요시만]
```

### QUALITY STANDARDS

- Capture the essential meaning without losing technical accuracy
- Maintain academic tone while improving readability
- Eliminate redundancy and focus on core contributions"#;

/// Build the user prompt for abstract summarisation.
pub fn summary_user_prompt(abstract_text: &str, title: &str) -> String {
    format!(
        r#"Please analyze the following computer science research paper and provide a structured summary.

**Paper Title**: {title}

**Abstract**: {abstract_text}

Based on the instructions above, provide a structured Korean summary with 3-5 bullet points following the problem → method → results framework. Each bullet point must be exactly one sentence in Korean, preserving English technical terminology where appropriate."#
    )
}

/// Build the per-chunk instruction for section content analysis.
///
/// The model translates and reorganises one text chunk of a paper section
/// into formal-register Korean bullet points; the response is used verbatim
/// as the chunk's transformed text.
pub fn content_analysis_prompt(chunk_text: &str) -> String {
    format!(
        r#"You are an expert academic translator and editor. Translate and reorganize the following excerpt from a research paper into formal-register Korean bullet points.

Rules:
- Preserve English technical terms, model names, and mathematical notation verbatim.
- If the excerpt is a reference list or bibliography, keep its formatting verbatim; do not summarize it.
- If the excerpt contains a table, keep the table structure verbatim and translate only the cell contents.
- Remove non-substantive content: author bylines, advertisements, and forward references such as "as we will see in Section 5".
- Output only the reorganized content, without commentary.

Excerpt:

"""{chunk_text}""""#
    )
}
