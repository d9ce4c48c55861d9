//! The grounded question-answering pipeline.
//!
//! A question goes through four steps:
//! 1. the document's pages are ranked and the best `top_k` kept,
//! 2. the sentences of those pages become the candidate sources,
//! 3. an [`AnswerGenerator`] writes an answer from the candidates,
//! 4. the answer is aligned onto the candidates and rebuilt from source sentences only.
//!
//! Nothing here talks to a model. Generators are injected, and the CLI uses
//! [`StaticGenerator`] to verify answers produced elsewhere.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use veritas_align::{Aligner, AlignmentRecord, GroundingTier, ground};
use veritas_config::Config;
use veritas_rank::Bm25Ranker;

use crate::{Document, GenerationError, PipelineError};

/// Answer when no page survives ranking.
pub const NO_RELEVANT_PAGE: &str = "Aucune page pertinente n'a été trouvée dans le document.";

/// Answer when the selected pages yield no usable sentence.
pub const NO_RELEVANT_SENTENCE: &str =
    "Aucune phrase pertinente n'a été trouvée dans les pages sélectionnées.";

/// Raw answer substituted when the generator fails.
pub const GENERATION_FAILED: &str =
    "Impossible de générer une réponse cohérente à partir des phrases sélectionnées.";

/// Quoted fragments this short (in characters) are not taken for sentences.
const MIN_SALVAGED_CHARS: usize = 20;

/// A non-empty double-quoted fragment.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("invalid QUOTED"));

/// Writes an answer to a question from candidate sentences.
pub trait AnswerGenerator {
    /// Generates an answer. The text is untrusted and will be aligned afterwards.
    fn generate(&self, question: &str, candidates: &[String]) -> Result<String, GenerationError>;
}

/// Returns a fixed answer, whatever the question.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    /// The answer to return.
    text: String,
}

impl StaticGenerator {
    /// Creates a generator that always answers `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AnswerGenerator for StaticGenerator {
    fn generate(&self, _question: &str, _candidates: &[String]) -> Result<String, GenerationError> {
        if self.text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(self.text.clone())
    }
}

/// Everything the pipeline produced for one question.
#[derive(Debug, Clone, Serialize)]
pub struct GroundedReport {
    /// The question asked.
    pub question: String,
    /// Final answer, made of source sentences only (or a fixed message).
    pub answer: String,
    /// How the answer was obtained. `None` when the pipeline stopped before generation.
    pub tier: Option<GroundingTier>,
    /// Generator output before alignment.
    pub raw_answer: String,
    /// Candidate sentences the answer was aligned against.
    pub source_sentences: Vec<String>,
    /// One record per generated sentence.
    pub alignment_details: Vec<AlignmentRecord>,
    /// Selected page indices, best first.
    pub source_pages: Vec<usize>,
}

impl GroundedReport {
    /// A report for a pipeline that stopped before generating anything.
    fn stopped(question: &str, answer: &str, source_pages: Vec<usize>) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            tier: None,
            raw_answer: String::new(),
            source_sentences: Vec::new(),
            alignment_details: Vec::new(),
            source_pages,
        }
    }
}

/// Answers questions about one document.
pub struct Pipeline {
    /// The document being queried.
    document: Document,
    /// Sentences of each page, computed once.
    sentences: Vec<Vec<String>>,
    /// Page ranker.
    ranker: Bm25Ranker,
    /// Answer aligner.
    aligner: Aligner,
    /// Maximum pages selected per question.
    top_k: usize,
}

impl Pipeline {
    /// Creates a pipeline from its parts.
    pub fn new(document: Document, ranker: Bm25Ranker, aligner: Aligner, top_k: usize) -> Self {
        let sentences = document.sentences_by_page();
        Self {
            document,
            sentences,
            ranker,
            aligner,
            top_k,
        }
    }

    /// Creates a pipeline with the ranking and alignment settings of `config`.
    pub fn from_config(document: Document, config: &Config) -> Result<Self, PipelineError> {
        let ranker = Bm25Ranker::from_config(config)?;
        let aligner = Aligner::new(config.alignment.primary_threshold)?;
        Ok(Self::new(document, ranker, aligner, config.ranking.top_k))
    }

    /// The document being queried.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page indices selected for `question`, best first.
    ///
    /// Documents with no more than `top_k` pages are returned whole, in page order.
    pub fn select_pages(&self, question: &str) -> Vec<usize> {
        self.ranker
            .rank_pages(self.document.pages(), question, Some(self.top_k))
    }

    /// Sentences of `pages`, in the order the pages are given.
    pub fn candidate_sentences(&self, pages: &[usize]) -> Vec<String> {
        pages
            .iter()
            .filter_map(|&page| self.sentences.get(page))
            .flatten()
            .cloned()
            .collect()
    }

    /// Answers `question` using every sentence of the selected pages as a source.
    pub fn answer(&self, question: &str, generator: &dyn AnswerGenerator) -> GroundedReport {
        self.run(question, None, generator)
    }

    /// Answers `question` using an upstream selection of sentences as the sources.
    ///
    /// Pages are still ranked: an empty ranking stops the pipeline, and the selected pages
    /// are reported.
    pub fn answer_with_selection(
        &self,
        question: &str,
        selected: &[String],
        generator: &dyn AnswerGenerator,
    ) -> GroundedReport {
        self.run(question, Some(selected), generator)
    }

    /// Runs the pipeline.
    fn run(
        &self,
        question: &str,
        selected: Option<&[String]>,
        generator: &dyn AnswerGenerator,
    ) -> GroundedReport {
        let pages = self.select_pages(question);
        if pages.is_empty() {
            debug!("no page selected");
            return GroundedReport::stopped(question, NO_RELEVANT_PAGE, pages);
        }

        let sources = match selected {
            Some(selected) => selected.to_vec(),
            None => self.candidate_sentences(&pages),
        };
        if sources.is_empty() {
            debug!(pages = pages.len(), "selected pages have no sentences");
            return GroundedReport::stopped(question, NO_RELEVANT_SENTENCE, pages);
        }
        debug!(
            pages = pages.len(),
            sentences = sources.len(),
            "candidate sources gathered"
        );

        let raw_answer = generator
            .generate(question, &sources)
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to the generation failure message");
                GENERATION_FAILED.to_string()
            });

        let records = self.aligner.align(&raw_answer, &sources);
        let grounded = ground(&records);

        GroundedReport {
            question: question.to_string(),
            answer: grounded.text,
            tier: Some(grounded.tier),
            raw_answer,
            source_sentences: sources,
            alignment_details: records,
            source_pages: pages,
        }
    }
}

/// Upstream sentence-selection output.
#[derive(Deserialize)]
struct SentenceSelection {
    /// Sentences picked upstream.
    #[serde(default)]
    selected_sentences: Vec<String>,
}

/// Extracts selected sentences from an upstream selection output.
///
/// The output should be JSON with a `selected_sentences` array. When it is not valid JSON,
/// every double-quoted fragment longer than 20 characters is taken instead.
pub fn parse_selected_sentences(output: &str) -> Vec<String> {
    if let Ok(selection) = serde_json::from_str::<SentenceSelection>(output) {
        return selection.selected_sentences;
    }

    let salvaged: Vec<String> = quoted_fragments(output)
        .into_iter()
        .filter(|fragment| fragment.chars().count() > MIN_SALVAGED_CHARS)
        .map(String::from)
        .collect();
    warn!(
        salvaged = salvaged.len(),
        "sentence selection is not valid JSON, salvaged quoted fragments"
    );
    salvaged
}

/// Non-empty fragments between pairs of double quotes, scanning left to right.
fn quoted_fragments(text: &str) -> Vec<&str> {
    QUOTED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use veritas_align::REFUSAL;

    use super::*;

    /// Three pages of a data protection policy.
    const PAGES: [&str; 3] = [
        "Les données personnelles sont conservées pendant cinq ans. Elles sont ensuite archivées.",
        "Le responsable du traitement procède à l'effacement des données sur demande.",
        "Le présent règlement entre en vigueur le premier janvier.",
    ];

    /// A generator that always fails.
    struct FailingGenerator;

    impl AnswerGenerator for FailingGenerator {
        fn generate(&self, _: &str, _: &[String]) -> Result<String, GenerationError> {
            Err(GenerationError::Failed("model unavailable".into()))
        }
    }

    /// Pipeline over `PAGES` with the default configuration.
    fn pipeline() -> Pipeline {
        Pipeline::from_config(Document::from_pages(&PAGES), &Config::default()).unwrap()
    }

    #[test]
    fn test_verbatim_answer_is_verified() {
        let generator =
            StaticGenerator::new("Les données personnelles sont conservées pendant cinq ans.");
        let report = pipeline().answer("Quelle est la durée de conservation ?", &generator);

        assert_eq!(
            report.answer,
            "Les données personnelles sont conservées pendant cinq ans."
        );
        assert_eq!(report.tier, Some(GroundingTier::Verified));
        assert_eq!(report.source_pages, vec![0, 1, 2]);
        assert_eq!(report.source_sentences.len(), 4);
        assert_eq!(report.alignment_details.len(), 1);
        assert!(report.alignment_details[0].is_aligned());
    }

    #[test]
    fn test_small_document_keeps_all_pages_in_order() {
        let pages = pipeline().select_pages("effacement");
        assert_eq!(pages, vec![0, 1, 2]);
    }

    #[test]
    fn test_ranked_selection_with_small_top_k() {
        let mut config = Config::default();
        config.ranking.top_k = 1;
        let pipeline = Pipeline::from_config(Document::from_pages(&PAGES), &config).unwrap();

        assert_eq!(pipeline.select_pages("effacement des données"), vec![1]);
    }

    #[test]
    fn test_no_relevant_page() {
        let mut config = Config::default();
        config.ranking.top_k = 1;
        let pipeline = Pipeline::from_config(Document::from_pages(&PAGES), &config).unwrap();

        let report = pipeline.answer("photosynthèse", &StaticGenerator::new("Peu importe."));
        assert_eq!(report.answer, NO_RELEVANT_PAGE);
        assert!(report.tier.is_none());
        assert!(report.source_pages.is_empty());
        assert!(report.raw_answer.is_empty());
    }

    #[test]
    fn test_empty_document_has_no_relevant_page() {
        let pipeline =
            Pipeline::from_config(Document::from_text(" \x0c "), &Config::default()).unwrap();
        let report = pipeline.answer("durée", &StaticGenerator::new("Cinq ans."));
        assert_eq!(report.answer, NO_RELEVANT_PAGE);
    }

    #[test]
    fn test_no_relevant_sentence() {
        let pipeline =
            Pipeline::from_config(Document::from_pages(&["Sommaire."]), &Config::default())
                .unwrap();
        let report = pipeline.answer("sommaire", &StaticGenerator::new("Un sommaire."));
        assert_eq!(report.answer, NO_RELEVANT_SENTENCE);
        assert_eq!(report.source_pages, vec![0]);
    }

    #[test]
    fn test_generation_failure_is_refused() {
        let report = pipeline().answer("Quelle est la durée de conservation ?", &FailingGenerator);
        assert_eq!(report.raw_answer, GENERATION_FAILED);
        assert_eq!(report.answer, REFUSAL);
        assert_eq!(report.tier, Some(GroundingTier::Refused));
    }

    #[test]
    fn test_empty_static_answer_fails() {
        let generator = StaticGenerator::new("  ");
        assert!(matches!(
            generator.generate("q", &[]),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn test_answer_with_selection_uses_selected_sources() {
        let selected = vec![PAGES[1].to_string()];
        let generator = StaticGenerator::new(PAGES[1]);
        let report = pipeline().answer_with_selection("Qui efface ?", &selected, &generator);
        assert_eq!(report.source_sentences, selected);
        assert_eq!(report.tier, Some(GroundingTier::Verified));

        let report = pipeline().answer_with_selection("Qui efface ?", &[], &generator);
        assert_eq!(report.answer, NO_RELEVANT_SENTENCE);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let generator =
            StaticGenerator::new("Les données personnelles sont conservées pendant cinq ans.");
        let report = pipeline().answer("durée de conservation", &generator);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["tier"], "verified");
        assert_eq!(json["source_pages"], serde_json::json!([0, 1, 2]));
        assert!(json["alignment_details"].is_array());
    }

    #[test]
    fn test_parse_selected_sentences_json() {
        let output = r#"{"selected_sentences": ["Première phrase sélectionnée.", "Seconde."]}"#;
        assert_eq!(
            parse_selected_sentences(output),
            vec!["Première phrase sélectionnée.", "Seconde."]
        );
        assert!(parse_selected_sentences(r#"{"other": 1}"#).is_empty());
    }

    #[test]
    fn test_parse_selected_sentences_salvages_quotes() {
        let output = r#"Voici: "Les données sont conservées cinq ans." et "court" puis "Les archives sont détruites après dix ans.""#;
        assert_eq!(
            parse_selected_sentences(output),
            vec![
                "Les données sont conservées cinq ans.",
                "Les archives sont détruites après dix ans."
            ]
        );
    }

    #[test]
    fn test_quoted_fragments_skips_empty_pairs() {
        assert_eq!(quoted_fragments(r#"a "" "b" "#), vec![" "]);
        assert_eq!(quoted_fragments(r#""un" "deux""#), vec!["un", "deux"]);
        assert_eq!(quoted_fragments(r#"x "unterminated"#), Vec::<&str>::new());
    }
}
