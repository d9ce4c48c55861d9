//! veritas: grounded question answering
//!
//! Answers questions about a document using only the document's own sentences. Pages are
//! ranked with BM25+, the sentences of the best pages are handed to an answer generator, and
//! the generated text is aligned back onto those sentences. Whatever cannot be aligned is
//! dropped; when nothing can be, the answer is a refusal.

#![warn(missing_docs)]

pub mod cli;
pub mod document;
mod error;
pub mod pipeline;

pub use document::Document;
pub use error::{DocumentError, GenerationError, PipelineError};
pub use pipeline::{
    AnswerGenerator, GroundedReport, Pipeline, StaticGenerator, parse_selected_sentences,
};
