//! Exact-match token pipeline.
//!
//! Splits text on word boundaries and lower-cases it. There is no
//! stemming, no stop-word list and no token length filter: markup
//! search must be able to find every literal word, including the
//! common ones a linguistic pipeline would drop.

use std::cell::RefCell;
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};

thread_local! {
    static QUERY_ANALYZER: RefCell<ExactAnalyzer> = RefCell::new(ExactAnalyzer::new());
}

/// Normalize a query term with this thread's query analyzer.
///
/// Same rules as [`ExactAnalyzer::normalize`], without building an
/// analyzer per query.
pub fn normalize_query_term(term: &str) -> Option<String> {
    QUERY_ANALYZER.with(|analyzer| analyzer.borrow_mut().normalize(term))
}

/// Word-boundary, case-folding analyzer
#[derive(Clone)]
pub struct ExactAnalyzer {
    analyzer: TextAnalyzer,
}

impl std::fmt::Debug for ExactAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactAnalyzer")
            .field("analyzer", &"<simple+lowercase>")
            .finish()
    }
}

impl Default for ExactAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactAnalyzer {
    pub fn new() -> Self {
        let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .build();

        Self { analyzer }
    }

    /// Tokenize `text` into normalized terms, in order, keeping
    /// repeats.
    pub fn tokenize(&mut self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut stream = self.analyzer.token_stream(text);

        while stream.advance() {
            tokens.push(stream.token().text.clone());
        }

        tokens
    }

    /// Normalize a query term the same way indexed text is.
    ///
    /// Returns `None` unless the input is exactly one token; a
    /// phrase or punctuation-only input cannot match a single
    /// posting.
    pub fn normalize(&mut self, term: &str) -> Option<String> {
        let mut tokens = self.tokenize(term);
        if tokens.len() == 1 {
            tokens.pop()
        } else {
            None
        }
    }
}
