//! Markdown parsing for citation validation.
//!
//! This module is the parser collaborator of the pipeline: it turns a file into
//! a [`ParseOutput`] holding the full text, a block token tree, the citations
//! found in the text and the anchors the document defines.
//!
//! - [`tokenizer`] - `pulldown-cmark` based block token tree
//! - [`reference_extractor`] - citation and anchor extraction
//! - [`parser`] - the [`MarkdownParser`] trait and its filesystem implementation

pub mod parser;
pub mod reference_extractor;
pub mod tokenizer;

pub use parser::{DefaultMarkdownParser, MarkdownParser, ParseOutput, parse_content};
pub use tokenizer::{Token, TokenKind, flatten, tokenize};
