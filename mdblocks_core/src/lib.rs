//! `mdblocks_core` recognises custom annotated regions inside otherwise
//! ordinary markdown, such as collapsible notes or titled callouts, and
//! turns them into a nested render tree driven by a block schema.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown text
//!   → Tokenizer (splits block delimiter lines from text into a flat TokenStream)
//!   → Parser (validates blocks against the SchemaRegistry and nests them into a tree)
//!   → Renderer (maps blocks to container/title/contents elements, text to a TextRenderer)
//! ```
//!
//! ## Block Syntax
//!
//! ```markdown
//! :::note Optional title
//! Any markdown, including other blocks.
//! :::
//! ```
//!
//! A block opens on a line starting with `:::` followed by a key. Everything
//! after the key is the title. A line holding only `:::` closes the innermost
//! block. Delimiters inside fenced code blocks are left alone.
//!
//! Malformed input never fails: unknown keys are kept as text, unclosed
//! blocks are closed at the end of the document, and stray closing lines are
//! dropped. Each of these is reported as a [`ParseDiagnostic`].
//!
//! ## Quick Start
//!
//! ```rust
//! use mdblocks_core::BlockConfig;
//! use mdblocks_core::PlainText;
//! use mdblocks_core::SchemaRegistry;
//! use mdblocks_core::TitlePolicy;
//! use mdblocks_core::process;
//!
//! let schema = SchemaRegistry::builder()
//! 	.block("note", BlockConfig::new(TitlePolicy::optional("Note")))
//! 	.build()
//! 	.unwrap();
//!
//! let rendered = process(":::note\nHello\n:::", &schema, &PlainText);
//! assert!(rendered.diagnostics.is_empty());
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use lexer::tokenize;
pub use parser::*;
pub use position::*;
pub use render::*;
pub use schema::*;
pub use tokens::Token;
pub use tokens::TokenStream;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod lexer;
mod parser;
mod position;
mod render;
mod schema;
mod tokens;

#[cfg(test)]
mod __fixtures;
