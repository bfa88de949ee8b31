//! litchi-comments - reviewer comment extraction for Word documents
//!
//! This library reads the comments of a `.docx` file and reconstructs how
//! they relate to the document and to each other: which paragraph each
//! comment is anchored to, which comments are replies, and which have been
//! marked resolved.
//!
//! # Features
//!
//! - **Anchoring**: paragraph position, estimated page and anchored text of
//!   every comment, from range or reference markers
//! - **Threading**: reply chains rebuilt from `commentsExtended.xml` /
//!   `commentsExtensible.xml`, tolerant of out-of-order and dangling replies
//! - **Resolution**: per-comment done flags, with a thread-level view
//! - **Quick check**: detect whether a document has comments at all without
//!   a full extraction
//!
//! # Example
//!
//! ```no_run
//! use litchi_comments::{ExtractOptions, extract_with};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extraction = extract_with("review.docx", &ExtractOptions::default())?;
//!
//! for thread in extraction.threads() {
//!     let status = if thread.is_resolved() { "resolved" } else { "open" };
//!     println!("thread {} ({status}):", thread.thread_id());
//!     for record in thread.members() {
//!         println!("  [{:?}] {}: {}", record.line, record.author, record.comment);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Skipping documents without comments
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! if litchi_comments::has_comments("draft.docx")? {
//!     let extraction = litchi_comments::extract("draft.docx")?;
//!     println!("{} comments", extraction.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Extraction options
pub mod config;

/// Word comment model: anchors, definitions, cross references, threads
pub mod docx;

/// Error types
pub mod error;

/// The extraction pipeline
pub mod extract;

/// Container access
pub mod opc;

/// Thread, filter and column views over record sets
pub mod view;

/// XML part parsing
pub mod xml;

#[cfg(test)]
mod test_support;

pub use config::ExtractOptions;
pub use docx::{CommentRecord, ParagraphPosition, RawComment};
pub use error::{CommentsError, Result};
pub use extract::{
    Extraction, ExtractionNote, extract, extract_bytes, extract_from, extract_many, extract_with,
    has_comments, has_comments_in,
};
pub use opc::{Container, MemoryContainer, PartSource};
pub use view::{Column, CommentThread, ResolvedFilter, threads};
