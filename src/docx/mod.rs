/// Word (.docx) comment model.
///
/// The comment data of a Word document is scattered over several parts and
/// tied together only by string identifiers:
///
/// - `word/document.xml`: comment markers (`w:commentRangeStart`,
///   `w:commentReference`) carrying the comment's `w:id`
/// - `word/comments.xml`: the comment definitions, keyed by the same `w:id`,
///   whose first paragraph carries a `w14:paraId`
/// - `word/commentsExtended.xml` / `word/commentsExtensible.xml`: reply links
///   and done flags keyed by that `paraId`
///
/// Each module here turns one of those sources into a typed lookup table:
/// - `anchor`: paragraph positions and marker anchors ([`AnchorIndex`])
/// - `comment`: comment definitions ([`RawComment`])
/// - `cross_ref`: reply links and resolution ([`CrossRefMap`])
/// - `thread`: thread reconstruction ([`ThreadBuilder`])
/// - `record`: the exported, correlated [`CommentRecord`]
pub mod anchor;
pub mod comment;
pub mod cross_ref;
pub mod record;
pub mod thread;

pub use anchor::{Anchor, AnchorIndex, IndexedParagraph};
pub use comment::RawComment;
pub use cross_ref::{CrossRefEntry, CrossRefMap};
pub use record::{CommentRecord, ParagraphPosition};
pub use thread::{CommentLink, ThreadAssignment, ThreadBuilder};
