/// Exported comment records.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Position of a paragraph within the document body.
///
/// Word stores no line numbers or pagination, so positions are
/// paragraph-granular and the page is an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParagraphPosition {
    ordinal: usize,
}

impl ParagraphPosition {
    /// Create a position from a 1-based ordinal.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal` is zero.
    #[inline]
    pub fn new(ordinal: usize) -> Self {
        assert!(ordinal > 0, "paragraph ordinals are 1-based");
        Self { ordinal }
    }

    /// The 1-based paragraph ordinal.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Estimated page: `ceil(ordinal / page_size)`.
    #[inline]
    pub fn page(&self, page_size: usize) -> usize {
        self.ordinal.div_ceil(page_size.max(1))
    }
}

/// A fully correlated comment, as handed to exporters and viewers.
///
/// Field names serialize as the column names downstream consumers expect
/// (`Text`, `Comment`, `Author`, ..., `threadId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Visible text of the anchored paragraph (empty when orphaned)
    #[serde(rename = "Text")]
    pub text: String,
    /// Comment body, paragraphs joined with a single space
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Initials")]
    pub initials: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<DateTime<Utc>>,
    /// Paragraph ordinal of the anchor
    #[serde(rename = "Line")]
    pub line: Option<usize>,
    #[serde(rename = "Page")]
    pub page: Option<usize>,
    #[serde(rename = "Resolved")]
    pub resolved: bool,
    #[serde(rename = "commentId")]
    pub comment_id: String,
    /// Paragraph identifier of the comment's own first paragraph
    #[serde(rename = "paraId")]
    pub para_id: Option<String>,
    /// Paragraph identifier of the parent comment; `None` for thread roots
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    /// Parent reference that never resolved; set when the comment was
    /// promoted to a thread root
    #[serde(rename = "orphanedParentId")]
    pub orphaned_parent_id: Option<String>,
    #[serde(rename = "threadId")]
    pub thread_id: usize,
    #[serde(rename = "threadSize")]
    pub thread_size: usize,
    #[serde(rename = "replyDepth")]
    pub reply_depth: usize,
}

impl CommentRecord {
    /// Check if this record starts a thread.
    #[inline]
    pub fn is_thread_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if no anchor was found in the body for this comment.
    #[inline]
    pub fn is_orphaned(&self) -> bool {
        self.line.is_none()
    }

    /// Presentation order: by line, then date, with missing values last.
    pub fn presentation_cmp(&self, other: &Self) -> Ordering {
        cmp_none_last(&self.line, &other.line).then_with(|| cmp_none_last(&self.date, &other.date))
    }
}

fn cmp_none_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
pub(crate) fn sample_record(comment_id: &str, line: Option<usize>) -> CommentRecord {
    CommentRecord {
        text: String::new(),
        comment: format!("comment {comment_id}"),
        author: "A".to_string(),
        initials: None,
        date: None,
        line,
        page: line.map(|l| ParagraphPosition::new(l).page(25)),
        resolved: false,
        comment_id: comment_id.to_string(),
        para_id: None,
        parent_id: None,
        orphaned_parent_id: None,
        thread_id: 1,
        thread_size: 1,
        reply_depth: 0,
    }
}
