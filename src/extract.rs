//! The extraction pipeline.
//!
//! One call reads the container, parses the comment-related parts, builds
//! the anchor index and cross-reference map, reconstructs threads and
//! returns the records in presentation order. Each stage consumes the full
//! output of the previous one: threading needs every comment and every reply
//! link up front. Calls share no state and can run in parallel; see
//! [`extract_many`].

use crate::config::ExtractOptions;
use crate::docx::{
    AnchorIndex, CommentLink, CommentRecord, CrossRefMap, RawComment, ThreadBuilder,
};
use crate::error::{CommentsError, Result};
use crate::opc::constants::{element, part_name};
use crate::opc::{Container, PartSource};
use crate::view::{CommentThread, threads};
use crate::xml::XmlElement;
use quick_xml::Reader;
use quick_xml::events::Event;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Why an extraction produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionNote {
    /// The container has no `word/comments.xml`
    NoCommentsPart,
    /// `word/comments.xml` exists but defines no comments
    NoCommentDefinitions,
}

impl fmt::Display for ExtractionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionNote::NoCommentsPart => {
                write!(f, "document has no comments part ({})", part_name::COMMENTS)
            },
            ExtractionNote::NoCommentDefinitions => {
                write!(f, "comments part ({}) contains no comments", part_name::COMMENTS)
            },
        }
    }
}

/// Result of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Records sorted by line, then date (missing values last)
    pub records: Vec<CommentRecord>,
    /// Set when the document legitimately has no comments
    pub note: Option<ExtractionNote>,
}

impl Extraction {
    fn empty(note: ExtractionNote) -> Self {
        info!(%note, "no comments extracted");
        Self {
            records: Vec::new(),
            note: Some(note),
        }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no comments were found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Group the records into threads.
    pub fn threads(&self) -> Vec<CommentThread<'_>> {
        threads(&self.records)
    }
}

/// Extract the comments of a `.docx` file with default options.
///
/// # Examples
///
/// ```rust,no_run
/// let extraction = litchi_comments::extract("review.docx")?;
///
/// for record in &extraction.records {
///     println!(
///         "{:?} {} (thread {}): {}",
///         record.line, record.author, record.thread_id, record.comment
///     );
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    extract_with(path, &ExtractOptions::default())
}

/// Extract the comments of a `.docx` file.
///
/// # Errors
///
/// Fails if the file does not exist, is not a ZIP container, or one of the
/// comment-related parts is malformed XML. A document without comments is
/// not an error.
pub fn extract_with<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Extraction> {
    let path = path.as_ref();
    debug!(path = %path.display(), "extracting comments");
    let mut container = Container::open(path)?;
    extract_from(&mut container, options)
}

/// Extract the comments of an in-memory `.docx` file.
pub fn extract_bytes(data: Vec<u8>, options: &ExtractOptions) -> Result<Extraction> {
    let mut container = Container::from_bytes(data)?;
    extract_from(&mut container, options)
}

/// Extract the comments from any part source.
pub fn extract_from<S: PartSource + ?Sized>(
    source: &mut S,
    options: &ExtractOptions,
) -> Result<Extraction> {
    let Some(comments_xml) = source.read_part(part_name::COMMENTS)? else {
        return Ok(Extraction::empty(ExtractionNote::NoCommentsPart));
    };
    let comments_root = XmlElement::parse(&comments_xml, part_name::COMMENTS)?;
    let comments = RawComment::extract_all(&comments_root);
    if comments.is_empty() {
        return Ok(Extraction::empty(ExtractionNote::NoCommentDefinitions));
    }

    let document_xml = source
        .read_part(part_name::DOCUMENT)?
        .ok_or_else(|| CommentsError::PartNotFound(part_name::DOCUMENT.to_string()))?;
    let document = XmlElement::parse(&document_xml, part_name::DOCUMENT)?;
    let anchors = AnchorIndex::build(&document);
    debug!(
        paragraphs = anchors.paragraph_count(),
        anchored = anchors.anchored_count(),
        "indexed document body"
    );

    let mut auxiliary = Vec::with_capacity(part_name::AUXILIARY.len());
    for name in part_name::AUXILIARY {
        if let Some(xml) = source.read_part(name)? {
            auxiliary.push(XmlElement::parse(&xml, name)?);
        }
    }
    let cross_refs = CrossRefMap::from_parts(&auxiliary);
    debug!(
        parts = auxiliary.len(),
        entries = cross_refs.len(),
        "resolved cross references"
    );

    let records = correlate(comments, &anchors, &cross_refs, options);
    debug!(records = records.len(), "extraction complete");

    Ok(Extraction {
        records,
        note: None,
    })
}

/// Join comment definitions with their anchors, reply links and threads.
///
/// Returns the records in presentation order.
pub fn correlate(
    comments: Vec<RawComment>,
    anchors: &AnchorIndex,
    cross_refs: &CrossRefMap,
    options: &ExtractOptions,
) -> Vec<CommentRecord> {
    let links: Vec<CommentLink> = comments
        .iter()
        .map(|c| {
            let para_id = c.anchor_paragraph_id.as_deref();
            CommentLink::new(para_id, para_id.and_then(|p| cross_refs.parent_of(p)))
        })
        .collect();
    let assignments = ThreadBuilder::new(options.max_propagation_passes).build(&links);

    let mut records: Vec<CommentRecord> = comments
        .into_iter()
        .zip(links)
        .zip(assignments)
        .map(|((comment, link), thread)| {
            let CommentLink { para_id, parent_id } = link;
            let anchor = anchors.locate(&comment.id);
            let resolved = para_id.as_deref().is_some_and(|p| cross_refs.is_resolved(p));
            let (parent_id, orphaned_parent_id) = if thread.promoted {
                (None, parent_id)
            } else {
                (parent_id, None)
            };

            CommentRecord {
                text: anchor.map(|a| a.text.clone()).unwrap_or_default(),
                comment: comment.text,
                author: comment.author,
                initials: comment.initials,
                date: comment.timestamp,
                line: anchor.map(|a| a.position.ordinal()),
                page: anchor.map(|a| a.position.page(options.page_size)),
                resolved,
                comment_id: comment.id,
                para_id,
                parent_id,
                orphaned_parent_id,
                thread_id: thread.thread_id,
                thread_size: thread.thread_size,
                reply_depth: thread.reply_depth,
            }
        })
        .collect();

    records.sort_by(CommentRecord::presentation_cmp);
    records
}

/// Check whether a `.docx` file defines at least one comment.
///
/// Only `word/comments.xml` is read, and only up to its first definition; no
/// indexing or threading happens.
pub fn has_comments<P: AsRef<Path>>(path: P) -> Result<bool> {
    let mut container = Container::open(path)?;
    has_comments_in(&mut container)
}

/// Check whether a part source defines at least one comment.
pub fn has_comments_in<S: PartSource + ?Sized>(source: &mut S) -> Result<bool> {
    if !source.has_part(part_name::COMMENTS)? {
        return Ok(false);
    }
    match source.read_part(part_name::COMMENTS)? {
        Some(xml) => contains_comment_definition(&xml),
        None => Ok(false),
    }
}

fn contains_comment_definition(xml: &[u8]) -> Result<bool> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::with_capacity(512);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == element::COMMENT {
                    return Ok(true);
                }
            },
            Ok(Event::Eof) => return Ok(false),
            Err(e) => return Err(CommentsError::xml(part_name::COMMENTS, e)),
            _ => {},
        }
        buf.clear();
    }
}

/// Extract many documents in parallel.
///
/// Each result is paired with its path, in the order of `paths`; a failure
/// in one document does not affect the others.
pub fn extract_many<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ExtractOptions,
) -> Vec<(PathBuf, Result<Extraction>)> {
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            (path.to_path_buf(), extract_with(path, options))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::MemoryContainer;
    use crate::test_support::{DocxFixture, body_paragraph, comment_definition, zip_parts};
    use proptest::prelude::*;

    fn run(fixture: &DocxFixture) -> Extraction {
        extract_bytes(fixture.to_zip(), &ExtractOptions::default()).unwrap()
    }

    #[test]
    fn test_single_comment_scenario() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("one", &[]))
            .body(body_paragraph("two", &[]))
            .body(body_paragraph("three", &["0"]))
            .comment(comment_definition("0", "A", Some("2024-05-01T12:00:00Z"), "P0", "Look here"));

        let extraction = run(&fixture);
        assert_eq!(extraction.note, None);
        assert_eq!(extraction.len(), 1);

        let record = &extraction.records[0];
        assert_eq!(record.author, "A");
        assert_eq!(record.comment, "Look here");
        assert_eq!(record.text, "three");
        assert_eq!(record.line, Some(3));
        assert_eq!(record.page, Some(1));
        assert!(!record.resolved);
        assert_eq!(record.para_id.as_deref(), Some("P0"));
        assert_eq!(record.parent_id, None);
        assert_eq!(record.thread_id, 1);
        assert_eq!(record.thread_size, 1);
        assert_eq!(record.reply_depth, 0);
    }

    #[test]
    fn test_reply_scenario() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("anchored", &["0", "1"]))
            .comment(comment_definition("0", "A", Some("2024-05-01T12:00:00Z"), "P0", "Question"))
            .comment(comment_definition("1", "B", Some("2024-05-02T12:00:00Z"), "P1", "Answer"))
            .extended(r#"<w15:commentEx w15:paraId="P0" w15:done="0"/>"#)
            .extended(r#"<w15:commentEx w15:paraId="P1" w15:paraIdParent="P0" w15:done="0"/>"#);

        let records = run(&fixture).records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].comment_id, "0");
        assert_eq!(records[1].comment_id, "1");
        assert_eq!(records[0].thread_id, records[1].thread_id);
        assert_eq!(records[0].reply_depth, 0);
        assert_eq!(records[1].reply_depth, 1);
        assert_eq!(records[0].thread_size, 2);
        assert_eq!(records[1].thread_size, 2);
        assert_eq!(records[1].parent_id.as_deref(), Some("P0"));
    }

    #[test]
    fn test_empty_comments_part() {
        let fixture = DocxFixture::new().body(body_paragraph("text", &[]));
        let extraction = run(&fixture);
        assert!(extraction.is_empty());
        assert_eq!(extraction.note, Some(ExtractionNote::NoCommentDefinitions));
    }

    #[test]
    fn test_missing_comments_part() {
        let data = zip_parts(&[("word/document.xml", "<w:document><w:body/></w:document>")]);
        let extraction = extract_bytes(data, &ExtractOptions::default()).unwrap();
        assert!(extraction.is_empty());
        assert_eq!(extraction.note, Some(ExtractionNote::NoCommentsPart));
    }

    #[test]
    fn test_missing_document_part_with_comments() {
        let mut source = MemoryContainer::new().with_part(
            part_name::COMMENTS,
            r#"<w:comments><w:comment w:id="0" w:author="A"/></w:comments>"#,
        );
        let err = extract_from(&mut source, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, CommentsError::PartNotFound(_)));
    }

    #[test]
    fn test_malformed_part_is_fatal() {
        let mut source = MemoryContainer::new()
            .with_part(part_name::COMMENTS, r#"<w:comments><w:comment w:id="0"></w:comments>"#)
            .with_part(part_name::DOCUMENT, "<w:document/>");
        let err = extract_from(&mut source, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, CommentsError::Xml { .. }));

        let fixture = DocxFixture::new()
            .body(body_paragraph("x", &["0"]))
            .comment(comment_definition("0", "A", None, "P0", "c"))
            .raw_extensible("<w16cex:commentsExtensible><broken>");
        let err = extract_bytes(fixture.to_zip(), &ExtractOptions::default()).unwrap_err();
        match err {
            CommentsError::Xml { part, .. } => assert_eq!(part, part_name::COMMENTS_EXTENSIBLE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_orphaned_anchor_sorts_last() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p1", &[]))
            .body(body_paragraph("p2", &["1"]))
            .comment(comment_definition("0", "A", None, "P0", "no anchor"))
            .comment(comment_definition("1", "B", None, "P1", "anchored"));

        let records = run(&fixture).records;
        assert_eq!(records[0].comment_id, "1");
        assert_eq!(records[0].line, Some(2));
        assert_eq!(records[1].comment_id, "0");
        assert_eq!(records[1].line, None);
        assert_eq!(records[1].page, None);
        assert_eq!(records[1].text, "");
    }

    #[test]
    fn test_same_line_ordered_by_date() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p1", &["0", "1"]))
            .comment(comment_definition("0", "A", Some("2024-06-02T00:00:00Z"), "P0", "later"))
            .comment(comment_definition("1", "B", Some("2024-06-01T00:00:00Z"), "P1", "earlier"));

        let records = run(&fixture).records;
        assert_eq!(records[0].comment, "earlier");
        assert_eq!(records[1].comment, "later");
    }

    #[test]
    fn test_page_estimate() {
        let mut fixture = DocxFixture::new();
        for i in 1..=30 {
            let ids: &[&str] = if i == 26 { &["0"] } else { &[] };
            fixture = fixture.body(body_paragraph(&format!("p{i}"), ids));
        }
        fixture = fixture.comment(comment_definition("0", "A", None, "P0", "late"));

        let record = &run(&fixture).records[0];
        assert_eq!(record.line, Some(26));
        assert_eq!(record.page, Some(2));

        let options = ExtractOptions::new().with_page_size(10);
        let record = &extract_bytes(fixture.to_zip(), &options).unwrap().records[0];
        assert_eq!(record.page, Some(3));
    }

    #[test]
    fn test_resolution_is_per_record() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p", &["0", "1"]))
            .comment(comment_definition("0", "A", Some("2024-01-01T00:00:00Z"), "P0", "root"))
            .comment(comment_definition("1", "B", Some("2024-01-02T00:00:00Z"), "P1", "reply"))
            .extended(r#"<w15:commentEx w15:paraId="P0" w15:done="1"/>"#)
            .extended(r#"<w15:commentEx w15:paraId="P1" w15:paraIdParent="P0"/>"#);

        let extraction = run(&fixture);
        assert!(extraction.records[0].resolved);
        assert!(!extraction.records[1].resolved);
        assert!(!extraction.threads()[0].is_resolved());
    }

    #[test]
    fn test_resolution_from_extensible_part_overrides() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p", &["0"]))
            .comment(comment_definition("0", "A", None, "P0", "root"))
            .extended(r#"<w15:commentEx w15:paraId="P0" w15:done="0"/>"#)
            .extensible(r#"<w16cex:commentExtensible w16cex:paraId="P0" w16cex:done="1"/>"#);

        assert!(run(&fixture).records[0].resolved);
    }

    #[test]
    fn test_comment_without_para_id_is_never_resolved() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p", &["0"]))
            .raw_comment(r#"<w:comment w:id="0" w:author="A"><w:p><w:r><w:t>x</w:t></w:r></w:p></w:comment>"#)
            .extended(r#"<w15:commentEx w15:paraId="" w15:done="1"/>"#);

        let record = &run(&fixture).records[0];
        assert_eq!(record.para_id, None);
        assert!(!record.resolved);
    }

    #[test]
    fn test_dangling_parent_promoted_with_reference_kept() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("p", &["0", "1"]))
            .comment(comment_definition("0", "A", Some("2024-01-01T00:00:00Z"), "P0", "root"))
            .comment(comment_definition("1", "B", Some("2024-01-02T00:00:00Z"), "P1", "stray reply"))
            .extended(r#"<w15:commentEx w15:paraId="P1" w15:paraIdParent="DELETED"/>"#);

        let records = run(&fixture).records;
        let stray = records.iter().find(|r| r.comment_id == "1").unwrap();
        assert_eq!(stray.parent_id, None);
        assert_eq!(stray.orphaned_parent_id.as_deref(), Some("DELETED"));
        assert_eq!(stray.reply_depth, 0);
        assert_eq!(stray.thread_size, 1);
        assert_ne!(stray.thread_id, records[0].thread_id);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let fixture = DocxFixture::new()
            .body(body_paragraph("a", &["0"]))
            .body(body_paragraph("b", &["1", "2"]))
            .comment(comment_definition("0", "A", None, "P0", "x"))
            .comment(comment_definition("1", "B", None, "P1", "y"))
            .comment(comment_definition("2", "C", None, "P2", "z"))
            .extended(r#"<w15:commentEx w15:paraId="P2" w15:paraIdParent="P1"/>"#);
        let data = fixture.to_zip();

        let first = extract_bytes(data.clone(), &ExtractOptions::default()).unwrap();
        let second = extract_bytes(data, &ExtractOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_from_path_and_presence_check() {
        let dir = tempfile::tempdir().unwrap();
        let with_comments = dir.path().join("with.docx");
        let without_comments = dir.path().join("without.docx");
        let empty_comments = dir.path().join("empty.docx");

        std::fs::write(
            &with_comments,
            DocxFixture::new()
                .body(body_paragraph("p", &["0"]))
                .comment(comment_definition("0", "A", None, "P0", "x"))
                .to_zip(),
        )
        .unwrap();
        std::fs::write(
            &without_comments,
            zip_parts(&[("word/document.xml", "<w:document/>")]),
        )
        .unwrap();
        std::fs::write(&empty_comments, DocxFixture::new().to_zip()).unwrap();

        assert!(has_comments(&with_comments).unwrap());
        assert!(!has_comments(&without_comments).unwrap());
        assert!(!has_comments(&empty_comments).unwrap());
        assert_eq!(extract(&with_comments).unwrap().len(), 1);

        let missing = dir.path().join("missing.docx");
        assert!(matches!(
            extract(&missing).unwrap_err(),
            CommentsError::PackageNotFound(_)
        ));
        assert!(matches!(
            has_comments(&missing).unwrap_err(),
            CommentsError::PackageNotFound(_)
        ));

        let paths = [with_comments.clone(), missing, without_comments];
        let results = extract_many(&paths, &ExtractOptions::default());
        assert_eq!(results.len(), 3);
        for ((path, _), expected) in results.iter().zip(&paths) {
            assert_eq!(path, expected);
        }
        assert_eq!(results[0].1.as_ref().unwrap().len(), 1);
        assert!(results[1].1.is_err());
        assert!(results[2].1.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_note_display() {
        assert_eq!(
            ExtractionNote::NoCommentsPart.to_string(),
            "document has no comments part (word/comments.xml)"
        );
    }

    #[derive(Debug, Clone)]
    struct GeneratedComment {
        anchor: Option<usize>,
        day: Option<u32>,
        parent: Option<usize>,
        done: bool,
    }

    fn generated_comments() -> impl Strategy<Value = Vec<GeneratedComment>> {
        prop::collection::vec(
            (
                prop::option::of(1usize..8),
                prop::option::of(1u32..28),
                prop::option::of(0usize..12),
                any::<bool>(),
            )
                .prop_map(|(anchor, day, parent, done)| GeneratedComment {
                    anchor,
                    day,
                    parent,
                    done,
                }),
            0..12,
        )
    }

    fn fixture_for(comments: &[GeneratedComment]) -> DocxFixture {
        let mut fixture = DocxFixture::new();
        for line in 1..8 {
            let ids: Vec<String> = comments
                .iter()
                .enumerate()
                .filter(|(_, c)| c.anchor == Some(line))
                .map(|(i, _)| i.to_string())
                .collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            fixture = fixture.body(body_paragraph(&format!("line {line}"), &ids));
        }
        for (i, c) in comments.iter().enumerate() {
            let date = c.day.map(|d| format!("2024-02-{d:02}T00:00:00Z"));
            fixture = fixture.comment(comment_definition(
                &i.to_string(),
                "A",
                date.as_deref(),
                &format!("P{i}"),
                "text",
            ));
            let parent = c
                .parent
                .map(|p| format!(r#" w15:paraIdParent="P{p}""#))
                .unwrap_or_default();
            fixture = fixture.extended(&format!(
                r#"<w15:commentEx w15:paraId="P{i}"{parent} w15:done="{}"/>"#,
                u8::from(c.done)
            ));
        }
        fixture
    }

    proptest! {
        #[test]
        fn prop_record_invariants(comments in generated_comments()) {
            let extraction = run(&fixture_for(&comments));
            let records = &extraction.records;

            prop_assert_eq!(records.len(), comments.len());

            for pair in records.windows(2) {
                prop_assert_ne!(pair[0].presentation_cmp(&pair[1]), std::cmp::Ordering::Greater);
            }

            for record in records {
                let members = records.iter().filter(|r| r.thread_id == record.thread_id).count();
                prop_assert_eq!(record.thread_size, members);
                prop_assert_eq!(record.line.is_none(), record.page.is_none());
                if record.orphaned_parent_id.is_some() {
                    prop_assert!(record.parent_id.is_none());
                    prop_assert_eq!(record.reply_depth, 0);
                }
                if record.parent_id.is_none() {
                    prop_assert_eq!(record.reply_depth, 0);
                }

                let index: usize = record.comment_id.parse().unwrap();
                prop_assert_eq!(record.resolved, comments[index].done);
                prop_assert_eq!(record.line, comments[index].anchor);
            }
        }
    }
}
