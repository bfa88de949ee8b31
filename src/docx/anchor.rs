/// Paragraph positions and comment anchors in the document body.
///
/// A comment is attached to the body in one of two ways: a
/// `<w:commentRangeStart w:id="N"/>` ... `<w:commentRangeEnd w:id="N"/>` pair
/// around the commented passage, or a lone `<w:commentReference w:id="N"/>`
/// inside a run. Some writers only emit the reference, so it is kept as a
/// fallback when no range start exists for an id.
use crate::docx::record::ParagraphPosition;
use crate::opc::constants::element;
use crate::xml::XmlElement;
use std::collections::HashMap;

/// A body paragraph with its position and visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedParagraph {
    pub position: ParagraphPosition,
    pub text: String,
}

/// Where a comment marker sits in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Position of the paragraph enclosing the marker
    pub position: ParagraphPosition,
    /// Visible text of that paragraph
    pub text: String,
}

/// Index of body paragraphs and comment markers.
#[derive(Debug, Clone, Default)]
pub struct AnchorIndex {
    paragraphs: Vec<IndexedParagraph>,
    range_starts: HashMap<String, Anchor>,
    references: HashMap<String, Anchor>,
}

impl AnchorIndex {
    /// Build the index from the root of `word/document.xml`.
    ///
    /// Every `w:p` under `w:body` is numbered in document order, including
    /// paragraphs inside tables and text boxes. When the same marker id is
    /// found in more than one paragraph (a nested paragraph is scanned both on
    /// its own and as part of its container), the later paragraph wins.
    ///
    /// A document without a body yields an empty index.
    pub fn build(document: &XmlElement) -> Self {
        let mut index = AnchorIndex::default();

        let body = if document.is(element::BODY) {
            Some(document)
        } else {
            document.find(element::BODY)
        };
        let Some(body) = body else {
            return index;
        };

        for (i, paragraph) in body.descendants_named(element::PARAGRAPH).enumerate() {
            let position = ParagraphPosition::new(i + 1);
            let text = paragraph.text_of(element::TEXT);

            for marker in paragraph.descendants() {
                let target = if marker.is(element::COMMENT_RANGE_START) {
                    &mut index.range_starts
                } else if marker.is(element::COMMENT_REFERENCE) {
                    &mut index.references
                } else {
                    continue;
                };

                if let Some(id) = marker.attr("id") {
                    target.insert(
                        id.to_string(),
                        Anchor {
                            position,
                            text: text.clone(),
                        },
                    );
                }
            }

            index.paragraphs.push(IndexedParagraph { position, text });
        }

        index
    }

    /// Locate the anchor of a comment by its `w:id`.
    ///
    /// Range starts take precedence over references. `None` means the
    /// comment has no anchor in the body, which is a format inconsistency
    /// rather than an error.
    pub fn locate(&self, comment_id: &str) -> Option<&Anchor> {
        self.range_starts
            .get(comment_id)
            .or_else(|| self.references.get(comment_id))
    }

    /// Body paragraphs in document order.
    #[inline]
    pub fn paragraphs(&self) -> &[IndexedParagraph] {
        &self.paragraphs
    }

    /// Number of body paragraphs.
    #[inline]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of distinct comment ids with at least one marker.
    pub fn anchored_count(&self) -> usize {
        self.range_starts.len()
            + self
                .references
                .keys()
                .filter(|id| !self.range_starts.contains_key(*id))
                .count()
    }
}
