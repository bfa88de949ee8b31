/// Comment definitions from the `word/comments.xml` part.
///
/// Each `<w:comment>` carries its id, author, initials and date as attributes
/// and its body as ordinary paragraphs. The `w14:paraId` of the first of
/// those paragraphs is the key that ties the comment to its reply and
/// resolution data in the auxiliary parts.
use crate::opc::constants::element;
use crate::xml::{LinkAttr, XmlElement};
use chrono::{DateTime, NaiveDateTime, Utc};

/// A comment as defined in the comments part, before correlation.
///
/// # Examples
///
/// ```rust
/// use litchi_comments::docx::RawComment;
/// use litchi_comments::xml::XmlElement;
///
/// let xml = br#"<w:comments xmlns:w="urn:w" xmlns:w14="urn:w14">
///   <w:comment w:id="0" w:author="Ann" w:date="2024-03-01T10:00:00Z">
///     <w:p w14:paraId="1A"><w:r><w:t>Check this</w:t></w:r></w:p>
///   </w:comment>
/// </w:comments>"#;
/// let root = XmlElement::parse(xml, "word/comments.xml")?;
/// let comments = RawComment::extract_all(&root);
///
/// assert_eq!(comments[0].author, "Ann");
/// assert_eq!(comments[0].text, "Check this");
/// assert_eq!(comments[0].anchor_paragraph_id.as_deref(), Some("1A"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// The `w:id` attribute, kept as an opaque string
    pub id: String,
    pub author: String,
    pub initials: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Comment body, one space between paragraphs
    pub text: String,
    /// Paragraph identifier of the comment's first paragraph
    pub anchor_paragraph_id: Option<String>,
}

impl RawComment {
    /// Build a comment from a `<w:comment>` element.
    pub fn from_element(comment: &XmlElement) -> Self {
        let mut paragraphs = comment.descendants_named(element::PARAGRAPH);

        let mut anchor_paragraph_id = None;
        let mut text = String::new();

        if let Some(first) = paragraphs.next() {
            anchor_paragraph_id = paragraph_id(first);
            push_paragraph_text(&mut text, first);
        }
        for paragraph in paragraphs {
            push_paragraph_text(&mut text, paragraph);
        }

        Self {
            id: comment.attr("id").unwrap_or_default().to_string(),
            author: comment.attr("author").unwrap_or_default().to_string(),
            initials: comment.attr("initials").map(str::to_string),
            timestamp: comment.attr("date").and_then(parse_timestamp),
            text,
            anchor_paragraph_id,
        }
    }

    /// Extract every comment definition from the root of the comments part.
    ///
    /// Comments are returned in document order.
    pub fn extract_all(comments_root: &XmlElement) -> Vec<RawComment> {
        let definitions: Vec<&XmlElement> = if comments_root.is(element::COMMENT) {
            vec![comments_root]
        } else {
            comments_root.descendants_named(element::COMMENT).collect()
        };

        definitions.into_iter().map(RawComment::from_element).collect()
    }
}

fn paragraph_id(paragraph: &XmlElement) -> Option<String> {
    paragraph
        .attributes()
        .iter()
        .find(|a| LinkAttr::classify(&a.name) == Some(LinkAttr::ParagraphId))
        .map(|a| a.value.clone())
}

fn push_paragraph_text(text: &mut String, paragraph: &XmlElement) {
    let paragraph_text = paragraph.text_of(element::TEXT);
    if paragraph_text.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(&paragraph_text);
}

/// Parse a `w:date` value.
///
/// Word writes `2024-03-01T10:00:00Z`; older writers omit the zone, which is
/// read as UTC. Unparseable dates are dropped.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
