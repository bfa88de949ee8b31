/// Reply links and resolution flags from the auxiliary comment parts.
///
/// Word 2013+ records threading in `word/commentsExtended.xml`:
///
/// ```xml
/// <w15:commentEx w15:paraId="0A1B2C3D" w15:paraIdParent="01234567" w15:done="1"/>
/// ```
///
/// where `paraId` is the `w14:paraId` of a comment's first paragraph. Newer
/// writers also produce `word/commentsExtensible.xml`, and third-party tools
/// have been seen putting the same attributes there under other prefixes and
/// casings. Both parts are swept for any element carrying a paragraph id.
use crate::xml::{LinkAttr, XmlElement, is_truthy_flag};
use std::collections::HashMap;

/// Cross-reference data for one comment paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossRefEntry {
    pub paragraph_id: String,
    pub parent_paragraph_id: Option<String>,
    /// `None` until some part states a done flag for this paragraph
    pub resolved: Option<bool>,
}

/// Paragraph id → cross-reference entry, unioned over the auxiliary parts.
#[derive(Debug, Clone, Default)]
pub struct CrossRefMap {
    entries: HashMap<String, CrossRefEntry>,
}

impl CrossRefMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from parsed auxiliary parts, in scan order.
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a XmlElement>) -> Self {
        let mut map = Self::new();
        for root in parts {
            map.merge_part(root);
        }
        map
    }

    /// Merge every paragraph-id-carrying element of one auxiliary part.
    ///
    /// For a paragraph id already present, a resolved flag or parent link
    /// stated by this part replaces the earlier one; attributes this part
    /// leaves out keep their earlier values.
    pub fn merge_part(&mut self, root: &XmlElement) {
        for element in std::iter::once(root).chain(root.descendants()) {
            if let Some(entry) = entry_from_element(element) {
                self.insert(entry);
            }
        }
    }

    /// Insert an entry; stated values overwrite earlier ones.
    pub fn insert(&mut self, entry: CrossRefEntry) {
        match self.entries.get_mut(&entry.paragraph_id) {
            Some(existing) => {
                if entry.resolved.is_some() {
                    existing.resolved = entry.resolved;
                }
                if entry.parent_paragraph_id.is_some() {
                    existing.parent_paragraph_id = entry.parent_paragraph_id;
                }
            },
            None => {
                self.entries.insert(entry.paragraph_id.clone(), entry);
            },
        }
    }

    /// Look up the entry for a paragraph id.
    #[inline]
    pub fn get(&self, paragraph_id: &str) -> Option<&CrossRefEntry> {
        self.entries.get(paragraph_id)
    }

    /// Parent paragraph id declared for a paragraph id.
    pub fn parent_of(&self, paragraph_id: &str) -> Option<&str> {
        self.get(paragraph_id)
            .and_then(|e| e.parent_paragraph_id.as_deref())
    }

    /// Check if a paragraph id is flagged resolved.
    pub fn is_resolved(&self, paragraph_id: &str) -> bool {
        self.get(paragraph_id).is_some_and(|e| e.resolved == Some(true))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_from_element(element: &XmlElement) -> Option<CrossRefEntry> {
    let mut paragraph_id = None;
    let mut parent_paragraph_id = None;
    let mut resolved = None;

    for attr in element.attributes() {
        match LinkAttr::classify(&attr.name) {
            Some(LinkAttr::ParagraphId) if paragraph_id.is_none() => {
                paragraph_id = Some(attr.value.clone());
            },
            Some(LinkAttr::ParentParagraphId) if parent_paragraph_id.is_none() => {
                parent_paragraph_id = Some(attr.value.clone());
            },
            Some(LinkAttr::Done) => resolved = Some(is_truthy_flag(&attr.value)),
            _ => {},
        }
    }

    Some(CrossRefEntry {
        paragraph_id: paragraph_id?,
        parent_paragraph_id,
        resolved,
    })
}
