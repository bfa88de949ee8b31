//! Attribute name normalization.
//!
//! Different generations of Word (and third-party writers) emit the same
//! logical attribute under different qualified names: `w14:paraId`,
//! `w15:paraId`, `W15:PARAID`, or a Clark-style `{uri}paraId`. Matching is
//! therefore done on a normalized form: namespace part stripped, lowercased,
//! then a substring test against the logical name.

/// Normalize a qualified attribute name for matching.
///
/// Strips a `prefix:` or `{namespace}` qualifier and lowercases the rest.
///
/// # Examples
///
/// ```
/// use litchi_comments::xml::normalize_attr_name;
///
/// assert_eq!(normalize_attr_name("w15:paraIdParent"), "paraidparent");
/// assert_eq!(normalize_attr_name("{http://example.com/ns}Done"), "done");
/// assert_eq!(normalize_attr_name("id"), "id");
/// ```
pub fn normalize_attr_name(raw: &str) -> String {
    let local = match raw.rfind('}') {
        Some(end) => &raw[end + 1..],
        None => raw.rsplit(':').next().unwrap_or(raw),
    };
    local.to_ascii_lowercase()
}

/// Check whether a qualified attribute name carries the given logical name.
///
/// `logical` is compared lowercased, as a substring of the normalized name.
#[inline]
pub fn attr_name_matches(raw: &str, logical: &str) -> bool {
    normalize_attr_name(raw).contains(&logical.to_ascii_lowercase())
}

/// Logical attributes that link comments across parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAttr {
    /// Identifier of the paragraph the element describes (`paraId`)
    ParagraphId,
    /// Identifier of the parent comment's paragraph (`paraIdParent`)
    ParentParagraphId,
    /// Resolved flag (`done`)
    Done,
}

impl LinkAttr {
    /// Classify a qualified attribute name.
    ///
    /// `paraIdParent` contains `paraId`, so the parent link is tested first.
    pub fn classify(raw: &str) -> Option<Self> {
        if attr_name_matches(raw, "paraIdParent") {
            Some(LinkAttr::ParentParagraphId)
        } else if attr_name_matches(raw, "paraId") {
            Some(LinkAttr::ParagraphId)
        } else if attr_name_matches(raw, "done") {
            Some(LinkAttr::Done)
        } else {
            None
        }
    }
}

/// Interpret a resolved-flag attribute value.
#[inline]
pub fn is_truthy_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
