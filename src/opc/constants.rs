/// Constant values for the WordprocessingML parts involved in comment extraction.

/// Member names of the parts inside a `.docx` container
pub mod part_name {
    /// Main document body
    pub const DOCUMENT: &str = "word/document.xml";
    /// Comment definitions
    pub const COMMENTS: &str = "word/comments.xml";
    /// Word 2012 extended comment data (`w15:commentEx`: parent links, done flag)
    pub const COMMENTS_EXTENDED: &str = "word/commentsExtended.xml";
    /// Word 2016+ extensible comment data (`w16cex:commentExtensible`)
    pub const COMMENTS_EXTENSIBLE: &str = "word/commentsExtensible.xml";

    /// Auxiliary parts in the order they are scanned; later parts win on conflicts.
    pub const AUXILIARY: [&str; 2] = [COMMENTS_EXTENDED, COMMENTS_EXTENSIBLE];
}

/// XML namespace URIs found in comment-related parts
pub mod namespace {
    /// WordprocessingML main namespace
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Word 2010 namespace carrying `w14:paraId`
    pub const WML_2010: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
    /// Word 2012 namespace carrying `w15:commentEx`
    pub const WML_2012: &str = "http://schemas.microsoft.com/office/word/2012/wordml";
    /// Word 2018 extensible comments namespace
    pub const WML_CEX: &str = "http://schemas.microsoft.com/office/word/2018/wordml/cex";
}

/// Local element names used by the extractor
pub mod element {
    pub const BODY: &[u8] = b"body";
    pub const PARAGRAPH: &[u8] = b"p";
    pub const TEXT: &[u8] = b"t";
    pub const COMMENT: &[u8] = b"comment";
    pub const COMMENT_RANGE_START: &[u8] = b"commentRangeStart";
    pub const COMMENT_REFERENCE: &[u8] = b"commentReference";
}
