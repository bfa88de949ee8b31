//! In-memory `.docx` fixtures for tests.

use crate::opc::constants::{namespace, part_name};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a ZIP archive from `(member name, content)` pairs.
pub(crate) fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// A body paragraph with the given text, carrying a range and a reference
/// marker for each comment id.
pub(crate) fn body_paragraph(text: &str, comment_ids: &[&str]) -> String {
    let mut xml = String::from("<w:p>");
    for id in comment_ids {
        xml.push_str(&format!(r#"<w:commentRangeStart w:id="{id}"/>"#));
    }
    xml.push_str(&format!("<w:r><w:t>{text}</w:t></w:r>"));
    for id in comment_ids {
        xml.push_str(&format!(
            r#"<w:commentRangeEnd w:id="{id}"/><w:r><w:rPr><w:rStyle w:val="CommentReference"/></w:rPr><w:commentReference w:id="{id}"/></w:r>"#
        ));
    }
    xml.push_str("</w:p>");
    xml
}

/// A `<w:comment>` definition with a single paragraph.
pub(crate) fn comment_definition(
    id: &str,
    author: &str,
    date: Option<&str>,
    para_id: &str,
    text: &str,
) -> String {
    let date = date
        .map(|d| format!(r#" w:date="{d}""#))
        .unwrap_or_default();
    format!(
        r#"<w:comment w:id="{id}" w:author="{author}"{date} w:initials="{initial}"><w:p w14:paraId="{para_id}" w14:textId="77777777"><w:r><w:annotationRef/></w:r><w:r><w:t>{text}</w:t></w:r></w:p></w:comment>"#,
        initial = author.chars().next().unwrap_or('X'),
    )
}

/// Builder for a minimal Word container with comment parts.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocxFixture {
    body: Vec<String>,
    comments: Vec<String>,
    extended: Vec<String>,
    extensible: Vec<String>,
    raw_extensible: Option<String>,
}

impl DocxFixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn body(mut self, paragraph: String) -> Self {
        self.body.push(paragraph);
        self
    }

    pub(crate) fn comment(mut self, definition: String) -> Self {
        self.comments.push(definition);
        self
    }

    pub(crate) fn raw_comment(mut self, definition: &str) -> Self {
        self.comments.push(definition.to_string());
        self
    }

    pub(crate) fn extended(mut self, entry: &str) -> Self {
        self.extended.push(entry.to_string());
        self
    }

    pub(crate) fn extensible(mut self, entry: &str) -> Self {
        self.extensible.push(entry.to_string());
        self
    }

    pub(crate) fn raw_extensible(mut self, xml: &str) -> Self {
        self.raw_extensible = Some(xml.to_string());
        self
    }

    pub(crate) fn to_zip(&self) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{w}" xmlns:w14="{w14}"><w:body>{body}<w:sectPr/></w:body></w:document>"#,
            w = namespace::WML_MAIN,
            w14 = namespace::WML_2010,
            body = self.body.concat(),
        );
        let comments = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:comments xmlns:w="{w}" xmlns:w14="{w14}">{comments}</w:comments>"#,
            w = namespace::WML_MAIN,
            w14 = namespace::WML_2010,
            comments = self.comments.concat(),
        );

        let mut parts = vec![
            (part_name::DOCUMENT, document),
            (part_name::COMMENTS, comments),
        ];
        if !self.extended.is_empty() {
            parts.push((
                part_name::COMMENTS_EXTENDED,
                format!(
                    r#"<w15:commentsEx xmlns:w15="{w15}">{entries}</w15:commentsEx>"#,
                    w15 = namespace::WML_2012,
                    entries = self.extended.concat(),
                ),
            ));
        }
        if let Some(raw) = &self.raw_extensible {
            parts.push((part_name::COMMENTS_EXTENSIBLE, raw.clone()));
        } else if !self.extensible.is_empty() {
            parts.push((
                part_name::COMMENTS_EXTENSIBLE,
                format!(
                    r#"<w16cex:commentsExtensible xmlns:w16cex="{cex}">{entries}</w16cex:commentsExtensible>"#,
                    cex = namespace::WML_CEX,
                    entries = self.extensible.concat(),
                ),
            ));
        }

        let borrowed: Vec<(&str, &str)> = parts.iter().map(|(n, c)| (*n, c.as_str())).collect();
        zip_parts(&borrowed)
    }
}
