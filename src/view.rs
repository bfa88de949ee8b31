/// Read-only views over an extracted record set.
///
/// Exporters and viewers consume the flat, ordered record list; these
/// helpers cover the selections they share: grouping into threads, filtering
/// on resolution and picking columns.
use crate::docx::CommentRecord;
use smallvec::SmallVec;
use std::collections::HashMap;

/// A thread of comments, borrowed from a record set.
#[derive(Debug, Clone)]
pub struct CommentThread<'a> {
    thread_id: usize,
    members: SmallVec<[&'a CommentRecord; 4]>,
}

impl<'a> CommentThread<'a> {
    /// The thread id shared by all members.
    #[inline]
    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    /// Members in record-set order.
    #[inline]
    pub fn members(&self) -> &[&'a CommentRecord] {
        &self.members
    }

    /// The member that starts the thread.
    pub fn root(&self) -> Option<&'a CommentRecord> {
        self.members.iter().copied().find(|r| r.is_thread_root())
    }

    /// All members except the root.
    pub fn replies(&self) -> impl Iterator<Item = &'a CommentRecord> + '_ {
        self.members.iter().copied().filter(|r| !r.is_thread_root())
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the thread has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A thread is resolved only when every member is.
    ///
    /// Resolution is recorded per comment and is not inherited by replies.
    pub fn is_resolved(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|r| r.resolved)
    }
}

/// Group records into threads.
///
/// Threads are ordered by the position of their first member in `records`,
/// and members keep their relative order.
pub fn threads(records: &[CommentRecord]) -> Vec<CommentThread<'_>> {
    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut result: Vec<CommentThread<'_>> = Vec::new();

    for record in records {
        let slot = *slots.entry(record.thread_id).or_insert_with(|| {
            result.push(CommentThread {
                thread_id: record.thread_id,
                members: SmallVec::new(),
            });
            result.len() - 1
        });
        result[slot].members.push(record);
    }

    result
}

/// Selection of records by resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedFilter {
    /// Keep every record
    #[default]
    All,
    /// Keep only resolved records
    ResolvedOnly,
    /// Keep only unresolved records
    UnresolvedOnly,
}

impl ResolvedFilter {
    /// Check whether a record passes the filter.
    #[inline]
    pub fn accepts(&self, record: &CommentRecord) -> bool {
        match self {
            ResolvedFilter::All => true,
            ResolvedFilter::ResolvedOnly => record.resolved,
            ResolvedFilter::UnresolvedOnly => !record.resolved,
        }
    }

    /// Records passing the filter, in their original order.
    pub fn apply<'a>(&self, records: &'a [CommentRecord]) -> Vec<&'a CommentRecord> {
        records.iter().filter(|r| self.accepts(r)).collect()
    }
}

/// A column of the exported record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Text,
    Comment,
    Author,
    Initials,
    Date,
    Line,
    Page,
    Resolved,
    CommentId,
    ParaId,
    ParentId,
    OrphanedParentId,
    ThreadId,
    ThreadSize,
    ReplyDepth,
}

impl Column {
    /// Every column, in export order.
    pub const ALL: [Column; 15] = [
        Column::Text,
        Column::Comment,
        Column::Author,
        Column::Initials,
        Column::Date,
        Column::Line,
        Column::Page,
        Column::Resolved,
        Column::CommentId,
        Column::ParaId,
        Column::ParentId,
        Column::OrphanedParentId,
        Column::ThreadId,
        Column::ThreadSize,
        Column::ReplyDepth,
    ];

    /// Column header, matching the serialized field name.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Text => "Text",
            Column::Comment => "Comment",
            Column::Author => "Author",
            Column::Initials => "Initials",
            Column::Date => "Date",
            Column::Line => "Line",
            Column::Page => "Page",
            Column::Resolved => "Resolved",
            Column::CommentId => "commentId",
            Column::ParaId => "paraId",
            Column::ParentId => "parentId",
            Column::OrphanedParentId => "orphanedParentId",
            Column::ThreadId => "threadId",
            Column::ThreadSize => "threadSize",
            Column::ReplyDepth => "replyDepth",
        }
    }

    /// Look up a column by header, case-insensitively.
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(header.trim()))
    }
}

impl CommentRecord {
    /// Cell value of a column as text; `None` for missing values.
    ///
    /// Dates are rendered as RFC 3339.
    pub fn column_value(&self, column: Column) -> Option<String> {
        match column {
            Column::Text => Some(self.text.clone()),
            Column::Comment => Some(self.comment.clone()),
            Column::Author => Some(self.author.clone()),
            Column::Initials => self.initials.clone(),
            Column::Date => self.date.map(|d| d.to_rfc3339()),
            Column::Line => self.line.map(|v| v.to_string()),
            Column::Page => self.page.map(|v| v.to_string()),
            Column::Resolved => Some(self.resolved.to_string()),
            Column::CommentId => Some(self.comment_id.clone()),
            Column::ParaId => self.para_id.clone(),
            Column::ParentId => self.parent_id.clone(),
            Column::OrphanedParentId => self.orphaned_parent_id.clone(),
            Column::ThreadId => Some(self.thread_id.to_string()),
            Column::ThreadSize => Some(self.thread_size.to_string()),
            Column::ReplyDepth => Some(self.reply_depth.to_string()),
        }
    }

    /// Cell values for a column selection.
    pub fn select(&self, columns: &[Column]) -> Vec<Option<String>> {
        columns.iter().map(|c| self.column_value(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::record::sample_record;

    fn thread_records() -> Vec<CommentRecord> {
        let mut root = sample_record("0", Some(1));
        root.para_id = Some("P0".into());
        root.thread_size = 2;
        root.resolved = true;

        let mut other = sample_record("1", Some(2));
        other.thread_id = 2;

        let mut reply = sample_record("2", Some(3));
        reply.parent_id = Some("P0".into());
        reply.thread_size = 2;
        reply.reply_depth = 1;

        vec![root, other, reply]
    }

    #[test]
    fn test_threads_grouped_in_first_appearance_order() {
        let records = thread_records();
        let threads = threads(&records);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].thread_id(), 1);
        assert_eq!(threads[0].len(), 2);
        assert_eq!(threads[0].root().unwrap().comment_id, "0");
        let replies: Vec<&str> = threads[0].replies().map(|r| r.comment_id.as_str()).collect();
        assert_eq!(replies, vec!["2"]);
        assert_eq!(threads[1].thread_id(), 2);
    }

    #[test]
    fn test_thread_resolved_requires_all_members() {
        let mut records = thread_records();
        assert!(!threads(&records)[0].is_resolved());

        records[2].resolved = true;
        assert!(threads(&records)[0].is_resolved());
    }

    #[test]
    fn test_resolved_filter() {
        let records = thread_records();
        assert_eq!(ResolvedFilter::All.apply(&records).len(), 3);
        assert_eq!(ResolvedFilter::ResolvedOnly.apply(&records).len(), 1);
        assert_eq!(ResolvedFilter::UnresolvedOnly.apply(&records).len(), 2);
    }

    #[test]
    fn test_column_selection() {
        let records = thread_records();
        let row = records[2].select(&[Column::CommentId, Column::ParentId, Column::Date, Column::Page]);
        assert_eq!(
            row,
            vec![Some("2".to_string()), Some("P0".to_string()), None, Some("1".to_string())]
        );
    }

    #[test]
    fn test_column_headers_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("THREADID"), Some(Column::ThreadId));
        assert_eq!(Column::from_header("nope"), None);
    }
}
