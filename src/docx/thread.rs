/// Thread reconstruction from paragraph-id reply links.
///
/// Comments appear in the comments part in no particular relation to their
/// reply structure: a reply can precede the comment it answers. Threads are
/// therefore built by propagation to a fixed point rather than by a single
/// top-down walk:
///
/// 1. Every comment without a parent link starts a thread.
/// 2. Repeatedly, every unassigned comment whose parent paragraph already
///    belongs to a thread joins it, and its own paragraph becomes joinable.
///    This stops after a pass with no progress or after the pass bound.
/// 3. Whatever is left has a parent that never resolved and is promoted to a
///    thread of its own.
use crate::config::DEFAULT_MAX_PROPAGATION_PASSES;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Reply link data for one comment, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentLink {
    /// The comment's own paragraph id
    pub para_id: Option<String>,
    /// The declared parent paragraph id
    pub parent_id: Option<String>,
}

impl CommentLink {
    pub fn new(para_id: Option<&str>, parent_id: Option<&str>) -> Self {
        Self {
            para_id: para_id.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
        }
    }
}

/// Thread placement of one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAssignment {
    /// Sequential thread id, starting at 1
    pub thread_id: usize,
    /// Number of comments in the thread
    pub thread_size: usize,
    /// 0 for thread roots; otherwise the 0-based rank of the comment among its
    /// thread's members in extraction order
    pub reply_depth: usize,
    /// Whether the comment declared a parent that never resolved and was made
    /// a root instead
    pub promoted: bool,
}

/// Fixed-point thread builder.
#[derive(Debug, Clone, Copy)]
pub struct ThreadBuilder {
    max_passes: usize,
}

impl Default for ThreadBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROPAGATION_PASSES)
    }
}

impl ThreadBuilder {
    /// Create a builder with the given bound on propagation passes.
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Assign every comment to exactly one thread.
    ///
    /// The result is parallel to `links`.
    ///
    /// `reply_depth` is a position within the thread, not the length of the
    /// parent chain: a reply to a reply and a second direct reply can both get
    /// depth 2, and a reply that precedes its root in extraction order gets
    /// depth 0.
    pub fn build(&self, links: &[CommentLink]) -> Vec<ThreadAssignment> {
        let mut thread_of: Vec<Option<usize>> = vec![None; links.len()];
        let mut promoted = vec![false; links.len()];
        let mut by_paragraph: HashMap<&str, usize> = HashMap::with_capacity(links.len());
        let mut next_thread = 1;

        for (i, link) in links.iter().enumerate() {
            if link.parent_id.is_none() {
                thread_of[i] = Some(next_thread);
                if let Some(para_id) = link.para_id.as_deref() {
                    by_paragraph.insert(para_id, next_thread);
                }
                next_thread += 1;
            }
        }

        let mut passes = 0;
        while passes < self.max_passes {
            passes += 1;
            let mut assigned = 0;

            for (i, link) in links.iter().enumerate() {
                if thread_of[i].is_some() {
                    continue;
                }
                let Some(parent) = link.parent_id.as_deref() else {
                    continue;
                };
                if let Some(&thread) = by_paragraph.get(parent) {
                    thread_of[i] = Some(thread);
                    if let Some(para_id) = link.para_id.as_deref() {
                        by_paragraph.insert(para_id, thread);
                    }
                    assigned += 1;
                }
            }

            if assigned == 0 {
                break;
            }
        }
        debug!(passes, comments = links.len(), "reply propagation finished");

        for (i, link) in links.iter().enumerate() {
            if thread_of[i].is_none() {
                warn!(
                    para_id = link.para_id.as_deref().unwrap_or(""),
                    parent_id = link.parent_id.as_deref().unwrap_or(""),
                    "reply parent not found, promoting comment to its own thread"
                );
                thread_of[i] = Some(next_thread);
                promoted[i] = true;
                next_thread += 1;
            }
        }

        let mut sizes = vec![0usize; next_thread];
        for thread in thread_of.iter().flatten() {
            sizes[*thread] += 1;
        }

        let mut seen = vec![0usize; next_thread];
        thread_of
            .iter()
            .zip(links)
            .zip(promoted)
            .map(|((thread, link), promoted)| {
                let thread_id = thread.unwrap_or_default();
                let rank = seen[thread_id];
                seen[thread_id] += 1;
                let is_root = link.parent_id.is_none() || promoted;
                ThreadAssignment {
                    thread_id,
                    thread_size: sizes[thread_id],
                    reply_depth: if is_root { 0 } else { rank },
                    promoted,
                }
            })
            .collect()
    }
}
