//! Reply trees reconstructed from flat comment sequences
//!
//! Comments are stored flat, each reply pointing at its parent through
//! `parent_id`. A [`CommentThread`] indexes one sequence and rebuilds the
//! tree on demand. A comment whose parent is missing, or which cannot be
//! reached from any root because of a reference cycle, is shown as a root.

use std::collections::{HashMap, HashSet};

use crate::models::{Comment, EntityId};

/// Indexed, read-only view of one comment sequence
#[derive(Debug)]
pub struct CommentThread<'a> {
    comments: &'a [Comment],
    by_id: HashMap<&'a EntityId, usize>,
    children: HashMap<&'a EntityId, Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> CommentThread<'a> {
    pub fn build(comments: &'a [Comment]) -> Self {
        let by_id: HashMap<&EntityId, usize> =
            comments.iter().enumerate().map(|(i, c)| (&c.id, i)).collect();

        let mut children: HashMap<&EntityId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (i, comment) in comments.iter().enumerate() {
            match &comment.parent_id {
                Some(parent) if by_id.contains_key(parent) && *parent != comment.id => {
                    children.entry(parent).or_default().push(i);
                }
                _ => roots.push(i),
            }
        }

        let mut thread = Self {
            comments,
            by_id,
            children,
            roots,
        };

        // Anything not reachable from a root sits on a cycle: promote it
        let mut reached = HashSet::new();
        for &root in &thread.roots {
            thread.mark_reachable(root, &mut reached);
        }
        for i in 0..comments.len() {
            if !reached.contains(&i) {
                thread.roots.push(i);
                thread.mark_reachable(i, &mut reached);
            }
        }
        thread.roots.sort_unstable();

        thread
    }

    fn mark_reachable(&self, start: usize, reached: &mut HashSet<usize>) {
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if !reached.insert(i) {
                continue;
            }
            if let Some(kids) = self.children.get(&self.comments[i].id) {
                stack.extend(kids.iter().copied());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&'a Comment> {
        self.by_id.get(id).map(|&i| &self.comments[i])
    }

    /// Top-level comments in their original order
    pub fn roots(&self) -> Vec<&'a Comment> {
        self.roots.iter().map(|&i| &self.comments[i]).collect()
    }

    /// Direct replies to `id` in their original order
    pub fn replies(&self, id: &EntityId) -> Vec<&'a Comment> {
        self.children
            .get(id)
            .map(|kids| kids.iter().map(|&i| &self.comments[i]).collect())
            .unwrap_or_default()
    }

    /// Identities of every comment beneath `id`, not including `id` itself
    pub fn descendants(&self, id: &EntityId) -> HashSet<EntityId> {
        let mut found = HashSet::new();
        let mut stack: Vec<usize> = self.children.get(id).cloned().unwrap_or_default();
        while let Some(i) = stack.pop() {
            let comment = &self.comments[i];
            if comment.id == *id || !found.insert(comment.id.clone()) {
                continue;
            }
            if let Some(kids) = self.children.get(&comment.id) {
                stack.extend(kids.iter().copied());
            }
        }
        found
    }

    /// Depth-first, pre-order traversal yielding each comment with its depth
    pub fn walk(&self) -> Vec<(usize, &'a Comment)> {
        let mut out = Vec::with_capacity(self.comments.len());
        let mut visited = HashSet::new();
        for &root in &self.roots {
            let mut stack = vec![(0usize, root)];
            while let Some((depth, i)) = stack.pop() {
                if !visited.insert(i) {
                    continue;
                }
                out.push((depth, &self.comments[i]));
                if let Some(kids) = self.children.get(&self.comments[i].id) {
                    // Reverse so the earliest reply is visited first
                    stack.extend(kids.iter().rev().map(|&k| (depth + 1, k)));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: &str, parent: Option<&str>) -> Comment {
        Comment {
            id: EntityId::from(id),
            author_id: "user1".into(),
            author_name: "John Doe".into(),
            author_avatar: None,
            content: format!("comment {}", id),
            created_at: Utc::now(),
            parent_id: parent.map(EntityId::from),
        }
    }

    fn walk_ids(thread: &CommentThread<'_>) -> Vec<(usize, String)> {
        thread
            .walk()
            .into_iter()
            .map(|(d, c)| (d, c.id.to_string()))
            .collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let comments = vec![
            comment("1", None),
            comment("2", Some("1")),
            comment("3", None),
            comment("4", Some("2")),
            comment("5", Some("1")),
        ];
        let thread = CommentThread::build(&comments);

        let roots: Vec<_> = thread.roots().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(roots, vec!["1", "3"]);
        assert_eq!(thread.replies(&EntityId::from("1")).len(), 2);

        assert_eq!(
            walk_ids(&thread),
            vec![
                (0, "1".to_string()),
                (1, "2".to_string()),
                (2, "4".to_string()),
                (1, "5".to_string()),
                (0, "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_orphan_reply_becomes_root() {
        let comments = vec![comment("1", None), comment("2", Some("missing"))];
        let thread = CommentThread::build(&comments);

        assert_eq!(thread.roots().len(), 2);
        assert!(thread.get(&EntityId::from("2")).unwrap().is_reply());
    }

    #[test]
    fn test_cycle_is_broken() {
        let comments = vec![comment("a", Some("b")), comment("b", Some("a"))];
        let thread = CommentThread::build(&comments);

        let walked = walk_ids(&thread);
        assert_eq!(walked.len(), 2);
        assert_eq!(walked[0], (0, "a".to_string()));
        assert_eq!(walked[1], (1, "b".to_string()));
    }

    #[test]
    fn test_self_parent_is_root() {
        let comments = vec![comment("a", Some("a"))];
        let thread = CommentThread::build(&comments);
        assert_eq!(thread.roots().len(), 1);
        assert!(thread.descendants(&EntityId::from("a")).is_empty());
    }

    #[test]
    fn test_descendants() {
        let comments = vec![
            comment("1", None),
            comment("2", Some("1")),
            comment("3", Some("2")),
            comment("4", None),
        ];
        let thread = CommentThread::build(&comments);

        let below = thread.descendants(&EntityId::from("1"));
        assert_eq!(below.len(), 2);
        assert!(below.contains(&EntityId::from("2")));
        assert!(below.contains(&EntityId::from("3")));
        assert!(thread.descendants(&EntityId::from("4")).is_empty());
    }
}
