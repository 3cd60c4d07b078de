//! Directed graph over string keys (schema paths or type names).
//!
//! Used for two questions: which deferred schema paths wait on each other in
//! a cycle, and which record fields contain their own record.

use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Edges keep insertion order so traversal, and any reported cycle, is
/// reproducible.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    fn successors(&self, node: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// First cycle found by a depth-first walk from each node in insertion
    /// order, as the path around it with the first node repeated at the end.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks: IndexMap<&str, Mark> = IndexMap::new();
        let mut stack: Vec<&str> = Vec::new();
        for start in self.edges.keys() {
            if marks.contains_key(start.as_str()) {
                continue;
            }
            if let Some(cycle) = self.visit(start, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'g>(
        &'g self,
        node: &'g str,
        marks: &mut IndexMap<&'g str, Mark>,
        stack: &mut Vec<&'g str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::InProgress);
        stack.push(node);
        for next in self.successors(node) {
            match marks.get(next) {
                Some(Mark::InProgress) => {
                    let from: usize = stack.iter().position(|n| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[from..].iter().map(ToString::to_string).collect();
                    cycle.push(next.to_string());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    if let Some(cycle) = self.visit(next, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
        None
    }

    /// True when `to` is reachable from `from` (a node reaches itself).
    #[must_use]
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut pending: Vec<&str> = vec![from];
        while let Some(node) = pending.pop() {
            if node == to {
                return true;
            }
            if seen.insert(node) {
                pending.extend(self.successors(node));
            }
        }
        false
    }
}
