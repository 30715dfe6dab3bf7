// ABOUTME: Builds the dependency graph among call sites within one phase

use super::CallSite;
use std::collections::{HashMap, HashSet};

/// For every site index in `indices`, which other site indices (also in
/// `indices`) must run first. An edge `i -> j` means "i depends on j" — j's
/// effect on the tree must be visible before i runs.
///
/// Edges to a site outside `indices` (i.e. in a different phase) are not
/// represented here: strict phase ordering already guarantees an earlier
/// phase has fully run, and a dependency on a later phase cannot be
/// satisfied by any edge anyway.
pub fn build_graph(sites: &[CallSite], indices: &[usize]) -> HashMap<usize, Vec<usize>> {
    let same_phase: HashSet<usize> = indices.iter().copied().collect();
    let mut graph: HashMap<usize, Vec<usize>> = indices.iter().map(|&i| (i, Vec::new())).collect();

    for &i in indices {
        for cursor in sites[i].expr.dependencies() {
            let mut best: Option<usize> = None;
            let mut best_len = 0usize;
            for &j in indices {
                if j == i {
                    continue;
                }
                if sites[j].path.is_prefix_of(&cursor) && sites[j].path.segments.len() >= best_len {
                    best = Some(j);
                    best_len = sites[j].path.segments.len();
                }
            }
            if let Some(j) = best {
                if same_phase.contains(&j) {
                    let edges = graph.entry(i).or_default();
                    if !edges.contains(&j) {
                        edges.push(j);
                    }
                }
            }
        }
    }

    graph
}
