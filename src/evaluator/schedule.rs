// ABOUTME: Topological sort of one phase's dependency graph, ties broken by source order

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Kahn's algorithm over `graph` (edge `i -> j` means "i depends on j").
/// Among sites with no unresolved dependency, the lowest index — i.e. the
/// one that appears earliest in document order — runs first, matching
/// spec.md §4.6.3's "ties are broken by source order."
///
/// `Err` carries every site index that could not be scheduled: a strongly
/// connected component of size > 1 somewhere in the graph.
pub fn topological_order(
    indices: &[usize],
    graph: &HashMap<usize, Vec<usize>>,
) -> Result<Vec<usize>, Vec<usize>> {
    let mut remaining: HashMap<usize, usize> = indices
        .iter()
        .map(|&i| (i, graph.get(&i).map(Vec::len).unwrap_or(0)))
        .collect();
    let mut successors: HashMap<usize, Vec<usize>> = indices.iter().map(|&i| (i, Vec::new())).collect();
    for &i in indices {
        if let Some(deps) = graph.get(&i) {
            for &dep in deps {
                successors.entry(dep).or_default().push(i);
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = indices
        .iter()
        .filter(|&&i| remaining[&i] == 0)
        .map(|&i| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(indices.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        if let Some(succs) = successors.get(&i) {
            for &succ in succs {
                let r = remaining.get_mut(&succ).expect("successor was registered above");
                *r -= 1;
                if *r == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }
    }

    if order.len() == indices.len() {
        Ok(order)
    } else {
        let done: HashSet<usize> = order.into_iter().collect();
        Err(indices.iter().copied().filter(|i| !done.contains(i)).collect())
    }
}
