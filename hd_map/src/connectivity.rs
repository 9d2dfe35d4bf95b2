use std::collections::BTreeSet;

use petgraph::graphmap::DiGraphMap;

use crate::{HdMap, Lane, LaneID};

/// Calculate the strongly connected components (SCC) of the lanes matching a filter, following
/// successor links. The largest component is the "main" graph; the rest is disconnected. Returns
/// (lanes in the largest "main" component, all other disconnected lanes)
pub fn find_scc<F: Fn(&Lane) -> bool>(
    map: &HdMap,
    can_use: F,
) -> (BTreeSet<LaneID>, BTreeSet<LaneID>) {
    let mut graph = DiGraphMap::new();
    for l in map.all_lanes() {
        if !can_use(l) {
            continue;
        }
        graph.add_node(l.id);
        for next in &l.afters {
            if can_use(map.get_l(*next)) {
                graph.add_edge(l.id, *next, 1);
            }
        }
    }
    let components = petgraph::algo::kosaraju_scc(&graph);
    // Ties go to the component with the lowest lane
    let largest_group: BTreeSet<LaneID> = match components
        .into_iter()
        .map(|c| c.into_iter().collect::<BTreeSet<LaneID>>())
        .max_by(|a, b| {
            a.len()
                .cmp(&b.len())
                .then_with(|| b.iter().next().cmp(&a.iter().next()))
        })
    {
        Some(group) => group,
        None => return (BTreeSet::new(), BTreeSet::new()),
    };
    let disconnected = map
        .all_lanes()
        .iter()
        .filter_map(|l| {
            if can_use(l) && !largest_group.contains(&l.id) {
                Some(l.id)
            } else {
                None
            }
        })
        .collect();
    (largest_group, disconnected)
}

pub fn find_driving_scc(map: &HdMap) -> (BTreeSet<LaneID>, BTreeSet<LaneID>) {
    find_scc(map, |l| l.is_driving())
}

/// Driving lanes with nothing leading into them, or nothing leaving them.
pub fn find_dead_ends(map: &HdMap) -> (Vec<LaneID>, Vec<LaneID>) {
    let mut sources = Vec::new();
    let mut sinks = Vec::new();
    for l in map.all_lanes() {
        if !l.is_driving() {
            continue;
        }
        if l.befores.is_empty() {
            sources.push(l.id);
        }
        if l.afters.is_empty() {
            sinks.push(l.id);
        }
    }
    (sources, sinks)
}
