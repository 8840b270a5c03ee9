//! Dependency graph for tasks
//!
//! Reverse-edge lookup ("who is waiting on this task?") in two forms:
//! [`direct_dependents`] scans the snapshot per call, [`DependencyGraph`]
//! indexes the whole snapshot once so a reconciliation pass can answer
//! dependent queries without rescanning. Uses petgraph for the index.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::id::TaskId;
use super::snapshot::Snapshot;
use super::task::Task;

/// Returns every task that lists `task_id` as a blocker, in snapshot order
pub fn direct_dependents(task_id: TaskId, snapshot: &Snapshot) -> Vec<&Task> {
    snapshot
        .iter()
        .filter(|t| t.blockers.contains(task_id))
        .collect()
}

/// Blocker graph over one snapshot
///
/// Node `i` is the task at position `i` of the snapshot it was built from.
/// An edge `blocker -> task` exists for every blocker id present in the
/// snapshot; dangling ids get no edge. Cycles and self-loops are kept.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TaskId, ()>,
}

impl DependencyGraph {
    /// Builds the graph for a snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut graph = DiGraph::with_capacity(snapshot.len(), snapshot.len());
        // First pass: one node per task, in snapshot order
        for task in snapshot {
            graph.add_node(task.id);
        }

        // Second pass: blocker -> dependent edges
        for (pos, task) in snapshot.iter().enumerate() {
            for blocker in task.blockers.iter() {
                if let Some(blocker_pos) = snapshot.position(blocker) {
                    graph.add_edge(NodeIndex::new(blocker_pos), NodeIndex::new(pos), ());
                }
            }
        }

        Self { graph }
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the number of resolved blocker edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Positions of the tasks directly blocked by the task at `pos`
    pub fn dependents_at(&self, pos: usize) -> impl Iterator<Item = usize> + '_ {
        let valid = pos < self.graph.node_count();

        valid
            .then(|| {
                self.graph
                    .neighbors_directed(NodeIndex::new(pos), Direction::Outgoing)
            })
            .into_iter()
            .flatten()
            .map(|n| n.index())
    }

    /// Returns the blocker cycles, each sorted by id
    ///
    /// A cycle is a strongly connected component with more than one task,
    /// or a single task that lists itself. Tasks on a cycle can only leave
    /// it once one of them is done.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<TaskId> = component
                    .into_iter()
                    .filter_map(|n| self.graph.node_weight(n).copied())
                    .collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::StoredState;

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    fn chain() -> Snapshot {
        // 1 <- 2 <- 3, and 4 waits on 1 and a deleted task
        Snapshot::from_tasks([
            Task::new(id(1), "Schema").with_state(StoredState::Done),
            Task::new(id(2), "Model").with_blockers([id(1)]),
            Task::new(id(3), "API").with_blockers([id(2)]),
            Task::new(id(4), "Docs").with_blockers([id(1), id(99)]),
        ])
        .unwrap()
    }

    #[test]
    fn scan_finds_direct_dependents_only() {
        let snap = chain();

        let ids: Vec<_> = direct_dependents(id(1), &snap).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![id(2), id(4)]);

        assert_eq!(direct_dependents(id(3), &snap).len(), 0);
        assert_eq!(direct_dependents(id(99), &snap).len(), 1);
    }

    #[test]
    fn index_matches_scan() {
        let snap = chain();
        let graph = DependencyGraph::from_snapshot(&snap);

        for (pos, task) in snap.iter().enumerate() {
            let scanned: Vec<_> = direct_dependents(task.id, &snap).iter().map(|t| t.id).collect();
            let mut indexed: Vec<_> = graph
                .dependents_at(pos)
                .map(|p| snap.tasks()[p].id)
                .collect();
            indexed.sort_unstable();
            assert_eq!(indexed, scanned);
        }
    }

    #[test]
    fn dangling_blockers_get_no_edge() {
        let graph = DependencyGraph::from_snapshot(&chain());

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn positional_queries() {
        let graph = DependencyGraph::from_snapshot(&chain());

        let mut deps: Vec<_> = graph.dependents_at(0).collect();
        deps.sort_unstable();
        assert_eq!(deps, vec![1, 3]);
        assert_eq!(graph.dependents_at(17).count(), 0);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        assert!(DependencyGraph::from_snapshot(&chain()).cycles().is_empty());
    }

    #[test]
    fn cycles_and_self_loops_reported() {
        let snap = Snapshot::from_tasks([
            Task::new(id(1), "A").with_blockers([id(2)]),
            Task::new(id(2), "B").with_blockers([id(1)]),
            Task::new(id(3), "C").with_blockers([id(3)]),
            Task::new(id(4), "D").with_blockers([id(1)]),
        ])
        .unwrap();

        let cycles = DependencyGraph::from_snapshot(&snap).cycles();
        assert_eq!(cycles, vec![vec![id(1), id(2)], vec![id(3)]]);
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::from_snapshot(&Snapshot::new());
        assert!(graph.is_empty());
        assert!(graph.cycles().is_empty());
    }
}
