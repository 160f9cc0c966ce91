//! Newest-first traversal over a commit history that carries markers from
//! each commit to its ancestors.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use crate::error::Result;
use crate::git::graph::CommitGraph;

/// Identifier of something reaching a commit, e.g. a describe candidate
pub type Marker = usize;

struct Pending<Id> {
    time: i64,
    sequence: u64,
    id: Id,
}

// Newest commit first, then first enqueued first
impl<Id> Ord for Pending<Id> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<Id> PartialOrd for Pending<Id> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Id> PartialEq for Pending<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl<Id> Eq for Pending<Id> {}

/// An open traversal over the history reachable from one start commit.
///
/// Commits come out newest first. The parents of a returned commit are only
/// queued on the following call to [`HistoryWalk::next_commit`], so markers
/// placed on a commit in between are carried to all of its ancestors.
///
/// Markers reaching a commit whose parents are already queued are carried on
/// to those parents and, through any commit already expanded, further down.
/// With clock skew a parent can still come out before its child; markers
/// arriving after that cannot change what callers saw when it came out.
pub struct HistoryWalk<'g, G: CommitGraph> {
    graph: &'g G,
    queue: BinaryHeap<Pending<G::Id>>,
    queued: HashSet<G::Id>,
    markers: HashMap<G::Id, BTreeSet<Marker>>,
    /// Parents of every commit whose parents have been queued
    expanded: HashMap<G::Id, Vec<G::Id>>,
    sequence: u64,
    current: Option<G::Id>,
}

impl<'g, G: CommitGraph> HistoryWalk<'g, G> {
    pub fn new(graph: &'g G, start: G::Id) -> Result<Self> {
        let mut walk = HistoryWalk {
            graph,
            queue: BinaryHeap::new(),
            queued: HashSet::new(),
            markers: HashMap::new(),
            expanded: HashMap::new(),
            sequence: 0,
            current: None,
        };
        walk.enqueue(start)?;
        Ok(walk)
    }

    /// Produce the next commit, or `None` once the history is exhausted
    pub fn next_commit(&mut self) -> Result<Option<G::Id>> {
        if let Some(current) = self.current.take() {
            self.expand(current)?;
        }

        self.current = self.queue.pop().map(|pending| pending.id);
        Ok(self.current)
    }

    pub fn mark(&mut self, id: G::Id, marker: Marker) {
        self.carry(id, &BTreeSet::from([marker]));
    }

    /// Whether the marker has reached the commit
    pub fn reaches(&self, id: G::Id, marker: Marker) -> bool {
        self.markers
            .get(&id)
            .is_some_and(|markers| markers.contains(&marker))
    }

    pub fn has_any_marker(&self, id: G::Id) -> bool {
        self.markers
            .get(&id)
            .is_some_and(|markers| !markers.is_empty())
    }

    pub fn has_all_markers(&self, id: G::Id, wanted: &[Marker]) -> bool {
        wanted.iter().all(|marker| self.reaches(id, *marker))
    }

    /// Whether every commit still waiting in the queue carries all `wanted`
    /// markers. Together with the last returned commit carrying them too,
    /// this means nothing left to walk can lack any of them.
    pub fn pending_have_all_markers(&self, wanted: &[Marker]) -> bool {
        self.queue
            .iter()
            .all(|pending| self.has_all_markers(pending.id, wanted))
    }

    fn expand(&mut self, id: G::Id) -> Result<()> {
        let carried = self.markers.get(&id).cloned().unwrap_or_default();
        let parents = self.graph.parents(id)?;

        for &parent in &parents {
            if !carried.is_empty() {
                self.carry(parent, &carried);
            }
            if !self.queued.contains(&parent) {
                self.enqueue(parent)?;
            }
        }

        self.expanded.insert(id, parents);
        Ok(())
    }

    /// Add markers to a commit and to every already expanded ancestor
    fn carry(&mut self, id: G::Id, incoming: &BTreeSet<Marker>) {
        let mut stack = vec![id];

        while let Some(next) = stack.pop() {
            let markers = self.markers.entry(next).or_default();
            let before = markers.len();
            markers.extend(incoming.iter().copied());

            if markers.len() > before {
                if let Some(parents) = self.expanded.get(&next) {
                    stack.extend(parents.iter().copied());
                }
            }
        }
    }

    fn enqueue(&mut self, id: G::Id) -> Result<()> {
        let time = self.graph.commit_time(id)?;
        self.queued.insert(id);
        self.queue.push(Pending {
            time,
            sequence: self.sequence,
            id,
        });
        self.sequence += 1;
        Ok(())
    }
}
