//! Nearest release tag lookup, the equivalent of
//! `git describe --tags --match '<prefix>*'`.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{TagPrefix, Version};
use crate::error::{Result, VersioningError};
use crate::git::graph::CommitGraph;
use crate::git::walk::{HistoryWalk, Marker};

/// Upper bound on tags tracked at once during a walk
pub const MAX_CANDIDATES: usize = 10;

struct Candidate {
    tag: String,
    marker: Marker,
    /// Commits reachable from the start but not (yet known to be) from this tag
    depth: usize,
}

/// Describes the head of a [`CommitGraph`] relative to its closest release tag
pub struct DescribeWithPrefix<'g, G: CommitGraph> {
    graph: &'g G,
    prefix: &'g TagPrefix,
}

impl<'g, G: CommitGraph> DescribeWithPrefix<'g, G> {
    pub fn new(graph: &'g G, prefix: &'g TagPrefix) -> Self {
        DescribeWithPrefix { graph, prefix }
    }

    /// `<tag>` when the head is tagged, `<tag>-<depth>-g<abbrev>` when it is
    /// `depth` commits past a tag, `None` when no release tag is reachable.
    pub fn describe(&self) -> Result<Option<String>> {
        let target = self
            .graph
            .head()?
            .ok_or(VersioningError::NoCurrentRevision)?;

        let tags = self.release_tags()?;

        if let Some(tag) = tags.get(&target) {
            debug!(tag = %tag, "head is a release tag");
            return Ok(Some(tag.clone()));
        }

        let mut walk = HistoryWalk::new(self.graph, target)?;
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut seen = 0usize;

        while let Some(commit) = walk.next_commit()? {
            // A tag below an already found tag is never the closer one
            if !walk.has_any_marker(commit) {
                if let Some(tag) = tags.get(&commit) {
                    let marker = candidates.len();
                    walk.mark(commit, marker);
                    debug!(tag = %tag, depth = seen, "found candidate tag");
                    candidates.push(Candidate {
                        tag: tag.clone(),
                        marker,
                        depth: seen,
                    });
                }
            }

            count_unreached(&walk, &mut candidates, commit);

            if candidates.len() >= MAX_CANDIDATES {
                debug!("candidate limit reached, finishing depth computation");
                break;
            }
            seen += 1;
        }

        // Everything below a commit reached by every candidate adds no depth,
        // so the walk ends once nothing else is left to visit
        let markers: Vec<Marker> = candidates.iter().map(|c| c.marker).collect();
        while let Some(commit) = walk.next_commit()? {
            if !walk.has_all_markers(commit, &markers) {
                count_unreached(&walk, &mut candidates, commit);
            } else if walk.pending_have_all_markers(&markers) {
                break;
            }
        }

        // min_by_key keeps the first of equal depths, i.e. the first discovered
        match candidates.iter().min_by_key(|c| c.depth) {
            Some(best) => Ok(Some(format!(
                "{}-{}-g{}",
                best.tag,
                best.depth,
                self.graph.abbreviate(target)?
            ))),
            None => Ok(None),
        }
    }

    /// Release tags keyed by the commit they point to.
    ///
    /// When several release tags share a commit the highest version wins.
    fn release_tags(&self) -> Result<HashMap<G::Id, String>> {
        let mut by_commit: HashMap<G::Id, String> = HashMap::new();

        for tag in self.graph.tags()? {
            if !self.prefix.matches(&tag.short_name) {
                continue;
            }
            let replace = match by_commit.get(&tag.commit) {
                Some(existing) => self.rank(&tag.short_name) > self.rank(existing),
                None => true,
            };
            if replace {
                by_commit.insert(tag.commit, tag.short_name);
            }
        }

        Ok(by_commit)
    }

    fn rank<'a>(&self, tag: &'a str) -> (Option<Version>, &'a str) {
        (Version::parse(self.prefix.strip(tag)).ok(), tag)
    }
}

fn count_unreached<G: CommitGraph>(
    walk: &HistoryWalk<'_, G>,
    candidates: &mut [Candidate],
    commit: G::Id,
) {
    for candidate in candidates.iter_mut() {
        if !walk.reaches(commit, candidate.marker) {
            candidate.depth += 1;
        }
    }
}
