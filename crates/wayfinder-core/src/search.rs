//! Destination search session.
//!
//! [`SearchSession`] turns keystrokes into filter requests and filter
//! responses into the visible result list. Every request carries a
//! sequence id; only the response to the latest id may touch the list.
//! Superseded requests are not aborted, their responses are dropped when
//! they arrive, so the list is last-writer-wins by sequence rather than by
//! arrival order.

use crate::error::WayfindError;
use crate::models::{DestinationEntry, SearchQuery};

/// What the caller should do after the query text changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDecision {
    /// Nothing to do.
    Ignore,
    /// The text was cleared: the list is now empty and should be hidden.
    Clear,
    /// Send a filter request for this query.
    Issue(SearchQuery),
}

/// Result of applying a filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The response belonged to a superseded query and was dropped.
    Stale,
    /// The result list was replaced. `visible` is false when it is empty.
    Updated { visible: bool },
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    latest: u64,
    results: Vec<DestinationEntry>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[DestinationEntry] {
        &self.results
    }

    pub fn names(&self) -> Vec<String> {
        self.results.iter().map(|e| e.name.clone()).collect()
    }

    /// Sequence id of the most recently issued (or cleared) query.
    pub fn latest_sequence(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, sequence_id: u64) -> bool {
        sequence_id == self.latest
    }

    pub fn on_query_changed(&mut self, text: &str) -> QueryDecision {
        if text.is_empty() {
            self.clear();
            return QueryDecision::Clear;
        }
        self.latest += 1;
        QueryDecision::Issue(SearchQuery {
            raw_text: text.to_string(),
            sequence_id: self.latest,
        })
    }

    /// Like [`on_query_changed`](Self::on_query_changed), but submitting
    /// empty text leaves everything as it is.
    pub fn on_submit(&mut self, text: &str) -> QueryDecision {
        if text.is_empty() {
            return QueryDecision::Ignore;
        }
        self.on_query_changed(text)
    }

    pub fn on_filter_response(
        &mut self,
        sequence_id: u64,
        raw_lines: Vec<String>,
    ) -> FilterOutcome {
        if !self.is_current(sequence_id) {
            return FilterOutcome::Stale;
        }
        self.results = raw_lines
            .iter()
            .flat_map(|chunk| chunk.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| DestinationEntry {
                name: name.to_string(),
            })
            .collect();
        FilterOutcome::Updated {
            visible: !self.results.is_empty(),
        }
    }

    /// A filter request failed. The list keeps its last good contents.
    ///
    /// Returns the error to surface, or `None` when the failed request had
    /// already been superseded.
    pub fn on_filter_failure(
        &mut self,
        sequence_id: u64,
        detail: impl Into<String>,
    ) -> Option<WayfindError> {
        if !self.is_current(sequence_id) {
            return None;
        }
        Some(WayfindError::DirectoryUnavailable(detail.into()))
    }

    pub fn on_select(&self, index: usize) -> Result<DestinationEntry, WayfindError> {
        self.results
            .get(index)
            .cloned()
            .ok_or(WayfindError::InvalidSelection {
                index,
                len: self.results.len(),
            })
    }

    /// Drops the list and supersedes any in-flight request.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.results.clear();
    }
}
