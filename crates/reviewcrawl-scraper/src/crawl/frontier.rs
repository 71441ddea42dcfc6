use std::collections::{HashSet, VecDeque};

use crate::request::CrawlRequest;

/// Pending requests in discovery order, each URL admitted at most once per run.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    queue: VecDeque<CrawlRequest>,
    seen: HashSet<String>,
}

impl Frontier {
    /// Queues `request` unless its URL was already queued this run.
    /// Returns `false` for a duplicate.
    pub(crate) fn push(&mut self, request: CrawlRequest) -> bool {
        if !self.seen.insert(request.url.clone()) {
            return false;
        }
        self.queue.push_back(request);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<CrawlRequest> {
        self.queue.pop_front()
    }
}
