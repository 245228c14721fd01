//! Per-job crawl state: pending, in-flight, crawled and failed URLs
//!
//! Every URL lives in at most one of the four sets and only ever moves
//! forward: `pending -> processing -> results | failed`. The owning
//! [`Job`](crate::state::Job) serializes all access behind one mutex, so
//! nothing here is synchronized on its own.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Outcome of asking the frontier for work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A URL was moved into processing; the caller must complete or fail it
    Url { url: String, depth: u32 },

    /// Nothing pending, but other workers may still discover more links
    Wait,

    /// Nothing pending and nothing in flight
    Drained,
}

/// Progress counters exposed by status queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrontierCounts {
    /// URLs successfully crawled
    pub completed: usize,

    /// URLs pending plus URLs being fetched
    pub in_progress: usize,

    /// URLs whose fetch failed
    pub failed: usize,
}

/// The frontier/processing/results state machine of one job
#[derive(Debug)]
pub struct Frontier {
    max_depth: u32,
    pending: HashMap<String, u32>,
    processing: HashMap<String, u32>,
    results: HashMap<String, Vec<String>>,
    failed: HashMap<String, String>,
}

impl Frontier {
    /// Creates a frontier holding `seeds` at depth 0
    ///
    /// Duplicate seeds collapse into one entry.
    pub fn new<I>(seeds: I, max_depth: u32) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            max_depth,
            pending: seeds.into_iter().map(|url| (url, 0)).collect(),
            processing: HashMap::new(),
            results: HashMap::new(),
            failed: HashMap::new(),
        }
    }

    /// Takes one arbitrary pending URL and marks it as being fetched
    pub fn claim_next(&mut self) -> Claim {
        let next = self.pending.keys().next().cloned();
        match next.and_then(|url| self.pending.remove_entry(&url)) {
            Some((url, depth)) => {
                self.processing.insert(url.clone(), depth);
                Claim::Url { url, depth }
            }
            None if self.processing.is_empty() => Claim::Drained,
            None => Claim::Wait,
        }
    }

    /// Moves a fetched URL from processing into results
    ///
    /// Returns false if `url` was not being processed, in which case nothing
    /// changes.
    pub fn complete_fetch(&mut self, url: &str, resources: Vec<String>) -> bool {
        match self.processing.remove_entry(url) {
            Some((url, _)) => {
                self.results.insert(url, resources);
                true
            }
            None => false,
        }
    }

    /// Moves a URL whose fetch failed from processing into the failed set
    pub fn record_failure(&mut self, url: &str, reason: impl Into<String>) -> bool {
        match self.processing.remove_entry(url) {
            Some((url, _)) => {
                self.failed.insert(url, reason.into());
                true
            }
            None => false,
        }
    }

    /// Enqueues links discovered on a page crawled at `depth`
    ///
    /// Links land at `depth + 1`, and only while that stays below
    /// `max_depth`. A link already known to the job in any state is skipped.
    /// Returns the number of newly enqueued URLs.
    pub fn expand<I>(&mut self, depth: u32, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let next_depth = depth + 1;
        if next_depth >= self.max_depth {
            return 0;
        }

        let mut added = 0;
        for link in links {
            if self.contains(&link) {
                continue;
            }
            self.pending.insert(link, next_depth);
            added += 1;
        }
        added
    }

    /// True if the URL is pending, in flight, crawled or failed
    pub fn contains(&self, url: &str) -> bool {
        self.pending.contains_key(url)
            || self.processing.contains_key(url)
            || self.results.contains_key(url)
            || self.failed.contains_key(url)
    }

    /// True iff nothing is pending and nothing is in flight
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.processing.is_empty()
    }

    pub fn counts(&self) -> FrontierCounts {
        FrontierCounts {
            completed: self.results.len(),
            in_progress: self.pending.len() + self.processing.len(),
            failed: self.failed.len(),
        }
    }

    /// Copies the crawled resources, ordered by URL
    pub fn results(&self) -> BTreeMap<String, Vec<String>> {
        self.results
            .iter()
            .map(|(url, resources)| (url.clone(), resources.clone()))
            .collect()
    }

    /// Copies the failed URLs and their reasons, ordered by URL
    pub fn failures(&self) -> BTreeMap<String, String> {
        self.failed
            .iter()
            .map(|(url, reason)| (url.clone(), reason.clone()))
            .collect()
    }

    /// Verifies that no URL is held by more than one set
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.pending
            .keys()
            .chain(self.processing.keys())
            .chain(self.results.keys())
            .chain(self.failed.keys())
            .all(|url| seen.insert(url.as_str()))
    }
}
