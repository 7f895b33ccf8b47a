//! # Matching Module
//!
//! The role-scoped matching rule between startups and investors, and the
//! live feed that keeps a dashboard's match list current.
//!
//! ## Matching Rule
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MATCHING RULE                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  own = Startup  { domain }                                              │
//! │  candidate = Investor { interestedDomains }                             │
//! │      match ⇔ own.domain ∈ candidate.interestedDomains                   │
//! │                                                                         │
//! │  own = Investor { interestedDomains }                                   │
//! │  candidate = Startup  { domain }                                        │
//! │      match ⇔ candidate.domain ∈ own.interestedDomains                   │
//! │                                                                         │
//! │  Exact, case-sensitive domain comparison. Results keep the insertion    │
//! │  order the store's live listener delivered. Empty results are valid     │
//! │  and render a "no matches yet" affordance, not an error.                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`MatchFeed`] holds the only standing subscription in the core. Dropping
//! the feed (or the stream made from it) releases the underlying collection
//! subscription, so a dashboard view tearing down leaks no callbacks.

use async_stream::stream;
use futures::Stream;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::profile::ProfileRecord;
use crate::store::{CollectionSnapshot, ProfileStore};

/// One matching opposite-role profile
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    /// The candidate's store key (their identity id)
    pub id: String,
    /// The candidate's profile
    pub profile: ProfileRecord,
}

/// Filter candidate profiles down to those matching `own`
///
/// Candidates whose role is not the counterpart of `own` never match;
/// insertion order is preserved.
pub fn select_matches<'a>(
    own: &ProfileRecord,
    candidates: &'a [ProfileRecord],
) -> Vec<&'a ProfileRecord> {
    candidates
        .iter()
        .filter(|candidate| matches(own, candidate))
        .collect()
}

fn matches(own: &ProfileRecord, candidate: &ProfileRecord) -> bool {
    match (own, candidate) {
        (ProfileRecord::Startup { domain, .. }, ProfileRecord::Investor { .. }) => candidate
            .interested_domains()
            .is_some_and(|domains| domains.contains(domain)),
        (ProfileRecord::Investor { .. }, ProfileRecord::Startup { domain, .. }) => own
            .interested_domains()
            .is_some_and(|domains| domains.contains(domain)),
        _ => false,
    }
}

/// Live match list over the opposite-role collection
#[derive(Debug)]
pub struct MatchFeed {
    own: ProfileRecord,
    snapshot_rx: watch::Receiver<CollectionSnapshot>,
}

impl MatchFeed {
    /// Open a feed for the given profile
    ///
    /// Subscribes to the counterpart role's collection. Students have no
    /// counterpart and cannot open a feed.
    pub fn open(store: &dyn ProfileStore, own: ProfileRecord) -> Result<Self> {
        let counterpart = own.role().counterpart().ok_or_else(|| {
            Error::ProfileValidation("students do not participate in matching".into())
        })?;
        let snapshot_rx = store.subscribe(counterpart.collection());
        Ok(Self { own, snapshot_rx })
    }

    /// The current match list
    pub fn current(&self) -> Vec<MatchCandidate> {
        Self::filter(&self.own, &self.snapshot_rx.borrow())
    }

    /// Consume the feed into a stream of match lists
    ///
    /// Yields the current list immediately, then a recomputed list on every
    /// upstream change. Dropping the stream releases the subscription.
    pub fn into_stream(mut self) -> impl Stream<Item = Vec<MatchCandidate>> {
        stream! {
            loop {
                let list = Self::filter(&self.own, &self.snapshot_rx.borrow_and_update());
                yield list;
                if self.snapshot_rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    fn filter(own: &ProfileRecord, snapshot: &CollectionSnapshot) -> Vec<MatchCandidate> {
        snapshot
            .records
            .iter()
            .filter_map(|(id, value)| {
                match serde_json::from_value::<ProfileRecord>(value.clone()) {
                    Ok(profile) => Some(MatchCandidate {
                        id: id.clone(),
                        profile,
                    }),
                    Err(e) => {
                        // A record that doesn't decode is skipped, not fatal.
                        tracing::warn!("Skipping undecodable record {}: {}", id, e);
                        None
                    }
                }
            })
            .filter(|candidate| matches(own, &candidate.profile))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
