//! Choice of at most three legacy entries per archive.
//!
//! Small entries make short hash lines and fast checks, but a classified
//! entry lets the cracker reject candidates by magic bytes before doing any
//! inflating, so one is kept even when it is large.
//!
//! Admission is a pure decision over the residents' `(size, magic)` keys,
//! applied to a set that is always sorted by compressed size (ties in
//! arrival order). Slot 0 is therefore the smallest entry and becomes the
//! primary record of the hash line.

use super::legacy::LegacyCandidate;

/// Maximum number of entries carried by one hash line.
pub const MAX_CANDIDATES: usize = 3;

/// What to do with an arriving candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// There is a free slot
    Append,
    /// Evict the resident at this slot index
    Replace(usize),
    /// Drop the arriving candidate
    Reject,
}

/// Ranking key of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub size: u32,
    pub magic: bool,
}

impl From<&LegacyCandidate> for Key {
    fn from(c: &LegacyCandidate) -> Self {
        Key {
            size: c.compressed_len,
            magic: c.magic.is_classified(),
        }
    }
}

/// Decide how `incoming` enters a set whose keys are sorted by size.
///
/// Once full:
/// - a classified arrival at least as large as the smallest resident takes
///   the place of an unclassified resident in slot 2 or 3, the largest first,
///   whatever its own size;
/// - otherwise it evicts the largest resident strictly larger than itself,
///   where classified residents only yield to classified arrivals.
pub fn decide(residents: &[Key], incoming: Key) -> Decision {
    if residents.len() < MAX_CANDIDATES {
        return Decision::Append;
    }

    if incoming.magic
        && incoming.size >= residents[0].size
        && let Some(i) = (1..residents.len()).rev().find(|&i| !residents[i].magic)
    {
        return Decision::Replace(i);
    }

    residents
        .iter()
        .enumerate()
        .rev()
        .find(|(_, r)| r.size > incoming.size && (!r.magic || incoming.magic))
        .map_or(Decision::Reject, |(i, _)| Decision::Replace(i))
}

/// Ranked legacy candidates of one archive.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    slots: Vec<(usize, LegacyCandidate)>,
    arrivals: usize,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate, returning the updated set.
    pub fn admit(mut self, candidate: LegacyCandidate) -> Self {
        let keys: Vec<Key> = self.slots.iter().map(|(_, c)| Key::from(c)).collect();
        let arrival = self.arrivals;
        self.arrivals += 1;

        match decide(&keys, Key::from(&candidate)) {
            Decision::Append => self.slots.push((arrival, candidate)),
            Decision::Replace(i) => self.slots[i] = (arrival, candidate),
            Decision::Reject => return self,
        }

        self.slots.sort_by_key(|(arrival, c)| (c.compressed_len, *arrival));
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Candidates in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = &LegacyCandidate> {
        self.slots.iter().map(|(_, c)| c)
    }

    /// The smallest candidate.
    pub fn primary(&self) -> Option<&LegacyCandidate> {
        self.slots.first().map(|(_, c)| c)
    }
}
