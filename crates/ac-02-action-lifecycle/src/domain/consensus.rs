//! # Consensus Matcher
//!
//! Majority vote over the fingerprint digests submitted by supernodes.
//!
//! Count each distinct digest. If the largest group has size 1, or several
//! groups tie at the largest size, there is no majority and every submitter
//! is bad. Otherwise the unique largest group is the majority and everyone
//! outside it is bad.

use std::collections::BTreeMap;

/// Verdict of one comparison round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsensusOutcome {
    /// Every submitter reported the same digest.
    Agreed { digest: String },
    /// A majority exists; `bad` lists the dissenters.
    Minority { majority: String, bad: Vec<String> },
    /// No unique majority; all submitters are bad.
    NoMajority { bad: Vec<String> },
}

/// Compare `submitter -> digest` entries.
///
/// Output lists are ordered by submitter address.
pub fn compare_fingerprints(entries: &BTreeMap<String, String>) -> ConsensusOutcome {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for digest in entries.values() {
        *counts.entry(digest.as_str()).or_default() += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    let leaders: Vec<&str> = counts
        .iter()
        .filter(|(_, &count)| count == max)
        .map(|(digest, _)| *digest)
        .collect();

    if max <= 1 || leaders.len() != 1 {
        return ConsensusOutcome::NoMajority {
            bad: entries.keys().cloned().collect(),
        };
    }

    let majority = leaders[0].to_string();
    let bad: Vec<String> = entries
        .iter()
        .filter(|(_, digest)| **digest != majority)
        .map(|(submitter, _)| submitter.clone())
        .collect();

    if bad.is_empty() {
        ConsensusOutcome::Agreed { digest: majority }
    } else {
        ConsensusOutcome::Minority { majority, bad }
    }
}
