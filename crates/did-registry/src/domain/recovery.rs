//! # Recovery Voting Rounds
//!
//! Per-identity quorum voting state. The engine tracks who voted for whom
//! in the current round and how many recoveries completed inside the
//! current reset window; the quorum threshold itself lives in
//! [`RegistryConfig`](super::config::RegistryConfig) and is applied by the
//! service layer.
//!
//! Round lifecycle: the window opens at the first vote. Votes accumulate
//! (one live vote per backup controller; re-voting a different candidate
//! overwrites). Election clears the votes and counts an attempt. Once the
//! reset window elapses the whole round — votes and attempts — expires.

use std::collections::HashMap;

use registry_types::{Address, UnixSeconds};

#[derive(Clone, Debug, Default)]
struct RecoveryRound {
    /// Live votes: backup controller -> candidate it voted for.
    votes: HashMap<Address, Address>,
    /// Completed recoveries inside the current window.
    attempts: u32,
    /// When the current window opened (first vote).
    window_start: UnixSeconds,
}

impl RecoveryRound {
    fn started(&self) -> bool {
        self.window_start > 0 || self.attempts > 0 || !self.votes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RecoveryEngine {
    rounds: HashMap<Address, RecoveryRound>,
}

impl RecoveryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire a stale round before reading it. Votes and the attempt count
    /// both die with the window.
    pub fn expire_stale_round(
        &mut self,
        identity: Address,
        now: UnixSeconds,
        reset_seconds: u64,
    ) {
        if let Some(round) = self.rounds.get_mut(&identity) {
            if round.started() && now >= round.window_start.saturating_add(reset_seconds) {
                *round = RecoveryRound::default();
            }
        }
    }

    /// When the identity has exhausted its attempts, the timestamp at which
    /// the window reopens.
    pub fn throttled_until(
        &self,
        identity: &Address,
        max_attempts: u32,
        reset_seconds: u64,
    ) -> Option<UnixSeconds> {
        let round = self.rounds.get(identity)?;
        if round.attempts >= max_attempts {
            Some(round.window_start.saturating_add(reset_seconds))
        } else {
            None
        }
    }

    /// Record a vote. Returns whether the vote map changed and the tally of
    /// live votes for `candidate` after the cast.
    pub fn cast(
        &mut self,
        identity: Address,
        voter: Address,
        candidate: Address,
        now: UnixSeconds,
    ) -> (bool, u32) {
        let round = self.rounds.entry(identity).or_default();
        if !round.started() {
            round.window_start = now;
        }
        let previous = round.votes.insert(voter, candidate);
        let vote_added = previous != Some(candidate);
        let tally = round.votes.values().filter(|c| **c == candidate).count() as u32;
        (vote_added, tally)
    }

    /// Close the round after an election: clear the votes, count the
    /// attempt. The window keeps running so repeated recoveries throttle.
    pub fn complete(&mut self, identity: Address) {
        let round = self.rounds.entry(identity).or_default();
        round.votes.clear();
        round.attempts += 1;
    }
}
