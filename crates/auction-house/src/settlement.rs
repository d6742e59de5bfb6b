//! Bookkeeping for in-flight settle and withdraw transactions.
//!
//! The UI that triggers these actions may re-render or unmount at any
//! point, so the exclusion that keeps a user from double-submitting
//! lives here, not in presentation state.

use {
    alloy::primitives::Address,
    model::auction::AuctionId,
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    },
};

/// One exclusive slot per key: settles are keyed by auction, withdraws
/// by wallet, so the two kinds of action never block each other.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKey {
    Settle(AuctionId),
    Withdraw(Address),
}

/// Where an in-flight action currently is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionState {
    /// The transaction is being constructed and sent.
    Submitting,
    /// The transaction was accepted and awaits block confirmation.
    Confirming,
}

/// Registry of all in-flight actions of one service instance.
#[derive(Clone, Debug, Default)]
pub struct ActionTracker {
    actions: Arc<Mutex<HashMap<ActionKey, ActionState>>>,
}

impl ActionTracker {
    /// Claims the slot for `key`. Returns the state of the already
    /// running action if the slot is taken.
    pub fn begin(&self, key: ActionKey) -> Result<ActionGuard, ActionState> {
        let mut actions = self.actions.lock().unwrap();
        if let Some(state) = actions.get(&key) {
            return Err(*state);
        }
        actions.insert(key, ActionState::Submitting);
        tracing::debug!(?key, "action started");
        Ok(ActionGuard {
            key,
            tracker: self.clone(),
        })
    }

    pub fn state(&self, key: &ActionKey) -> Option<ActionState> {
        self.actions.lock().unwrap().get(key).copied()
    }
}

/// Releases the claimed slot on drop, whether the action completed,
/// failed, or its future was cancelled mid-flight.
#[derive(Debug)]
pub struct ActionGuard {
    key: ActionKey,
    tracker: ActionTracker,
}

impl ActionGuard {
    /// Records that the submitted transaction now awaits confirmation.
    pub fn confirming(&self) {
        let mut actions = self.tracker.actions.lock().unwrap();
        if let Some(state) = actions.get_mut(&self.key) {
            *state = ActionState::Confirming;
        }
        tracing::debug!(key = ?self.key, "awaiting confirmation");
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.tracker.actions.lock().unwrap().remove(&self.key);
        tracing::debug!(key = ?self.key, "action finished");
    }
}
