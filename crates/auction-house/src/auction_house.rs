use {
    crate::{
        chain::{ChainError, PendingReturnsReading, Receipt, SettlementSubmitting, TxId},
        history::{self, AuctionHistory},
        settlement::{ActionKey, ActionTracker},
    },
    alloy::primitives::{Address, U256},
    anyhow::{Context, Result, anyhow},
    chrono::Utc,
    model::{
        auction::{Auction, AuctionId},
        bid::UserBid,
    },
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
    thiserror::Error,
};

/// Off-chain persistence the services rely on.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuctionStoring: Send + Sync {
    /// All bids of `bidder`, each with its parent auction, oldest bid
    /// first.
    async fn user_bids(&self, bidder: Address) -> Result<Vec<UserBid>>;
    async fn auction(&self, id: AuctionId) -> Result<Option<Auction>>;
    async fn mark_settled(&self, id: AuctionId) -> Result<SettleOutcome>;
}

/// Result of flipping an auction's settled flag in the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettleOutcome {
    Updated,
    /// The flag was already set. The flag is monotonic, so this is safe
    /// to treat as success.
    AlreadySettled,
    NotFound,
}

#[derive(Debug, Error)]
pub enum SettleError {
    #[error("auction not found")]
    AuctionNotFound,
    #[error("auction cannot be settled by this user right now")]
    NotSettleable,
    #[error("a settlement for this auction is already in progress")]
    AlreadyInProgress,
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("confirmation failed: {0}")]
    ConfirmationFailed(String),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum WithdrawError {
    #[error("a withdrawal for this wallet is already in progress")]
    AlreadyInProgress,
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("confirmation failed: {0}")]
    ConfirmationFailed(String),
}

/// A user's dashboard: their auction history plus the funds the
/// contract still holds for them from auctions they were outbid in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub history: Vec<AuctionHistory>,
    /// Sourced from the chain, not from the bid ledger. Outbid funds
    /// are an on-chain liability, not a stored field.
    pub pending_returns: U256,
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// How long to wait for a submitted transaction to confirm before
    /// reporting the action as failed.
    pub max_confirmation_time: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_confirmation_time: Duration::from_secs(120),
        }
    }
}

pub struct AuctionHouse {
    database: Arc<dyn AuctionStoring>,
    pending_returns: Arc<dyn PendingReturnsReading>,
    submitter: Arc<dyn SettlementSubmitting>,
    actions: ActionTracker,
    config: Config,
}

impl AuctionHouse {
    pub fn new(
        database: Arc<dyn AuctionStoring>,
        pending_returns: Arc<dyn PendingReturnsReading>,
        submitter: Arc<dyn SettlementSubmitting>,
        config: Config,
    ) -> Self {
        Self {
            database,
            pending_returns,
            submitter,
            actions: ActionTracker::default(),
            config,
        }
    }

    /// The auctions `user` has bid in, with the user's derived view of
    /// each. Recomputed from the store on every call.
    pub async fn user_history(&self, user: Address) -> Result<Vec<AuctionHistory>> {
        let rows = self.database.user_bids(user).await.context("user_bids")?;
        Ok(history::build(rows, user, Utc::now()))
    }

    /// History plus the chain-reported pending returns. A node outage
    /// degrades the pending amount to zero instead of failing the whole
    /// dashboard.
    pub async fn dashboard(&self, user: Address) -> Result<Dashboard> {
        let history = self.user_history(user).await?;
        let pending_returns = match self.pending_returns.pending_returns(user).await {
            Ok(amount) => amount,
            Err(err) => {
                tracing::warn!(?user, ?err, "failed to read pending returns");
                U256::ZERO
            }
        };
        Ok(Dashboard {
            history,
            pending_returns,
        })
    }

    /// Settles `auction_id`: submits the settlement transaction, waits
    /// for its confirmation and records the settlement in the store.
    /// Completion of the returned future is the consistency point;
    /// a derived view read after awaiting it reflects the settlement.
    pub async fn settle(&self, auction_id: AuctionId, user: Address) -> Result<Receipt, SettleError> {
        let auction = self
            .database
            .auction(auction_id)
            .await
            .context("fetch auction")?
            .ok_or(SettleError::AuctionNotFound)?;
        if !auction.settleable_by(user, Utc::now()) {
            return Err(SettleError::NotSettleable);
        }

        let guard = self
            .actions
            .begin(ActionKey::Settle(auction_id))
            .map_err(|_| SettleError::AlreadyInProgress)?;
        tracing::debug!(%auction_id, ?user, "submitting settlement");
        let tx = self
            .submitter
            .submit_settle(auction_id, auction.nft.token_id, user)
            .await
            .map_err(|err| match err {
                ChainError::Rejected(reason) => SettleError::Rejected(reason),
                err => SettleError::Rejected(err.to_string()),
            })?;
        guard.confirming();
        let receipt = self
            .confirm_within_deadline(tx)
            .await
            .map_err(SettleError::ConfirmationFailed)?;

        match self
            .database
            .mark_settled(auction_id)
            .await
            .context("mark settled")?
        {
            SettleOutcome::Updated => (),
            SettleOutcome::AlreadySettled => {
                // Duplicate confirmation handling; the earlier write
                // already recorded this settlement.
                tracing::debug!(%auction_id, "settlement was already recorded");
            }
            SettleOutcome::NotFound => {
                return Err(anyhow!("auction {auction_id} vanished while settling").into());
            }
        }
        tracing::info!(%auction_id, tx = ?receipt.tx, "auction settled");
        Ok(receipt)
    }

    /// Claims `user`'s pending returns. Nothing is persisted off-chain;
    /// the next dashboard read observes the zeroed amount from the
    /// contract.
    pub async fn withdraw(&self, user: Address) -> Result<Receipt, WithdrawError> {
        let guard = self
            .actions
            .begin(ActionKey::Withdraw(user))
            .map_err(|_| WithdrawError::AlreadyInProgress)?;
        tracing::debug!(?user, "submitting withdrawal");
        let tx = self
            .submitter
            .submit_withdraw(user)
            .await
            .map_err(|err| match err {
                ChainError::Rejected(reason) => WithdrawError::Rejected(reason),
                err => WithdrawError::Rejected(err.to_string()),
            })?;
        guard.confirming();
        let receipt = self
            .confirm_within_deadline(tx)
            .await
            .map_err(WithdrawError::ConfirmationFailed)?;
        tracing::info!(?user, tx = ?receipt.tx, "withdrawal confirmed");
        Ok(receipt)
    }

    async fn confirm_within_deadline(&self, tx: TxId) -> Result<Receipt, String> {
        let confirmation = self.submitter.await_confirmation(tx);
        match tokio::time::timeout(self.config.max_confirmation_time, confirmation).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "no confirmation within {:?}",
                self.config.max_confirmation_time
            )),
        }
    }
}
