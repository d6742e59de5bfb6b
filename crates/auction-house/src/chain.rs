//! Seam to the auction contract. The chain is the authoritative source
//! for monetary truth (pending returns, the final highest bid); these
//! traits are all the services may ask of it.

use {
    alloy::primitives::{Address, B256, U256},
    model::auction::AuctionId,
    thiserror::Error,
};

/// Hash identifying a submitted transaction.
pub type TxId = B256;

/// Proof that a transaction was included in a block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Receipt {
    pub tx: TxId,
    pub block_number: u64,
}

#[derive(Debug, Error)]
pub enum ChainError {
    /// The wallet or node refused the transaction at submission time.
    /// Nothing reached the chain.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// The transaction was accepted but did not confirm: it reverted or
    /// the confirmation wait ran out.
    #[error("confirmation failed: {0}")]
    ConfirmationFailed(String),
    /// The node could not be reached for a read. Callers degrade to a
    /// default value where they can.
    #[error("chain unavailable: {0}")]
    Unavailable(anyhow::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PendingReturnsReading: Send + Sync {
    /// Funds the contract holds for `owner` from auctions they were
    /// outbid in, claimable through a withdrawal.
    async fn pending_returns(&self, owner: Address) -> Result<U256, ChainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettlementSubmitting: Send + Sync {
    /// Sends the settlement transaction transferring `token_id` to
    /// `winner` and closing the auction.
    async fn submit_settle(
        &self,
        auction: AuctionId,
        token_id: U256,
        winner: Address,
    ) -> Result<TxId, ChainError>;

    /// Sends the transaction claiming `owner`'s pending returns.
    async fn submit_withdraw(&self, owner: Address) -> Result<TxId, ChainError>;

    /// Waits until `tx` is included in a block.
    async fn await_confirmation(&self, tx: TxId) -> Result<Receipt, ChainError>;
}
