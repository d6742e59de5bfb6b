//! Module defining auctions and their derived lifecycle status.

use {
    alloy::primitives::{Address, U256},
    chrono::{DateTime, Duration, Utc},
    serde::{Deserialize, Serialize},
};

/// Database identifier of an auction.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct AuctionId(pub i64);

impl std::fmt::Display for AuctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The NFT an auction sells. Carried through for display.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub id: i64,
    /// Token id of the minted NFT in the auction contract.
    pub token_id: U256,
    pub uri: String,
}

/// A time-bounded sale of one NFT accepting successive higher bids.
///
/// `settled` is monotonic: it is flipped to true exactly once, after the
/// auction has ended, and never reset.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: AuctionId,
    pub nft: Nft,
    pub seller: Address,
    /// Reserve price. Bidding starts here when no bid has been placed.
    pub min_bid: U256,
    pub highest_bid: Option<U256>,
    pub highest_bidder: Option<Address>,
    /// When bidding closes. Listings written before this column became
    /// mandatory can miss it; those count as already ended.
    pub end_time: Option<DateTime<Utc>>,
    pub settled: bool,
}

/// Canonical lifecycle status of an auction at a given instant.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuctionStatus {
    Active,
    Ended,
    Settled,
}

impl Auction {
    /// Derives the status at `now`. Settlement takes precedence over the
    /// time comparison, so an auction settled before its nominal end
    /// time still reports `Settled`.
    pub fn status(&self, now: DateTime<Utc>) -> AuctionStatus {
        if self.settled {
            AuctionStatus::Settled
        } else if self.is_ended(now) {
            AuctionStatus::Ended
        } else {
            AuctionStatus::Active
        }
    }

    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        match self.end_time {
            Some(end_time) => now >= end_time,
            None => true,
        }
    }

    /// Time until bidding closes, clamped at zero.
    pub fn time_left(&self, now: DateTime<Utc>) -> Duration {
        self.end_time
            .map(|end_time| (end_time - now).max(Duration::zero()))
            .unwrap_or_else(Duration::zero)
    }

    /// Whether `user` holds the winning bid of a settled auction.
    ///
    /// Derived from the stored highest bidder alone, without
    /// reconciling against the bid ledger. Should the two ever diverge
    /// the contract's highest bidder is the authoritative record.
    pub fn won_by(&self, user: Address) -> bool {
        self.settled && self.highest_bidder == Some(user)
    }

    /// Whether `user` can trigger settlement at `now`: the auction has
    /// ended, is not yet settled, and `user` holds the highest bid.
    pub fn settleable_by(&self, user: Address, now: DateTime<Utc>) -> bool {
        !self.settled && self.is_ended(now) && self.highest_bidder == Some(user)
    }

    /// Display price: the highest bid when one exists, the reserve
    /// price otherwise.
    pub fn current_price(&self) -> U256 {
        self.highest_bid.unwrap_or(self.min_bid)
    }
}
