//! The per-user auction history view derived from the bid ledger.

use {
    alloy::primitives::{Address, U256},
    chrono::{DateTime, Utc},
    indexmap::IndexMap,
    model::{
        auction::{Auction, AuctionId, AuctionStatus},
        bid::{Bid, UserBid},
    },
    serde::{Deserialize, Serialize},
};

/// A user's view of one auction they have bid in. Computed fresh on
/// every read and never persisted, so it cannot drift from the
/// underlying auction and bid rows.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionHistory {
    pub auction: Auction,
    /// The user's own bids on this auction, in placement order.
    pub bids: Vec<Bid>,
    /// The user's best bid, not the auction's overall highest bid.
    pub user_highest_bid: U256,
    pub status: AuctionStatus,
    pub is_ended: bool,
    pub won: bool,
    pub can_settle: bool,
    pub time_left: std::time::Duration,
}

/// Groups `rows` by auction, in order of first encounter, and derives
/// the user's view of each auction at `now`. Auctions the user has not
/// bid in produce no record. Total: malformed groups are skipped, never
/// a panic.
pub fn build(rows: Vec<UserBid>, user: Address, now: DateTime<Utc>) -> Vec<AuctionHistory> {
    let mut groups: IndexMap<AuctionId, (Auction, Vec<Bid>)> = IndexMap::new();
    for UserBid { bid, auction } in rows {
        groups
            .entry(bid.auction_id)
            .or_insert_with(|| (auction, Vec::new()))
            .1
            .push(bid);
    }
    groups
        .into_values()
        .filter_map(|(auction, bids)| {
            // Grouping is bid driven so a group is never empty, but the
            // derivation must not rely on that.
            let user_highest_bid = bids.iter().map(|bid| bid.amount).max()?;
            Some(AuctionHistory {
                status: auction.status(now),
                is_ended: auction.is_ended(now),
                won: auction.won_by(user),
                can_settle: auction.settleable_by(user, now),
                time_left: auction.time_left(now).to_std().unwrap_or_default(),
                user_highest_bid,
                bids,
                auction,
            })
        })
        .collect()
}
