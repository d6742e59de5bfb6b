//! Bids and the row shape the store hands to the history derivation.

use {
    crate::auction::{Auction, AuctionId},
    alloy::primitives::{Address, U256},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// One bid by one user on one auction. The bid ledger is append only:
/// rows are never mutated or deleted once written.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub auction_id: AuctionId,
    pub bidder: Address,
    pub amount: U256,
    pub created_at: DateTime<Utc>,
}

/// A bid of the queried user together with the auction it was placed
/// in, as returned by the store's per-user bid query.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBid {
    pub bid: Bid,
    pub auction: Auction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_user_bid() {
        let row = UserBid {
            bid: Bid {
                id: 4,
                auction_id: AuctionId(1),
                bidder: Address::repeat_byte(0x33),
                amount: U256::from(7),
                created_at: DateTime::from_timestamp(60, 0).unwrap(),
            },
            auction: Auction {
                id: AuctionId(1),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::from_value::<UserBid>(serde_json::to_value(&row).unwrap()).unwrap(),
            row,
        );
    }
}
