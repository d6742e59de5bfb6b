//! Conversions between the database row representations (hex text
//! addresses, NUMERIC amounts) and the domain types.

use {
    alloy::primitives::{Address, U256},
    anyhow::{Context, Result, anyhow, bail},
    bigdecimal::BigDecimal,
    model::{
        auction::{Auction, AuctionId, Nft},
        bid::{Bid, UserBid},
    },
    std::str::FromStr,
};

/// Canonical database representation: 0x-prefixed lowercase hex.
pub fn address_to_sql(address: Address) -> String {
    format!("{address:#x}")
}

pub fn address_from_sql(value: &str) -> Result<Address> {
    Address::from_str(value).with_context(|| format!("malformed address {value:?}"))
}

pub fn u256_to_big_decimal(value: U256) -> BigDecimal {
    BigDecimal::from_str(&value.to_string()).expect("integer string is a valid decimal")
}

pub fn big_decimal_to_u256(value: &BigDecimal) -> Result<U256> {
    if value < &BigDecimal::from(0) {
        bail!("negative amount {value}");
    }
    if !value.is_integer() {
        bail!("non-integral amount {value}");
    }
    U256::from_str(&value.with_scale(0).to_string())
        .map_err(|err| anyhow!("amount {value} out of range: {err}"))
}

pub fn auction_from_row(auction: database::auctions::Auction, nft: database::nfts::Nft) -> Result<Auction> {
    Ok(Auction {
        id: AuctionId(auction.id),
        nft: nft_from_row(nft)?,
        seller: address_from_sql(&auction.seller)?,
        min_bid: big_decimal_to_u256(&auction.min_bid).context("min_bid")?,
        highest_bid: auction
            .highest_bid
            .as_ref()
            .map(big_decimal_to_u256)
            .transpose()
            .context("highest_bid")?,
        highest_bidder: auction
            .highest_bidder
            .as_deref()
            .map(address_from_sql)
            .transpose()?,
        end_time: auction.end_time,
        settled: auction.settled,
    })
}

pub fn user_bid_from_row(row: database::bids::UserBid) -> Result<UserBid> {
    Ok(UserBid {
        bid: Bid {
            id: row.bid_id,
            auction_id: AuctionId(row.auction_id),
            bidder: address_from_sql(&row.bidder)?,
            amount: big_decimal_to_u256(&row.amount).context("bid amount")?,
            created_at: row.created_at,
        },
        auction: Auction {
            id: AuctionId(row.auction_id),
            nft: nft_from_row(database::nfts::Nft {
                id: row.nft_id,
                token_id: row.nft_token_id,
                uri: row.nft_uri,
            })?,
            seller: address_from_sql(&row.seller)?,
            min_bid: big_decimal_to_u256(&row.min_bid).context("min_bid")?,
            highest_bid: row
                .highest_bid
                .as_ref()
                .map(big_decimal_to_u256)
                .transpose()
                .context("highest_bid")?,
            highest_bidder: row
                .highest_bidder
                .as_deref()
                .map(address_from_sql)
                .transpose()?,
            end_time: row.end_time,
            settled: row.settled,
        },
    })
}

fn nft_from_row(nft: database::nfts::Nft) -> Result<Nft> {
    Ok(Nft {
        id: nft.id,
        token_id: big_decimal_to_u256(&nft.token_id).context("token_id")?,
        uri: nft.uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_address() {
        let address = Address::repeat_byte(0xab);
        let sql = address_to_sql(address);
        assert_eq!(sql, "0xabababababababababababababababababababab");
        assert_eq!(address_from_sql(&sql).unwrap(), address);
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(address_from_sql("not an address").is_err());
        assert!(address_from_sql("0x1234").is_err());
    }

    #[test]
    fn roundtrips_amount() {
        for amount in [U256::ZERO, U256::from(42), U256::MAX] {
            let decimal = u256_to_big_decimal(amount);
            assert_eq!(big_decimal_to_u256(&decimal).unwrap(), amount);
        }
    }

    #[test]
    fn rejects_unrepresentable_amounts() {
        assert!(big_decimal_to_u256(&BigDecimal::from(-1)).is_err());
        assert!(big_decimal_to_u256(&BigDecimal::from_str("1.5").unwrap()).is_err());
        let too_large = u256_to_big_decimal(U256::MAX) + BigDecimal::from(1);
        assert!(big_decimal_to_u256(&too_large).is_err());
    }
}
