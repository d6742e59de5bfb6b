//! Postgres-backed implementation of the store seam.

mod conversions;

use {
    crate::auction_house::{AuctionStoring, SettleOutcome},
    alloy::primitives::Address,
    anyhow::{Context, Result, bail},
    async_trait::async_trait,
    model::{
        auction::{Auction, AuctionId},
        bid::UserBid,
    },
    sqlx::PgPool,
};

pub struct Postgres(pub PgPool);

#[async_trait]
impl AuctionStoring for Postgres {
    async fn user_bids(&self, bidder: Address) -> Result<Vec<UserBid>> {
        let mut ex = self.0.acquire().await.context("acquire")?;
        let rows = database::bids::user_bids(&mut ex, &conversions::address_to_sql(bidder))
            .await
            .context("user_bids")?;
        rows.into_iter()
            .map(conversions::user_bid_from_row)
            .collect()
    }

    async fn auction(&self, id: AuctionId) -> Result<Option<Auction>> {
        let mut ex = self.0.acquire().await.context("acquire")?;
        let Some(auction) = database::auctions::fetch(&mut ex, id.0)
            .await
            .context("fetch auction")?
        else {
            return Ok(None);
        };
        let Some(nft) = database::nfts::fetch(&mut ex, auction.nft_id)
            .await
            .context("fetch nft")?
        else {
            bail!("auction {id} references missing nft {}", auction.nft_id);
        };
        conversions::auction_from_row(auction, nft).map(Some)
    }

    async fn mark_settled(&self, id: AuctionId) -> Result<SettleOutcome> {
        let mut ex = self.0.acquire().await.context("acquire")?;
        let outcome = database::auctions::mark_settled(&mut ex, id.0)
            .await
            .context("mark_settled")?;
        Ok(match outcome {
            database::auctions::SettleOutcome::Updated => SettleOutcome::Updated,
            database::auctions::SettleOutcome::AlreadySettled => SettleOutcome::AlreadySettled,
            database::auctions::SettleOutcome::NotFound => SettleOutcome::NotFound,
        })
    }
}
