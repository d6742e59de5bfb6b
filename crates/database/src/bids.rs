use {
    bigdecimal::BigDecimal,
    chrono::{DateTime, Utc},
    sqlx::PgConnection,
};

#[derive(Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder: String,
    pub amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// A bid joined with its auction and the auctioned NFT, as needed for
/// the per-user history view.
#[derive(Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct UserBid {
    pub bid_id: i64,
    pub auction_id: i64,
    pub bidder: String,
    pub amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub seller: String,
    pub min_bid: BigDecimal,
    pub highest_bid: Option<BigDecimal>,
    pub highest_bidder: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub settled: bool,
    pub nft_id: i64,
    pub nft_token_id: BigDecimal,
    pub nft_uri: String,
}

pub async fn insert(ex: &mut PgConnection, bid: &Bid) -> Result<(), sqlx::Error> {
    const QUERY: &str = "\
        INSERT INTO bids (id, auction_id, bidder, amount, created_at) \
        VALUES ($1, $2, $3, $4, $5);";
    sqlx::query(QUERY)
        .bind(bid.id)
        .bind(bid.auction_id)
        .bind(&bid.bidder)
        .bind(&bid.amount)
        .bind(bid.created_at)
        .execute(ex)
        .await?;
    Ok(())
}

/// All bids on one auction, oldest first.
pub async fn auction_bids(ex: &mut PgConnection, auction_id: i64) -> Result<Vec<Bid>, sqlx::Error> {
    const QUERY: &str = r#"
        SELECT * FROM bids
        WHERE auction_id = $1
        ORDER BY created_at, id
    "#;
    sqlx::query_as(QUERY).bind(auction_id).fetch_all(ex).await
}

/// All bids of one bidder with their auctions, oldest bid first. The
/// ordering makes the derived history deterministic.
pub async fn user_bids(ex: &mut PgConnection, bidder: &str) -> Result<Vec<UserBid>, sqlx::Error> {
    const QUERY: &str = r#"
        SELECT
            b.id AS bid_id,
            b.auction_id,
            b.bidder,
            b.amount,
            b.created_at,
            a.seller,
            a.min_bid,
            a.highest_bid,
            a.highest_bidder,
            a.end_time,
            a.settled,
            n.id AS nft_id,
            n.token_id AS nft_token_id,
            n.uri AS nft_uri
        FROM bids b
        JOIN auctions a ON a.id = b.auction_id
        JOIN nfts n ON n.id = a.nft_id
        WHERE b.bidder = $1
        ORDER BY b.created_at, b.id
    "#;
    sqlx::query_as(QUERY).bind(bidder).fetch_all(ex).await
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{auctions, nfts},
        sqlx::Connection,
    };

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn date(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    async fn insert_auction(db: &mut PgConnection, id: i64) {
        nfts::insert(
            db,
            &nfts::Nft {
                id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        auctions::insert(
            db,
            &auctions::Auction {
                id,
                nft_id: id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_user_bids_joins_and_orders() {
        let mut db = PgConnection::connect("postgresql://").await.unwrap();
        let mut db = db.begin().await.unwrap();
        crate::clear_DANGER_(&mut db).await.unwrap();

        insert_auction(&mut db, 1).await;
        insert_auction(&mut db, 2).await;
        let bids = [
            Bid {
                id: 1,
                auction_id: 1,
                bidder: ALICE.to_string(),
                amount: BigDecimal::from(12),
                created_at: date(10),
            },
            Bid {
                id: 2,
                auction_id: 1,
                bidder: BOB.to_string(),
                amount: BigDecimal::from(13),
                created_at: date(20),
            },
            Bid {
                id: 3,
                auction_id: 2,
                bidder: ALICE.to_string(),
                amount: BigDecimal::from(5),
                created_at: date(30),
            },
        ];
        for bid in &bids {
            insert(&mut db, bid).await.unwrap();
        }

        let rows = user_bids(&mut db, ALICE).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bid_id, 1);
        assert_eq!(rows[0].nft_id, 1);
        assert_eq!(rows[1].bid_id, 3);
        assert_eq!(rows[1].auction_id, 2);

        let on_auction = auction_bids(&mut db, 1).await.unwrap();
        assert_eq!(on_auction, bids[..2]);
    }
}
