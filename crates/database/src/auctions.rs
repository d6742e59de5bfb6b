use {
    bigdecimal::BigDecimal,
    chrono::{DateTime, Utc},
    sqlx::PgConnection,
};

#[derive(Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub nft_id: i64,
    pub seller: String,
    pub min_bid: BigDecimal,
    pub highest_bid: Option<BigDecimal>,
    pub highest_bidder: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub settled: bool,
}

pub async fn insert(ex: &mut PgConnection, auction: &Auction) -> Result<(), sqlx::Error> {
    const QUERY: &str = "\
        INSERT INTO auctions (id, nft_id, seller, min_bid, highest_bid, highest_bidder, \
        end_time, settled) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8);";
    sqlx::query(QUERY)
        .bind(auction.id)
        .bind(auction.nft_id)
        .bind(&auction.seller)
        .bind(&auction.min_bid)
        .bind(&auction.highest_bid)
        .bind(&auction.highest_bidder)
        .bind(auction.end_time)
        .bind(auction.settled)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn fetch(ex: &mut PgConnection, id: i64) -> Result<Option<Auction>, sqlx::Error> {
    const QUERY: &str = r#"
        SELECT * FROM auctions
        WHERE id = $1
    "#;
    sqlx::query_as(QUERY).bind(id).fetch_optional(ex).await
}

/// Result of flipping the settled flag of an auction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettleOutcome {
    Updated,
    AlreadySettled,
    NotFound,
}

/// Sets `settled` on an auction. The flag is monotonic: the update only
/// touches rows where it is still unset, and re-invocations report
/// `AlreadySettled` instead of writing anything.
pub async fn mark_settled(ex: &mut PgConnection, id: i64) -> Result<SettleOutcome, sqlx::Error> {
    const UPDATE: &str = "\
        UPDATE auctions SET settled = true WHERE id = $1 AND NOT settled;";
    let updated = sqlx::query(UPDATE)
        .bind(id)
        .execute(&mut *ex)
        .await?
        .rows_affected();
    if updated > 0 {
        return Ok(SettleOutcome::Updated);
    }
    const EXISTS: &str = "\
        SELECT settled FROM auctions WHERE id = $1;";
    match sqlx::query_scalar::<_, bool>(EXISTS)
        .bind(id)
        .fetch_optional(ex)
        .await?
    {
        Some(_) => Ok(SettleOutcome::AlreadySettled),
        None => Ok(SettleOutcome::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::nfts, sqlx::Connection};

    async fn insert_with_nft(db: &mut PgConnection, auction: &Auction) {
        nfts::insert(
            db,
            &nfts::Nft {
                id: auction.nft_id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        insert(db, auction).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_auction_roundtrip() {
        let mut db = PgConnection::connect("postgresql://").await.unwrap();
        let mut db = db.begin().await.unwrap();
        crate::clear_DANGER_(&mut db).await.unwrap();

        let auction = Auction {
            id: 1,
            nft_id: 2,
            seller: "0x1111111111111111111111111111111111111111".to_string(),
            min_bid: BigDecimal::from(10),
            highest_bid: Some(BigDecimal::from(25)),
            highest_bidder: Some("0x2222222222222222222222222222222222222222".to_string()),
            end_time: Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
            settled: false,
        };
        insert_with_nft(&mut db, &auction).await;
        assert_eq!(fetch(&mut db, 1).await.unwrap(), Some(auction));
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_mark_settled_is_monotonic() {
        let mut db = PgConnection::connect("postgresql://").await.unwrap();
        let mut db = db.begin().await.unwrap();
        crate::clear_DANGER_(&mut db).await.unwrap();

        let auction = Auction {
            id: 1,
            nft_id: 1,
            ..Default::default()
        };
        insert_with_nft(&mut db, &auction).await;

        assert_eq!(
            mark_settled(&mut db, 1).await.unwrap(),
            SettleOutcome::Updated
        );
        assert!(fetch(&mut db, 1).await.unwrap().unwrap().settled);
        assert_eq!(
            mark_settled(&mut db, 1).await.unwrap(),
            SettleOutcome::AlreadySettled
        );
        assert!(fetch(&mut db, 1).await.unwrap().unwrap().settled);
        assert_eq!(
            mark_settled(&mut db, 2).await.unwrap(),
            SettleOutcome::NotFound
        );
    }
}
