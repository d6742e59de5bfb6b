use {bigdecimal::BigDecimal, sqlx::PgConnection};

#[derive(Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct Nft {
    pub id: i64,
    pub token_id: BigDecimal,
    pub uri: String,
}

pub async fn insert(ex: &mut PgConnection, nft: &Nft) -> Result<(), sqlx::Error> {
    const QUERY: &str = "\
        INSERT INTO nfts (id, token_id, uri) VALUES ($1, $2, $3);";
    sqlx::query(QUERY)
        .bind(nft.id)
        .bind(&nft.token_id)
        .bind(&nft.uri)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn fetch(ex: &mut PgConnection, id: i64) -> Result<Option<Nft>, sqlx::Error> {
    const QUERY: &str = r#"
        SELECT * FROM nfts
        WHERE id = $1
    "#;
    sqlx::query_as(QUERY).bind(id).fetch_optional(ex).await
}

#[cfg(test)]
mod tests {
    use {super::*, sqlx::Connection};

    #[tokio::test]
    #[ignore]
    async fn postgres_nft_roundtrip() {
        let mut db = PgConnection::connect("postgresql://").await.unwrap();
        let mut db = db.begin().await.unwrap();
        crate::clear_DANGER_(&mut db).await.unwrap();

        assert_eq!(fetch(&mut db, 1).await.unwrap(), None);

        let nft = Nft {
            id: 1,
            token_id: BigDecimal::from(42),
            uri: "ipfs://nft".to_string(),
        };
        insert(&mut db, &nft).await.unwrap();
        assert_eq!(fetch(&mut db, 1).await.unwrap(), Some(nft));
    }
}
