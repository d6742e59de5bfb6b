pub mod auctions;
pub mod bids;
pub mod nfts;

use sqlx::{Executor, PgPool};

// Design:
//
// Functions that run a single query take `&mut PgConnection`; functions
// that need several queries to succeed or fail together take `&mut
// PgTransaction`. The parameter is called `ex` for `Executor`. Since
// `PgTransaction` derefs to `PgConnection` callers can use any function
// standalone or as part of a bigger transaction; committing is the
// caller's job.
//
// Tests begin a transaction, run all queries on it and never commit, so
// they roll back on drop and can run in parallel against one database.

pub type PgTransaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// The tables this crate touches, in an order that respects foreign
/// keys when truncating.
pub const TABLES: &[&str] = &["bids", "auctions", "nfts"];

#[allow(non_snake_case)]
pub async fn clear_DANGER_(ex: &mut PgTransaction<'_>) -> sqlx::Result<()> {
    for table in TABLES {
        ex.execute(format!("TRUNCATE {table} CASCADE;").as_str())
            .await?;
    }
    Ok(())
}

/// Like above but more ergonomic for tests that use a pool.
#[allow(non_snake_case)]
pub async fn clear_DANGER(pool: &PgPool) -> sqlx::Result<()> {
    let mut transaction = pool.begin().await?;
    clear_DANGER_(&mut transaction).await?;
    transaction.commit().await
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        sqlx::{Connection, PgConnection},
    };

    #[tokio::test]
    #[ignore]
    async fn postgres_clear() {
        let mut db = PgConnection::connect("postgresql://").await.unwrap();
        let mut db = db.begin().await.unwrap();
        clear_DANGER_(&mut db).await.unwrap();
    }
}
