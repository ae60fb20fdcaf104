// src/infrastructure/repositories/sqlite/repository.rs

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use tracing::{debug, instrument};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use crate::domain::error::DomainError;
use crate::domain::link::Link;
use crate::domain::repositories::repository::LinkRepository;
use crate::infrastructure::repositories::sqlite::model::{DbLink, DbLinkChanges, NewLink};
use crate::infrastructure::repositories::sqlite::schema::links::dsl;

/// Distinct year-month bucket row for the archive queries.
#[derive(QueryableByName, Debug)]
struct YearMonth {
    #[diesel(sql_type = Text)]
    year_month: String,
}

#[derive(Clone, Debug)]
pub struct SqliteLinkRepository {
    pool: ConnectionPool,
}

impl SqliteLinkRepository {
    /// Create a new SQLite repository with the provided connection pool
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite repository with the provided database URL
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    /// Deletes all links. Test support.
    #[instrument(skip_all, level = "debug")]
    pub fn empty_links_table(&self) -> SqliteResult<()> {
        let mut conn = self.get_connection()?;

        sql_query("DELETE FROM links;")
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        debug!("Cleaned table.");
        Ok(())
    }

    fn to_domain_model(&self, db_link: DbLink) -> Link {
        Link::from_storage(
            db_link.id,
            db_link.hash,
            db_link.ts,
            db_link.url,
            db_link.description,
            db_link.extended,
            db_link.via,
            &db_link.tags,
        )
    }
}

impl LinkRepository for SqliteLinkRepository {
    #[instrument(skip_all, level = "debug", fields(hash = %link.hash))]
    fn upsert(&self, link: &Link) -> Result<(), DomainError> {
        let mut conn = self.get_connection()?;

        let new_link = NewLink {
            ts: link.ts,
            url: link.url.clone(),
            description: link.title.clone(),
            extended: link.body.clone(),
            via: link.via.clone(),
            tags: link.formatted_tags(),
            hash: link.hash.clone(),
        };
        let changes = DbLinkChanges {
            ts: link.ts,
            url: link.url.clone(),
            description: link.title.clone(),
            extended: link.body.clone(),
            via: link.via.clone(),
            tags: link.formatted_tags(),
        };

        // Single statement keeps the insert-or-replace atomic per row.
        diesel::insert_into(dsl::links)
            .values(&new_link)
            .on_conflict(dsl::hash)
            .do_update()
            .set(&changes)
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn get_by_hash(&self, hash: &str) -> Result<Option<Link>, DomainError> {
        let mut conn = self.get_connection()?;

        let result = dsl::links
            .filter(dsl::hash.eq(hash))
            .first::<DbLink>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(result.map(|db_link| self.to_domain_model(db_link)))
    }

    #[instrument(skip_all, level = "debug")]
    fn latest_timestamp(&self) -> Result<Option<i64>, DomainError> {
        let mut conn = self.get_connection()?;

        let max_ts = dsl::links
            .select(diesel::dsl::max(dsl::ts))
            .first::<Option<i64>>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(max_ts)
    }

    #[instrument(skip_all, level = "debug")]
    fn most_recent(&self, n: usize) -> Result<Vec<Link>, DomainError> {
        let mut conn = self.get_connection()?;

        let db_links = dsl::links
            .order(dsl::ts.desc())
            .limit(n as i64)
            .load::<DbLink>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(db_links
            .into_iter()
            .map(|db_link| self.to_domain_model(db_link))
            .collect())
    }

    #[instrument(skip_all, level = "debug")]
    fn distinct_months(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.get_connection()?;

        let rows = sql_query(
            "SELECT DISTINCT strftime('%Y-%m', ts, 'unixepoch') AS year_month \
             FROM links ORDER BY year_month DESC",
        )
        .load::<YearMonth>(&mut conn)
        .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(rows.into_iter().map(|row| row.year_month).collect())
    }

    #[instrument(skip_all, level = "debug", fields(year_month = %year_month))]
    fn links_in_month(&self, year_month: &str) -> Result<Vec<Link>, DomainError> {
        let mut conn = self.get_connection()?;

        let db_links = sql_query(
            "SELECT id, ts, url, description, extended, via, tags, hash FROM links \
             WHERE strftime('%Y-%m', ts, 'unixepoch') = ? ORDER BY ts DESC",
        )
        .bind::<Text, _>(year_month)
        .load::<DbLink>(&mut conn)
        .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(db_links
            .into_iter()
            .map(|db_link| self.to_domain_model(db_link))
            .collect())
    }

    #[instrument(skip_all, level = "debug", fields(hash = %hash))]
    fn update_via(&self, hash: &str, via: &str) -> Result<bool, DomainError> {
        let mut conn = self.get_connection()?;

        // Deliberately narrower than upsert: one column, nothing else.
        let updated = diesel::update(dsl::links.filter(dsl::hash.eq(hash)))
            .set(dsl::via.eq(via))
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(updated > 0)
    }
}
