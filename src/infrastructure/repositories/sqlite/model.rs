// src/infrastructure/repositories/sqlite/model.rs
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, QueryableByName};

/// A link row as stored.
#[derive(Queryable, Identifiable, QueryableByName, Debug, Clone)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::links)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbLink {
    pub id: i32,
    pub ts: i64,
    pub url: String,
    pub description: String,
    pub extended: String,
    pub via: Option<String>,
    pub tags: String,
    pub hash: String,
}

/// New link for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::links)]
pub struct NewLink {
    pub ts: i64,
    pub url: String,
    pub description: String,
    pub extended: String,
    pub via: Option<String>,
    pub tags: String,
    pub hash: String,
}

/// Full-row replacement applied on hash conflict. Excludes `id` and `hash`
/// so the surrogate key and identity survive an upsert.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::links)]
pub struct DbLinkChanges {
    pub ts: i64,
    pub url: String,
    pub description: String,
    pub extended: String,
    #[diesel(treat_none_as_null = true)]
    pub via: Option<String>,
    pub tags: String,
}
