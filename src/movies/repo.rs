use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub use crate::movies::repo_types::{Movie, NewMovie};

/// Persistence for the movie collection.
///
/// Read methods back the public API; the rest exist for the startup
/// reconciliation and are never reachable from a request.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies, newest `created_at` first.
    async fn list(&self) -> anyhow::Result<Vec<Movie>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>>;

    /// Inserts unless a record with the same `(title, year)` exists.
    /// Returns whether a row was inserted.
    async fn insert_if_absent(&self, movie: &NewMovie) -> anyhow::Result<bool>;
    /// Overwrites `poster_url` on every record keyed by `(title, year)`.
    async fn set_poster_by_key(&self, title: &str, year: i32, poster_url: &str)
        -> anyhow::Result<u64>;
    /// Records whose poster is null or empty.
    async fn list_missing_poster(&self) -> anyhow::Result<Vec<Movie>>;
    async fn set_poster(&self, id: Uuid, poster_url: &str) -> anyhow::Result<()>;
    /// Deletes records whose trimmed, lowercased title is in `lowercase_titles`.
    async fn delete_by_titles(&self, lowercase_titles: &[String]) -> anyhow::Result<u64>;
}

const MOVIE_COLUMNS: &str =
    "id, title, year, genre, director, plot, poster_url, created_by, created_at";

#[derive(Clone)]
pub struct PgMovieStore {
    db: PgPool,
}

impl PgMovieStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list(&self) -> anyhow::Result<Vec<Movie>> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.db)
        .await
        .context("list movies")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>> {
        let row = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find movie by id")?;
        Ok(row)
    }

    async fn insert_if_absent(&self, movie: &NewMovie) -> anyhow::Result<bool> {
        let ctx = || format!("insert movie {} ({})", movie.title, movie.year);
        let mut tx = self.db.begin().await.with_context(ctx)?;

        // Advisory lock on the (title, year) key serializes concurrent inserts of the same movie.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), $2)")
            .bind(&movie.title)
            .bind(movie.year)
            .execute(&mut *tx)
            .await
            .with_context(ctx)?;

        let res = sqlx::query(
            r#"
            INSERT INTO movies (id, title, year, genre, director, plot, poster_url, created_by)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM movies WHERE title = $2 AND year = $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.genre)
        .bind(&movie.director)
        .bind(&movie.plot)
        .bind(&movie.poster_url)
        .bind(movie.created_by)
        .execute(&mut *tx)
        .await
        .with_context(ctx)?;

        tx.commit().await.with_context(ctx)?;
        Ok(res.rows_affected() > 0)
    }

    async fn set_poster_by_key(
        &self,
        title: &str,
        year: i32,
        poster_url: &str,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query("UPDATE movies SET poster_url = $3 WHERE title = $1 AND year = $2")
            .bind(title)
            .bind(year)
            .bind(poster_url)
            .execute(&self.db)
            .await
            .with_context(|| format!("update poster for {title} ({year})"))?;
        Ok(res.rows_affected())
    }

    async fn list_missing_poster(&self) -> anyhow::Result<Vec<Movie>> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE poster_url IS NULL OR poster_url = ''"
        ))
        .fetch_all(&self.db)
        .await
        .context("list movies without poster")?;
        Ok(rows)
    }

    async fn set_poster(&self, id: Uuid, poster_url: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE movies SET poster_url = $2 WHERE id = $1")
            .bind(id)
            .bind(poster_url)
            .execute(&self.db)
            .await
            .with_context(|| format!("set poster for movie {id}"))?;
        Ok(())
    }

    async fn delete_by_titles(&self, lowercase_titles: &[String]) -> anyhow::Result<u64> {
        if lowercase_titles.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query("DELETE FROM movies WHERE lower(btrim(title)) = ANY($1)")
            .bind(lowercase_titles)
            .execute(&self.db)
            .await
            .context("delete blocked movies")?;
        Ok(res.rows_affected())
    }
}
