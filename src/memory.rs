//! In-process stores backing the service and router tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::repo::{CreateUserError, NewUser, User, UserStore},
    movies::repo::{Movie, MovieStore, NewMovie},
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(lock(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, CreateUserError> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.email == user.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let created = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct MemoryMovieStore {
    movies: Mutex<Vec<Movie>>,
}

impl MemoryMovieStore {
    /// Inserts a record as-is, bypassing the `(title, year)` check. Lets tests
    /// stage data that did not come from reconciliation.
    pub fn insert_raw(&self, movie: Movie) {
        lock(&self.movies).push(movie);
    }

    pub fn snapshot(&self) -> Vec<Movie> {
        lock(&self.movies).clone()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self) -> anyhow::Result<Vec<Movie>> {
        let mut movies = self.snapshot();
        movies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(movies)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>> {
        Ok(lock(&self.movies).iter().find(|m| m.id == id).cloned())
    }

    async fn insert_if_absent(&self, movie: &NewMovie) -> anyhow::Result<bool> {
        let mut movies = lock(&self.movies);
        if movies
            .iter()
            .any(|m| m.title == movie.title && m.year == movie.year)
        {
            return Ok(false);
        }
        // Keep creation times strictly increasing so ordering is deterministic.
        let now = OffsetDateTime::now_utc();
        let created_at = match movies.iter().map(|m| m.created_at).max() {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        movies.push(Movie {
            id: Uuid::new_v4(),
            title: movie.title.clone(),
            year: movie.year,
            genre: movie.genre.clone(),
            director: movie.director.clone(),
            plot: movie.plot.clone(),
            poster_url: movie.poster_url.clone(),
            created_by: movie.created_by,
            created_at,
        });
        Ok(true)
    }

    async fn set_poster_by_key(
        &self,
        title: &str,
        year: i32,
        poster_url: &str,
    ) -> anyhow::Result<u64> {
        let mut updated = 0;
        for m in lock(&self.movies)
            .iter_mut()
            .filter(|m| m.title == title && m.year == year)
        {
            m.poster_url = Some(poster_url.to_string());
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_missing_poster(&self) -> anyhow::Result<Vec<Movie>> {
        Ok(lock(&self.movies)
            .iter()
            .filter(|m| m.poster_url.as_deref().map_or(true, str::is_empty))
            .cloned()
            .collect())
    }

    async fn set_poster(&self, id: Uuid, poster_url: &str) -> anyhow::Result<()> {
        if let Some(m) = lock(&self.movies).iter_mut().find(|m| m.id == id) {
            m.poster_url = Some(poster_url.to_string());
        }
        Ok(())
    }

    async fn delete_by_titles(&self, lowercase_titles: &[String]) -> anyhow::Result<u64> {
        let mut movies = lock(&self.movies);
        let before = movies.len();
        movies.retain(|m| !lowercase_titles.contains(&m.title.trim().to_lowercase()));
        Ok((before - movies.len()) as u64)
    }
}
