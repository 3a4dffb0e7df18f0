use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::movies::repo::{MovieStore, PgMovieStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = crate::db::connect(&config).await?;
        Ok(Self::from_pool(db, Arc::new(config)))
    }

    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserStore::new(db.clone())),
            movies: Arc::new(PgMovieStore::new(db)),
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        movies: Arc<dyn MovieStore>,
    ) -> Self {
        Self {
            config,
            users,
            movies,
        }
    }
}
