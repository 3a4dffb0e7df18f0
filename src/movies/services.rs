use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    movies::repo::{Movie, MovieStore},
};

const NOT_FOUND: &str = "Movie not found";

pub async fn list(store: &dyn MovieStore) -> AppResult<Vec<Movie>> {
    Ok(store.list().await?)
}

/// Malformed ids and missing records both surface as [`AppError::NotFound`].
pub async fn get_by_id(store: &dyn MovieStore, id: &str) -> AppResult<Movie> {
    let Ok(id) = Uuid::parse_str(id) else {
        debug!(%id, "malformed movie id");
        return Err(AppError::NotFound(NOT_FOUND.into()));
    };
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl WriteAction {
    fn message(self) -> &'static str {
        match self {
            WriteAction::Create => "Creating movies is disabled",
            WriteAction::Update => "Updating movies is disabled",
            WriteAction::Delete => "Deleting movies is disabled",
        }
    }
}

/// Catalog writes are switched off in this deployment; nothing reaches the store.
pub fn disabled(action: WriteAction) -> AppError {
    warn!(?action, "rejected disabled movie write");
    AppError::MethodDisabled(action.message().into())
}
