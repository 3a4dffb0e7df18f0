use serde::Serialize;

use crate::movies::repo::Movie;

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub count: usize,
    pub movies: Vec<Movie>,
}

impl From<Vec<Movie>> for MovieListResponse {
    fn from(movies: Vec<Movie>) -> Self {
        Self {
            success: true,
            count: movies.len(),
            movies,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}
