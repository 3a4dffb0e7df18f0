use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const MIN_YEAR: i32 = 1888;
pub const MAX_PLOT_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub director: String,
    pub plot: Option<String>,
    pub poster_url: Option<String>,
    pub created_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert payload; id and created_at are assigned by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub director: String,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
}

fn is_http_url(s: &str) -> bool {
    lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"^https?://.+").unwrap();
    }
    URL_RE.is_match(s)
}

impl NewMovie {
    /// Trims text fields and checks the record constraints.
    pub fn validate(mut self) -> Result<Self, String> {
        self.title = self.title.trim().to_string();
        self.genre = self.genre.trim().to_string();
        self.director = self.director.trim().to_string();
        self.plot = self.plot.map(|p| p.trim().to_string());
        self.poster_url = self
            .poster_url
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        if self.title.is_empty() {
            return Err("Movie title is required".into());
        }
        if self.genre.is_empty() {
            return Err("Genre is required".into());
        }
        if self.director.is_empty() {
            return Err("Director is required".into());
        }
        if self.year < MIN_YEAR {
            return Err(format!("Year must be at least {MIN_YEAR}"));
        }
        let max_year = OffsetDateTime::now_utc().year() + 1;
        if self.year > max_year {
            return Err("Year cannot be in the future".into());
        }
        if let Some(plot) = &self.plot {
            if plot.chars().count() > MAX_PLOT_CHARS {
                return Err(format!(
                    "Plot description cannot exceed {MAX_PLOT_CHARS} characters"
                ));
            }
        }
        if let Some(url) = &self.poster_url {
            if !is_http_url(url) {
                return Err("Poster URL must be a valid HTTP/HTTPS URL".into());
            }
        }
        Ok(self)
    }
}
