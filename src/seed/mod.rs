//! Startup reconciliation of the demo catalog.
//!
//! Three phases run in order against the movie store:
//! 1. upsert every non-blocked demo entry by `(title, year)`, refreshing only its poster
//! 2. backfill posters on records that have none, matched by title
//! 3. delete every record whose title is blocklisted
//!
//! The routine is idempotent. Phase failures are logged and never abort startup.

mod demo;

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    config::SeedSettings,
    movies::repo::{MovieStore, NewMovie},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedMovie {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub director: String,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl SeedMovie {
    fn to_new_movie(&self) -> NewMovie {
        NewMovie {
            title: self.title.clone(),
            year: self.year,
            genre: self.genre.clone(),
            director: self.director.clone(),
            plot: self.plot.clone(),
            poster_url: self.poster_url.clone(),
            created_by: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    movies: Vec<SeedMovie>,
    #[serde(default)]
    blocked_titles: Vec<String>,
}

/// Demo dataset and blocklist. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    movies: Vec<SeedMovie>,
    blocked: HashSet<String>,
}

impl SeedConfig {
    pub fn new(movies: Vec<SeedMovie>, blocked_titles: impl IntoIterator<Item = String>) -> Self {
        Self {
            movies,
            blocked: blocked_titles
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Built-in demo catalog.
    pub fn demo() -> Self {
        Self::new(demo::movies(), demo::blocked_titles())
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let file: SeedFile = serde_json::from_str(raw).context("parse seed config")?;
        Ok(Self::new(file.movies, file.blocked_titles))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read seed file {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_settings(settings: &SeedSettings) -> anyhow::Result<Self> {
        match &settings.file {
            Some(path) => Self::load(path),
            None => Ok(Self::demo()),
        }
    }

    pub fn is_blocked(&self, title: &str) -> bool {
        self.blocked.contains(&title.trim().to_lowercase())
    }

    /// Demo entries that survive the blocklist.
    pub fn active_movies(&self) -> impl Iterator<Item = &SeedMovie> {
        self.movies.iter().filter(|m| !self.is_blocked(&m.title))
    }

    fn posters_by_title(&self) -> HashMap<String, String> {
        self.active_movies()
            .filter_map(|m| {
                let poster = m.poster_url.as_deref()?.trim();
                (!poster.is_empty()).then(|| (m.title.trim().to_lowercase(), poster.to_string()))
            })
            .collect()
    }

    fn blocked_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.blocked.iter().cloned().collect();
        titles.sort();
        titles
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Demo entries upserted (inserted or poster refreshed).
    pub ensured: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub backfilled: usize,
    pub removed: u64,
    pub failed_phases: Vec<&'static str>,
}

async fn upsert_phase(
    store: &dyn MovieStore,
    config: &SeedConfig,
    report: &mut SeedReport,
) -> anyhow::Result<()> {
    for entry in config.active_movies() {
        let movie = match entry.to_new_movie().validate() {
            Ok(m) => m,
            Err(reason) => {
                warn!(title = %entry.title, year = entry.year, %reason, "skipping invalid seed movie");
                report.skipped += 1;
                continue;
            }
        };
        if store.insert_if_absent(&movie).await? {
            report.inserted += 1;
        }
        if let Some(poster) = &movie.poster_url {
            store
                .set_poster_by_key(&movie.title, movie.year, poster)
                .await?;
        }
        report.ensured += 1;
    }
    Ok(())
}

async fn backfill_phase(
    store: &dyn MovieStore,
    config: &SeedConfig,
    report: &mut SeedReport,
) -> anyhow::Result<()> {
    let posters = config.posters_by_title();
    for movie in store.list_missing_poster().await? {
        if let Some(poster) = posters.get(&movie.title.trim().to_lowercase()) {
            store.set_poster(movie.id, poster).await?;
            report.backfilled += 1;
        }
    }
    Ok(())
}

async fn cleanup_phase(
    store: &dyn MovieStore,
    config: &SeedConfig,
    report: &mut SeedReport,
) -> anyhow::Result<()> {
    report.removed = store.delete_by_titles(&config.blocked_titles()).await?;
    Ok(())
}

/// Runs all three phases. A failing phase is logged and the next one still runs.
pub async fn reconcile(store: &dyn MovieStore, config: &SeedConfig) -> SeedReport {
    let mut report = SeedReport::default();

    if let Err(e) = upsert_phase(store, config, &mut report).await {
        warn!(error = %e, "movie seeding: upsert failed");
        report.failed_phases.push("upsert");
    }
    if let Err(e) = backfill_phase(store, config, &mut report).await {
        warn!(error = %e, "movie seeding: poster backfill failed");
        report.failed_phases.push("backfill");
    }
    if let Err(e) = cleanup_phase(store, config, &mut report).await {
        warn!(error = %e, "movie seeding: cleanup failed");
        report.failed_phases.push("cleanup");
    }

    report
}

static SEEDED: AtomicBool = AtomicBool::new(false);

/// Startup entry point. Runs [`reconcile`] at most once per process; later
/// calls return `None`.
pub async fn run_once(store: &dyn MovieStore, config: &SeedConfig) -> Option<SeedReport> {
    if SEEDED.swap(true, Ordering::SeqCst) {
        warn!("movie seeding already ran in this process; skipping");
        return None;
    }
    let report = reconcile(store, config).await;
    info!(
        ensured = report.ensured,
        inserted = report.inserted,
        skipped = report.skipped,
        backfilled = report.backfilled,
        removed = report.removed,
        failed = ?report.failed_phases,
        "movie seeding finished"
    );
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        memory::MemoryMovieStore,
        movies::repo::Movie,
    };
    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn entry(title: &str, year: i32, poster: Option<&str>) -> SeedMovie {
        SeedMovie {
            title: title.into(),
            year,
            genre: "Action / Drama".into(),
            director: "Ridley Scott".into(),
            plot: Some("A betrayed Roman general seeks vengeance.".into()),
            poster_url: poster.map(Into::into),
        }
    }

    fn stored(title: &str, year: i32, poster: Option<&str>) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: title.into(),
            year,
            genre: "Drama".into(),
            director: "Unknown".into(),
            plot: None,
            poster_url: poster.map(Into::into),
            created_by: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn sorted(mut movies: Vec<Movie>) -> Vec<Movie> {
        movies.sort_by_key(|m| m.id);
        movies
    }

    #[tokio::test]
    async fn demo_seed_skips_blocked_titles() {
        let store = MemoryMovieStore::default();
        let config = SeedConfig::demo();
        let report = reconcile(&store, &config).await;

        assert!(report.failed_phases.is_empty());
        assert_eq!(report.inserted, config.active_movies().count());
        let movies = store.snapshot();
        assert!(movies.iter().all(|m| !config.is_blocked(&m.title)));
        assert!(movies.iter().any(|m| m.title == "Gladiator"));
        assert!(!movies.iter().any(|m| m.title == "Inception"));
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let store = MemoryMovieStore::default();
        let config = SeedConfig::demo();
        reconcile(&store, &config).await;
        let first = sorted(store.snapshot());

        let second_report = reconcile(&store, &config).await;
        assert_eq!(second_report.inserted, 0);
        assert_eq!(second_report.removed, 0);
        assert_eq!(sorted(store.snapshot()), first);
    }

    #[tokio::test]
    async fn poster_is_the_only_field_refreshed() {
        let store = MemoryMovieStore::default();
        let v1 = SeedConfig::new(vec![entry("Gladiator", 2000, Some("https://p1"))], vec![]);
        reconcile(&store, &v1).await;
        let before = store.snapshot().remove(0);

        let mut changed = entry("Gladiator", 2000, Some("https://p2"));
        changed.director = "Somebody Else".into();
        changed.plot = Some("Rewritten".into());
        let v2 = SeedConfig::new(vec![changed], vec![]);
        let report = reconcile(&store, &v2).await;

        assert_eq!(report.inserted, 0);
        let after = store.snapshot();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].poster_url.as_deref(), Some("https://p2"));
        assert_eq!(
            Movie {
                poster_url: before.poster_url.clone(),
                ..after[0].clone()
            },
            before
        );
    }

    #[tokio::test]
    async fn backfill_fills_missing_posters_by_title() {
        let store = MemoryMovieStore::default();
        store.insert_raw(stored("gladiator", 1999, None));
        store.insert_raw(stored("GLADIATOR", 1998, Some("")));
        store.insert_raw(stored("Unlisted", 2001, None));
        let config = SeedConfig::new(vec![entry("Gladiator", 2000, Some("https://p1"))], vec![]);

        let report = reconcile(&store, &config).await;
        assert_eq!(report.backfilled, 2);
        for m in store.snapshot() {
            match m.title.as_str() {
                "Unlisted" => assert_eq!(m.poster_url, None),
                _ => assert_eq!(m.poster_url.as_deref(), Some("https://p1")),
            }
        }
    }

    #[tokio::test]
    async fn cleanup_removes_blocked_titles_from_any_source() {
        let store = MemoryMovieStore::default();
        store.insert_raw(stored("Breaking BAD", 2008, None));
        store.insert_raw(stored("Heat", 1995, None));
        let config = SeedConfig::new(
            vec![entry("Joker", 2019, Some("https://joker"))],
            vec!["breaking bad".to_string(), "JOKER".to_string()],
        );

        let report = reconcile(&store, &config).await;
        assert_eq!(report.inserted, 0);
        assert_eq!(report.removed, 1);
        let titles: Vec<String> = store.snapshot().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Heat".to_string()]);
    }

    #[tokio::test]
    async fn cleanup_ignores_padding_around_stored_titles() {
        let store = MemoryMovieStore::default();
        store.insert_raw(stored(" Joker ", 2019, None));
        store.insert_raw(stored("Heat", 1995, None));
        let config = SeedConfig::new(vec![], vec!["  joker".to_string()]);

        let report = reconcile(&store, &config).await;
        assert_eq!(report.removed, 1);
        let titles: Vec<String> = store.snapshot().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Heat".to_string()]);
    }

    #[tokio::test]
    async fn invalid_entries_are_skipped() {
        let store = MemoryMovieStore::default();
        let config = SeedConfig::new(
            vec![
                entry("Too Early", 1700, Some("https://x")),
                entry("Bad Poster", 2000, Some("not a url")),
                entry("Fine", 2000, None),
            ],
            vec![],
        );
        let report = reconcile(&store, &config).await;
        assert_eq!(report.skipped, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(store.snapshot()[0].title, "Fine");
    }

    #[test]
    fn json_config_uses_camel_case() {
        let raw = r#"{
            "movies": [{"title": "Heat", "year": 1995, "genre": "Crime",
                        "director": "Michael Mann", "posterUrl": "https://heat"}],
            "blockedTitles": ["Leo"]
        }"#;
        let config = SeedConfig::from_json(raw).unwrap();
        assert!(config.is_blocked("LEO"));
        let movies: Vec<&SeedMovie> = config.active_movies().collect();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].poster_url.as_deref(), Some("https://heat"));
        assert!(SeedConfig::from_json("{}").is_err());
    }

    struct BrokenStore;

    #[async_trait]
    impl MovieStore for BrokenStore {
        async fn list(&self) -> anyhow::Result<Vec<Movie>> {
            anyhow::bail!("down")
        }
        async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<Movie>> {
            anyhow::bail!("down")
        }
        async fn insert_if_absent(&self, _movie: &NewMovie) -> anyhow::Result<bool> {
            anyhow::bail!("down")
        }
        async fn set_poster_by_key(&self, _t: &str, _y: i32, _p: &str) -> anyhow::Result<u64> {
            anyhow::bail!("down")
        }
        async fn list_missing_poster(&self) -> anyhow::Result<Vec<Movie>> {
            anyhow::bail!("down")
        }
        async fn set_poster(&self, _id: Uuid, _p: &str) -> anyhow::Result<()> {
            anyhow::bail!("down")
        }
        async fn delete_by_titles(&self, _t: &[String]) -> anyhow::Result<u64> {
            anyhow::bail!("down")
        }
    }

    #[tokio::test]
    async fn store_failures_are_reported_not_raised() {
        let report = reconcile(&BrokenStore, &SeedConfig::demo()).await;
        assert_eq!(report.failed_phases, vec!["upsert", "backfill", "cleanup"]);
    }

    #[tokio::test]
    async fn run_once_only_runs_the_first_time() {
        let store = MemoryMovieStore::default();
        let config = SeedConfig::demo();
        let first = run_once(&store, &config).await;
        let second = run_once(&store, &config).await;
        assert!(first.is_some());
        assert!(second.is_none());
    }
}
