use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use movie_catalog::{
    app::build_app,
    config::AppConfig,
    memory::{MemoryMovieStore, MemoryUserStore},
    seed::{reconcile, SeedConfig},
    state::AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    movies: Arc<MemoryMovieStore>,
}

async fn test_app() -> TestApp {
    let movies = Arc::new(MemoryMovieStore::default());
    reconcile(movies.as_ref(), &SeedConfig::demo()).await;
    let state = AppState::from_parts(
        Arc::new(AppConfig::for_tests()),
        Arc::new(MemoryUserStore::default()),
        movies.clone(),
    );
    TestApp {
        router: build_app(state),
        movies,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, json)
}

fn signup_body(email: &str) -> JsonValue {
    json!({
        "fullName": "Sarah Connor",
        "email": email,
        "password": "skynet1",
        "confirmPassword": "skynet1",
    })
}

#[tokio::test]
async fn signup_then_login() {
    let app = test_app().await;

    let (status, body) = send(&app.router, Method::POST, "/api/signup", Some(signup_body("sarah@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["fullName"], "Sarah Connor");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "sarah@example.com", "password": "skynet1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "sarah@example.com");
}

#[tokio::test]
async fn signup_errors_use_envelope() {
    let app = test_app().await;

    let mut mismatch = signup_body("a@example.com");
    mismatch["confirmPassword"] = json!("skynet2");
    let (status, body) = send(&app.router, Method::POST, "/api/signup", Some(mismatch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Password and confirm password do not match");

    let (status, _) = send(&app.router, Method::POST, "/api/signup", Some(json!({ "email": "x@y.z" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app.router, Method::POST, "/api/signup", Some(signup_body("dup@example.com"))).await;
    let (status, body) = send(&app.router, Method::POST, "/api/signup", Some(signup_body("dup@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = test_app().await;
    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_look_the_same() {
    let app = test_app().await;
    send(&app.router, Method::POST, "/api/signup", Some(signup_body("t800@example.com"))).await;

    let (s1, b1) = send(
        &app.router,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "nobody@example.com", "password": "skynet1" })),
    )
    .await;
    let (s2, b2) = send(
        &app.router,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "t800@example.com", "password": "wrong!!" })),
    )
    .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn list_movies_newest_first() {
    let app = test_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(body["count"].as_u64().unwrap() as usize, movies.len());
    assert!(!movies.is_empty());

    let stamps: Vec<time::OffsetDateTime> = movies
        .iter()
        .map(|m| {
            time::OffsetDateTime::parse(
                m["createdAt"].as_str().unwrap(),
                &time::format_description::well_known::Rfc3339,
            )
            .unwrap()
        })
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn get_movie_by_id_and_not_found() {
    let app = test_app().await;
    let movie = app.movies.snapshot().remove(0);

    let (status, body) = send(&app.router, Method::GET, &format!("/api/movies/{}", movie.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movie"]["title"], movie.title.as_str());

    let (s1, b1) = send(&app.router, Method::GET, &format!("/api/movies/{}", uuid::Uuid::new_v4()), None).await;
    let (s2, b2) = send(&app.router, Method::GET, "/api/movies/123abc", None).await;
    assert_eq!(s1, StatusCode::NOT_FOUND);
    assert_eq!(s2, StatusCode::NOT_FOUND);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn movie_writes_are_disabled() {
    let app = test_app().await;
    let before = app.movies.snapshot();
    let id = before[0].id;

    let cases = [
        (Method::POST, "/api/movies".to_string(), "Creating movies is disabled"),
        (Method::PUT, format!("/api/movies/{id}"), "Updating movies is disabled"),
        (Method::DELETE, format!("/api/movies/{id}"), "Deleting movies is disabled"),
        (Method::DELETE, "/api/movies/garbage".to_string(), "Deleting movies is disabled"),
    ];
    for (method, uri, message) in cases {
        let (status, body) = send(&app.router, method, &uri, Some(json!({ "title": "New" }))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }
    assert_eq!(app.movies.snapshot(), before);
}

#[tokio::test]
async fn unknown_route_and_index() {
    let app = test_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["path"], "/api/nope");

    let (status, body) = send(&app.router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["movies"], "/api/movies");
}
