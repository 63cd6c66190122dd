use crate::auth::create_session;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::db::users::get_or_create_user;
use crate::router::now_unix;
use astra::{Body, Request, Response};
use std::io::Read;

/// Fresh throwaway DB file per test, built from the production schema.
pub fn init_test_db(name: &str) -> Database {
    let path = std::env::temp_dir().join(format!("listing_wizard_{name}.sqlite"));
    let _ = std::fs::remove_file(&path);
    let db = Database::new(path.display().to_string());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// Creates a user and returns (user id, raw session token).
pub fn sign_in(db: &Database, email: &str) -> (i64, String) {
    let now = now_unix();
    db.with_conn(|conn| {
        let user_id = get_or_create_user(conn, email, now)?;
        let token = create_session(conn, user_id, now)?;
        Ok((user_id, token))
    })
    .expect("sign in failed")
}

pub fn get(uri: &str, token: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(http::Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("theme=dark; session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, token: &str, pairs: &[(&str, &str)]) -> Request {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    http::Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header("Cookie", format!("session={token}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn expect_err(result: crate::responses::ResultResp) -> crate::errors::ServerError {
    match result {
        Ok(resp) => panic!("expected an error, got status {}", resp.status()),
        Err(err) => err,
    }
}
