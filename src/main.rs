use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod telemetry;
mod templates;
mod wizard;

#[cfg(test)]
mod tests;

fn main() {
    telemetry::init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(%e, "configuration failed");
            std::process::exit(1);
        }
    };

    // 1️⃣ Create the database handle
    let db = Database::new(config.database.path.clone());

    // 2️⃣ Initialize database from schema.sql
    if let Err(e) = init_db(&db, &config.database.schema_path) {
        tracing::error!(%e, "database initialization failed");
        std::process::exit(1);
    }

    if let Some(email) = config.auth.dev_owner_email.as_deref() {
        match bootstrap_dev_owner(&db, email) {
            Ok(token) => tracing::info!(
                email,
                cookie = %format!("{}={token}", config.auth.session_cookie),
                "dev owner session issued"
            ),
            Err(e) => tracing::warn!(%e, email, "dev owner bootstrap failed"),
        }
    }

    // 3️⃣ Start the server
    let addr: SocketAddr = match config.server.addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(%e, addr = %config.server.addr, "invalid listen address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "starting server");

    let server = Server::bind(&addr).max_workers(config.server.max_workers);

    // 4️⃣ Serve requests, passing db handle and config into closure
    let result = server.serve(move |req, _info| match handle(req, &db, &config) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!(%e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}

/// Makes sure the configured owner exists and returns a fresh session token for it.
fn bootstrap_dev_owner(db: &Database, email: &str) -> Result<String, ServerError> {
    let email = email.trim().to_lowercase();
    let now = router::now_unix();
    db.with_conn(|conn| {
        let user_id = db::users::get_or_create_user(conn, &email, now)?;
        db::users::touch_last_login(conn, user_id, now)?;
        auth::create_session(conn, user_id, now)
    })
}
