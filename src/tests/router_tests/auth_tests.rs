// src/tests/router_tests/auth_tests.rs
use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{body_string, expect_err, get, init_test_db, sign_in, test_config};
use rusqlite::params;

#[test]
fn home_page_is_public() {
    let db = init_test_db("auth_home");
    let resp = handle(get("/", None), &db, &test_config()).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("/properties/list"));
}

#[test]
fn wizard_requires_a_session_cookie() {
    let db = init_test_db("auth_no_cookie");

    for uri in [
        "/properties/list",
        "/properties/list/residential/rent",
        "/properties/mine",
    ] {
        let err = expect_err(handle(get(uri, None), &db, &test_config()));
        assert!(matches!(err, ServerError::Unauthorized(_)), "{uri}");
    }
}

#[test]
fn unknown_token_is_unauthorized() {
    let db = init_test_db("auth_bad_token");
    sign_in(&db, "real@example.com");

    let err = expect_err(handle(
        get("/properties/mine", Some("not-a-real-token")),
        &db,
        &test_config(),
    ));
    assert!(matches!(err, ServerError::Unauthorized(_)));
    assert_eq!(error_to_response(err).status(), 401);
}

#[test]
fn revoked_session_is_unauthorized() {
    let db = init_test_db("auth_revoked");
    let (owner, token) = sign_in(&db, "revoked@example.com");

    db.with_conn(|conn| {
        conn.execute(
            "update sessions set revoked_at = 1 where user_id = ?",
            params![owner],
        )?;
        Ok(())
    })
    .unwrap();

    let err = expect_err(handle(get("/properties/list", Some(&token)), &db, &test_config()));
    assert!(matches!(err, ServerError::Unauthorized(_)));
}

#[test]
fn signed_in_owner_sees_type_selection() {
    let db = init_test_db("auth_type_selection");
    let (_, token) = sign_in(&db, "owner@example.com");

    let resp = handle(get("/properties/list", Some(&token)), &db, &test_config()).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("owner@example.com"));
    assert!(body.contains("/properties/list/land/sale"));
}

#[test]
fn unknown_route_is_not_found() {
    let db = init_test_db("auth_unknown_route");
    let err = expect_err(handle(get("/nope/nothing", None), &db, &test_config()));
    assert!(matches!(err, ServerError::NotFound));
    assert_eq!(error_to_response(err).status(), 404);
}
