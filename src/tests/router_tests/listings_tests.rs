// src/tests/router_tests/listings_tests.rs
use crate::db::properties::{save_and_publish, save_draft};
use crate::db::wizard_sessions::load_session;
use crate::db::Database;
use crate::domain::flow::FlowType;
use crate::domain::form::FormData;
use crate::domain::property::PropertyRecord;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, expect_err, get, init_test_db, location, post_form, sign_in, test_config,
};
use crate::wizard::{Stage, WizardMode};
use rusqlite::params;
use serde_json::json;

fn seed_listing(db: &Database, owner: i64, title: &str, publish: bool, now: i64) -> i64 {
    let mut form = FormData::default();
    form.mark_flow(FlowType::ResidentialSale);
    form.set_step_value("res_sale_basic_details", "title", json!(title), Some("title"));
    form.set_step_value("res_sale_location", "city", json!("Chennai"), Some("city"));
    form.set_step_value(
        "res_sale_sale_details",
        "expectedPrice",
        json!(8500000),
        Some("expectedPrice"),
    );
    let record = PropertyRecord::from_form(None, FlowType::ResidentialSale, &form);

    db.with_conn(|conn| {
        if publish {
            save_and_publish(conn, owner, &record, now)
        } else {
            save_draft(conn, owner, &record, now)
        }
    })
    .unwrap()
}

#[test]
fn my_listings_shows_only_the_owners_listings() {
    let db = init_test_db("listings_mine");
    let (owner, token) = sign_in(&db, "mine@example.com");
    let (other, _) = sign_in(&db, "other@example.com");

    seed_listing(&db, owner, "Sea view flat", true, 100);
    seed_listing(&db, owner, "Half finished draft", false, 200);
    seed_listing(&db, other, "Somebody else's villa", true, 300);

    let resp = handle(get("/properties/mine", Some(&token)), &db, &test_config()).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Sea view flat"));
    assert!(body.contains("Half finished draft"));
    assert!(!body.contains("villa"));
    assert!(body.contains("Chennai"));
    // Newest first.
    assert!(body.find("Half finished draft") < body.find("Sea view flat"));
}

#[test]
fn saved_status_shows_a_notice() {
    let db = init_test_db("listings_notice");
    let (_, token) = sign_in(&db, "notice@example.com");

    let body = body_string(
        handle(
            get("/properties/mine?saved=4&status=published", Some(&token)),
            &db,
            &test_config(),
        )
        .unwrap(),
    );
    assert!(body.contains("Your listing is live."));

    let body = body_string(
        handle(
            get("/properties/mine?status=bogus", Some(&token)),
            &db,
            &test_config(),
        )
        .unwrap(),
    );
    assert!(!body.contains("Your listing is live."));
    assert!(body.contains("You have not listed anything yet."));
}

#[test]
fn editing_opens_the_wizard_in_edit_mode() {
    let db = init_test_db("listings_edit");
    let (owner, token) = sign_in(&db, "edit@example.com");
    let id = seed_listing(&db, owner, "Garden duplex", true, 100);

    let resp = handle(
        get(&format!("/properties/{id}/edit"), Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        location(&resp),
        "/properties/list/residential/sale/res_sale_basic_details"
    );

    let session = db
        .with_conn(|conn| load_session(conn, owner))
        .unwrap()
        .unwrap();
    assert_eq!(session.mode, WizardMode::Edit { property_id: id });
    assert_eq!(session.flow, Some(FlowType::ResidentialSale));
    assert_eq!(session.stage, Stage::Step { index: 0 });

    // Every step of a stored listing is reachable straight away.
    let resp = handle(
        get(
            "/properties/list/residential/sale/res_sale_review",
            Some(&token),
        ),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Garden duplex"));
}

#[test]
fn starting_another_type_while_editing_leaves_the_listing_alone() {
    let db = init_test_db("listings_edit_then_new");
    let (owner, token) = sign_in(&db, "switch-edit@example.com");
    let config = test_config();
    let original = seed_listing(&db, owner, "Lake view flat", true, 100);

    handle(
        get(&format!("/properties/{original}/edit"), Some(&token)),
        &db,
        &config,
    )
    .unwrap();

    // "Post a property" links go through the same start route.
    let resp = handle(get("/properties/list/land/sale", Some(&token)), &db, &config).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        location(&resp),
        "/properties/list/land/sale/land_sale_basic_details"
    );

    let session = db
        .with_conn(|conn| load_session(conn, owner))
        .unwrap()
        .unwrap();
    assert_eq!(session.mode, WizardMode::Create);
    assert_eq!(session.flow, Some(FlowType::LandSale));
    assert!(session.form.step("res_sale_basic_details").is_none());

    let resp = handle(
        post_form(
            "/properties/list/land/sale/land_sale_basic_details",
            &token,
            &[("plotArea", "2400"), ("action", "save_draft")],
        ),
        &db,
        &config,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(!location(&resp).contains(&format!("saved={original}&")));

    let rows: Vec<(i64, String, String)> = db
        .with_conn(|conn| {
            let mut stmt = conn.prepare(
                "select id, flow_type, status from properties where owner_id = ? order by id",
            )?;
            let rows = stmt
                .query_map(params![owner], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        (original, "residential_sale".to_string(), "published".to_string())
    );
    assert_eq!(rows[1].1, "land_sale");
    assert_eq!(rows[1].2, "draft");
}

#[test]
fn editing_someone_elses_listing_is_not_found() {
    let db = init_test_db("listings_edit_foreign");
    let (_, token) = sign_in(&db, "intruder@example.com");
    let (other, _) = sign_in(&db, "victim@example.com");
    let id = seed_listing(&db, other, "Private cottage", true, 100);

    let err = expect_err(handle(
        get(&format!("/properties/{id}/edit"), Some(&token)),
        &db,
        &test_config(),
    ));
    assert!(matches!(err, ServerError::NotFound));

    let err = expect_err(handle(
        get("/properties/not-a-number/edit", Some(&token)),
        &db,
        &test_config(),
    ));
    assert!(matches!(err, ServerError::NotFound));
}
