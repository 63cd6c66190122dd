// src/tests/router_tests/wizard_flow_tests.rs
use crate::db::wizard_sessions::load_session;
use crate::domain::flow::FlowType;
use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{
    body_string, expect_err, get, init_test_db, location, post_form, sign_in, test_config,
};
use crate::wizard::{Stage, WizardError};
use rusqlite::params;

const BASE: &str = "/properties/list/residential/rent";

fn step(id: &str) -> String {
    format!("{BASE}/{id}")
}

/// Walks a residential rental up to its review step.
fn fill_until_review(db: &crate::db::Database, token: &str) {
    let config = test_config();
    let posts: [(&str, &[(&str, &str)]); 5] = [
        (
            "res_rent_basic_details",
            &[
                ("propertyType", "Apartment"),
                ("bhkType", "2 BHK"),
                ("builtUpArea", "1,050"),
                ("action", "next"),
            ],
        ),
        (
            "res_rent_location",
            &[("city", "Pune"), ("locality", "Aundh"), ("action", "next")],
        ),
        (
            "res_rent_rental",
            &[
                ("rentAmount", "30000"),
                ("securityDeposit", "90000"),
                ("maintenance", "Extra"),
                ("maintenanceAmount", "2500"),
                ("availableFrom", "2026-12-01"),
                ("action", "next"),
            ],
        ),
        ("res_rent_features", &[("parking", "No"), ("action", "next")]),
        ("res_rent_photos", &[("action", "next")]),
    ];

    for (id, pairs) in posts {
        let resp = handle(post_form(&step(id), token, pairs), db, &config).unwrap();
        assert_eq!(resp.status(), 303, "posting {id}");
    }
}

#[test]
fn starting_a_flow_redirects_to_its_first_step() {
    let db = init_test_db("wizard_start");
    let (_, token) = sign_in(&db, "start@example.com");

    let resp = handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), step("res_rent_basic_details"));

    let resp = handle(
        get(&step("res_rent_basic_details"), Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Basic Details"));
    assert!(body.contains("name=\"propertyType\""));
    assert!(body.contains("value=\"next\""));
}

#[test]
fn empty_required_field_rerenders_with_message_and_focus() {
    let db = init_test_db("wizard_validation");
    let (_, token) = sign_in(&db, "validate@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();

    let resp = handle(
        post_form(
            &step("res_rent_basic_details"),
            &token,
            &[("bhkType", "1 BHK"), ("action", "next")],
        ),
        &db,
        &test_config(),
    )
    .unwrap();

    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("Please fill in Property type"));
    assert!(body.contains("autofocus"));
    // What was typed survives the failed attempt.
    assert!(body.contains("selected"));
}

#[test]
fn hidden_required_field_does_not_block_next() {
    let db = init_test_db("wizard_hidden_field");
    let (_, token) = sign_in(&db, "hidden@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();
    fill_until_review(&db, &token);

    let resp = handle(
        get(&step("res_rent_features"), Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    // Turning parking on reveals the slot count, which is then required.
    let resp = handle(
        post_form(
            &step("res_rent_features"),
            &token,
            &[("parking", "Yes"), ("action", "next")],
        ),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 422);
    assert!(body_string(resp).contains("Please fill in Parking slots"));
}

#[test]
fn unreached_steps_redirect_back_to_the_current_one() {
    let db = init_test_db("wizard_unreached");
    let (_, token) = sign_in(&db, "jump@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();

    let resp = handle(
        get(&step("res_rent_review"), Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), step("res_rent_basic_details"));

    let err = expect_err(handle(
        get(&step("pg_house_rules"), Some(&token)),
        &db,
        &test_config(),
    ));
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn previous_goes_back_without_validation() {
    let db = init_test_db("wizard_previous");
    let (_, token) = sign_in(&db, "back@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();
    handle(
        post_form(
            &step("res_rent_basic_details"),
            &token,
            &[
                ("propertyType", "Villa"),
                ("bhkType", "4+ BHK"),
                ("builtUpArea", "3200"),
                ("action", "next"),
            ],
        ),
        &db,
        &test_config(),
    )
    .unwrap();

    let resp = handle(
        post_form(&step("res_rent_location"), &token, &[("action", "previous")]),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), step("res_rent_basic_details"));
}

#[test]
fn review_step_hides_navigation_and_offers_submit_actions() {
    let db = init_test_db("wizard_review");
    let (_, token) = sign_in(&db, "review@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();
    fill_until_review(&db, &token);

    let resp = handle(
        get(&step("res_rent_review"), Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Rental Terms"));
    assert!(body.contains("Aundh"));
    assert!(body.contains("value=\"publish\""));
    assert!(!body.contains("value=\"next\""));
}

#[test]
fn publishing_from_review_saves_and_clears_the_session() {
    let db = init_test_db("wizard_publish");
    let (owner, token) = sign_in(&db, "publish@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();
    fill_until_review(&db, &token);

    let resp = handle(
        post_form(&step("res_rent_review"), &token, &[("action", "publish")]),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).starts_with("/properties/mine?saved="));
    assert!(location(&resp).ends_with("&status=published"));

    let (status, title, price, city, flow_type): (String, String, i64, String, String) = db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "select status, title, price, city, flow_type from properties where owner_id = ?",
                params![owner],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )?)
        })
        .unwrap();
    assert_eq!(status, "published");
    assert_eq!(title, "Apartment in Aundh");
    assert_eq!(price, 30000);
    assert_eq!(city, "Pune");
    assert_eq!(flow_type, "residential_rent");

    let session = db.with_conn(|conn| load_session(conn, owner)).unwrap();
    assert!(session.is_none());
}

#[test]
fn publishing_before_review_is_refused() {
    let db = init_test_db("wizard_early_publish");
    let (_, token) = sign_in(&db, "early@example.com");
    handle(get(BASE, Some(&token)), &db, &test_config()).unwrap();

    let err = expect_err(handle(
        post_form(
            &step("res_rent_basic_details"),
            &token,
            &[("action", "publish")],
        ),
        &db,
        &test_config(),
    ));
    assert!(matches!(
        err,
        ServerError::Wizard(WizardError::PublishRequiresReview)
    ));
    assert_eq!(error_to_response(err).status(), 409);
}

#[test]
fn switching_flows_drops_sections_of_the_old_flow_on_save() {
    let db = init_test_db("wizard_switch");
    let (owner, token) = sign_in(&db, "switch@example.com");
    let config = test_config();

    let coworking = "/properties/list/commercial/coworking";
    handle(get(coworking, Some(&token)), &db, &config).unwrap();
    let resp = handle(
        post_form(
            &format!("{coworking}/coworking_basic_details"),
            &token,
            &[("totalSeats", "60"), ("action", "next")],
        ),
        &db,
        &config,
    )
    .unwrap();
    assert_eq!(resp.status(), 422);

    // Owner changes their mind; typed values stay in the session for now.
    let resp = handle(get(BASE, Some(&token)), &db, &config).unwrap();
    assert_eq!(location(&resp), step("res_rent_basic_details"));
    let session = db
        .with_conn(|conn| load_session(conn, owner))
        .unwrap()
        .unwrap();
    assert_eq!(session.flow, Some(FlowType::ResidentialRent));
    assert_eq!(session.stage, Stage::Step { index: 0 });
    assert!(session.form.steps.contains_key("coworking_basic_details"));

    let resp = handle(
        post_form(
            &step("res_rent_basic_details"),
            &token,
            &[("propertyType", "Apartment"), ("action", "save_draft")],
        ),
        &db,
        &config,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).ends_with("&status=draft"));

    let details: String = db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "select property_details from properties where owner_id = ?",
                params![owner],
                |r| r.get(0),
            )?)
        })
        .unwrap();
    let details: serde_json::Value = serde_json::from_str(&details).unwrap();
    assert!(details["steps"].get("coworking_basic_details").is_none());
    assert!(details["steps"]["res_rent_review"].is_object());
    assert_eq!(details["flow"]["flowType"], "residential_rent");
}

#[test]
fn unsupported_combination_is_a_bad_request() {
    let db = init_test_db("wizard_bad_flow");
    let (_, token) = sign_in(&db, "bad@example.com");

    let err = expect_err(handle(
        get("/properties/list/land/rent", Some(&token)),
        &db,
        &test_config(),
    ));
    assert!(matches!(err, ServerError::Flow(_)));
    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn land_flow_starts_at_plot_details() {
    let db = init_test_db("wizard_land");
    let (_, token) = sign_in(&db, "land@example.com");

    let resp = handle(
        get("/properties/list/land/sale", Some(&token)),
        &db,
        &test_config(),
    )
    .unwrap();
    assert_eq!(
        location(&resp),
        "/properties/list/land/sale/land_sale_basic_details"
    );
}
