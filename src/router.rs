use crate::auth::{load_owner_from_session, Owner};
use crate::config::AppConfig;
use crate::db::properties::{find_owned_property, list_owner_properties};
use crate::db::wizard_sessions::{clear_session, load_session, save_session};
use crate::db::Database;
use crate::domain::detector::{detect, FlowSignals};
use crate::domain::flow::{FlowType, StepKind};
use crate::domain::property::ListingStatus;
use crate::errors::ServerError;
use crate::responses::{html_response, html_response_with_status, redirect, ResultResp};
use crate::templates::pages::{self, MyListingsVm, StepPageVm};
use crate::wizard::{StepValidationError, SubmitAction, WizardError, WizardSession};
use astra::Request;
use std::collections::HashMap;
use std::io::Read;

pub fn handle(req: Request, db: &Database, config: &AppConfig) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => html_response(pages::home_page(&config.site)),
        ("GET", ["properties", "list"]) => type_selection(&req, db, config),
        ("GET", ["properties", "list", category, listing_type]) => {
            start_wizard(&req, db, config, category, listing_type)
        }
        ("GET", ["properties", "list", category, listing_type, step_id]) => {
            show_step(&req, db, config, (*category, *listing_type), step_id)
        }
        ("POST", ["properties", "list", category, listing_type, step_id]) => {
            post_step(req, db, config, (*category, *listing_type), step_id)
        }
        ("GET", ["properties", "mine"]) => my_listings(&req, db, config),
        ("GET", ["properties", id, "edit"]) => edit_listing(&req, db, config, id),
        _ => Err(ServerError::NotFound),
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_form(req: Request) -> Result<Vec<(String, String)>, ServerError> {
    let mut body = String::new();
    req.into_body()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
    Ok(url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect())
}

fn session_token<'a>(req: &'a Request, cookie_name: &str) -> Option<&'a str> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
}

fn require_owner(req: &Request, db: &Database, config: &AppConfig) -> Result<Owner, ServerError> {
    let token = session_token(req, &config.auth.session_cookie)
        .ok_or_else(|| ServerError::Unauthorized("sign in to manage your listings".into()))?;
    db.with_conn(|conn| load_owner_from_session(conn, token, now_unix()))?
        .ok_or_else(|| ServerError::Unauthorized("your session has expired".into()))
}

/// Resolves the flow named by the URL. A `flowType` query value takes precedence.
fn flow_from_request(req: &Request, (category, listing_type): (&str, &str)) -> Result<FlowType, ServerError> {
    let query = parse_query(req);
    let detection = detect(&FlowSignals {
        category: Some(category),
        listing_type: Some(listing_type),
        flow_type: query.get("flowType").map(String::as_str),
        path: Some(req.uri().path()),
    })?;
    Ok(detection.flow)
}

/// Where an open session currently is.
fn current_path(session: &WizardSession) -> Option<String> {
    let flow = session.flow?;
    let step = session.current_step()?;
    Some(flow.step_path(step.id))
}

fn type_selection(req: &Request, db: &Database, config: &AppConfig) -> ResultResp {
    let owner = require_owner(req, db, config)?;
    let session = db.with_conn(|conn| load_session(conn, owner.id))?;

    let resume = session
        .filter(|s| !s.is_submitted())
        .and_then(|s| Some((s.flow?, current_path(&s)?)));

    html_response(pages::type_selection_page(&config.site, &owner.email, resume))
}

fn start_wizard(
    req: &Request,
    db: &Database,
    config: &AppConfig,
    category: &str,
    listing_type: &str,
) -> ResultResp {
    let owner = require_owner(req, db, config)?;
    let flow = flow_from_request(req, (category, listing_type))?;

    let target = db.with_conn(|conn| {
        let session = match load_session(conn, owner.id)? {
            Some(session) if !session.is_submitted() && session.flow == Some(flow) => session,
            // A stored listing keeps its type; another type means a new listing.
            Some(session) if session.mode.property_id().is_some() => {
                tracing::info!(
                    owner_id = owner.id,
                    property_id = session.mode.property_id(),
                    flow = %flow,
                    "leaving edit mode for a new listing"
                );
                WizardSession::for_flow(flow)
            }
            Some(mut session) if !session.is_submitted() => {
                session.select_flow(flow)?;
                session
            }
            _ => WizardSession::for_flow(flow),
        };
        save_session(conn, owner.id, &session, now_unix())?;
        current_path(&session).ok_or(ServerError::InternalError)
    })?;

    redirect(&target)
}

/// Loads the owner's session for `flow`, or the path to send them to instead.
fn open_session(
    db: &Database,
    owner: &Owner,
    flow: FlowType,
) -> Result<Result<WizardSession, String>, ServerError> {
    let session = db.with_conn(|conn| load_session(conn, owner.id))?;
    Ok(match session {
        Some(session) if !session.is_submitted() && session.flow == Some(flow) => Ok(session),
        _ => Err(flow.wizard_path()),
    })
}

fn show_step(
    req: &Request,
    db: &Database,
    config: &AppConfig,
    parts: (&str, &str),
    step_id: &str,
) -> ResultResp {
    let owner = require_owner(req, db, config)?;
    let flow = flow_from_request(req, parts)?;
    let mut session = match open_session(db, &owner, flow)? {
        Ok(session) => session,
        Err(start) => return redirect(&start),
    };

    match session.jump_to(step_id) {
        Ok(_) => {}
        Err(WizardError::StepNotReached(_)) => {
            let back = current_path(&session).unwrap_or_else(|| flow.wizard_path());
            return redirect(&back);
        }
        Err(WizardError::UnknownStep(_)) => return Err(ServerError::NotFound),
        Err(err) => return Err(err.into()),
    }
    db.with_conn(|conn| save_session(conn, owner.id, &session, now_unix()))?;

    render_step(config, &owner, &session, StepFeedback::default())
}

fn post_step(
    req: Request,
    db: &Database,
    config: &AppConfig,
    parts: (&str, &str),
    step_id: &str,
) -> ResultResp {
    let owner = require_owner(&req, db, config)?;
    let flow = flow_from_request(&req, parts)?;
    let mut session = match open_session(db, &owner, flow)? {
        Ok(session) => session,
        Err(start) => return redirect(&start),
    };

    let form = read_form(req)?;
    let action = form
        .iter()
        .find(|(key, _)| key == "action")
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| "next".to_string());

    session.jump_to(step_id)?;
    session.update_step(step_id, form.iter().filter(|(key, _)| key != "action").map(|(k, v)| (k, v)))?;

    let now = now_unix();
    match action.as_str() {
        "next" => match session.advance() {
            Ok(transition) => {
                db.with_conn(|conn| save_session(conn, owner.id, &session, now))?;
                redirect(&flow.step_path(transition.to.id))
            }
            Err(WizardError::Validation(invalid)) => {
                db.with_conn(|conn| save_session(conn, owner.id, &session, now))?;
                render_step(
                    config,
                    &owner,
                    &session,
                    StepFeedback {
                        status: 422,
                        invalid: Some(&invalid),
                        ..Default::default()
                    },
                )
            }
            Err(err) => Err(err.into()),
        },
        "previous" => {
            let transition = session.retreat()?;
            db.with_conn(|conn| save_session(conn, owner.id, &session, now))?;
            redirect(&flow.step_path(transition.to.id))
        }
        "save_draft" | "publish" => {
            let submit_action = if action == "publish" {
                SubmitAction::Publish
            } else {
                SubmitAction::SaveDraft
            };
            let defaults = config.wizard.publish_defaults();

            let outcome = db.with_conn(|conn| {
                let result = session.submit(conn, owner.id, submit_action, &defaults, now);
                match &result {
                    Ok(_) => clear_session(conn, owner.id)?,
                    Err(_) => save_session(conn, owner.id, &session, now)?,
                }
                Ok(result)
            })?;

            match outcome {
                Ok(submission) => redirect(&format!(
                    "/properties/mine?saved={}&status={}",
                    submission.property_id, submission.status
                )),
                Err(err @ ServerError::Wizard(_)) => Err(err),
                Err(err) => {
                    let message = match &err {
                        ServerError::NotFound => {
                            "This listing no longer exists or belongs to another account.".to_string()
                        }
                        _ => "Your listing could not be saved. Nothing was lost, please try again.".to_string(),
                    };
                    render_step(
                        config,
                        &owner,
                        &session,
                        StepFeedback {
                            status: err.status_code(),
                            error: Some(message.as_str()),
                            ..Default::default()
                        },
                    )
                }
            }
        }
        other => Err(ServerError::BadRequest(format!("unknown action `{other}`"))),
    }
}

#[derive(Default)]
struct StepFeedback<'a> {
    status: u16,
    invalid: Option<&'a StepValidationError>,
    error: Option<&'a str>,
    notice: Option<&'a str>,
}

fn render_step(
    config: &AppConfig,
    owner: &Owner,
    session: &WizardSession,
    feedback: StepFeedback<'_>,
) -> ResultResp {
    let flow = session.flow.ok_or(WizardError::NoFlowSelected)?;
    let index = session.stage.index().ok_or(WizardError::Closed)?;
    let step = session.current_step().ok_or(ServerError::InternalError)?;

    let vm = StepPageVm {
        site: &config.site,
        owner_email: &owner.email,
        session,
        flow,
        step,
        index,
        invalid: feedback.invalid,
        error: feedback.error,
        notice: feedback.notice,
    };
    let markup = if step.kind == StepKind::Review {
        pages::review_page(&vm)
    } else {
        pages::wizard_step_page(&vm)
    };

    match feedback.status {
        0 | 200 => html_response(markup),
        status => html_response_with_status(status, markup),
    }
}

fn my_listings(req: &Request, db: &Database, config: &AppConfig) -> ResultResp {
    let owner = require_owner(req, db, config)?;
    let listings = db.with_conn(|conn| list_owner_properties(conn, owner.id))?;

    let query = parse_query(req);
    let notice = match query.get("status").and_then(|s| s.parse::<ListingStatus>().ok()) {
        Some(ListingStatus::Published) => Some("Your listing is live.".to_string()),
        Some(ListingStatus::Draft) => Some("Draft saved. You can finish it any time.".to_string()),
        None => None,
    };

    html_response(pages::my_listings_page(&MyListingsVm {
        site: &config.site,
        owner_email: &owner.email,
        listings: &listings,
        notice,
    }))
}

fn edit_listing(req: &Request, db: &Database, config: &AppConfig, id: &str) -> ResultResp {
    let owner = require_owner(req, db, config)?;
    let id: i64 = id.parse().map_err(|_| ServerError::NotFound)?;

    let target = db.with_conn(|conn| {
        let stored = find_owned_property(conn, id, owner.id)?.ok_or(ServerError::NotFound)?;
        let session = WizardSession::edit(stored);
        save_session(conn, owner.id, &session, now_unix())?;
        current_path(&session).ok_or(ServerError::InternalError)
    })?;

    tracing::info!(property_id = id, owner_id = owner.id, "editing listing");
    redirect(&target)
}
