// src/db/wizard_sessions.rs
use crate::errors::ServerError;
use crate::wizard::WizardSession;
use rusqlite::{params, Connection, OptionalExtension};

/// The owner's in-progress wizard, if any. A blob that no longer parses is
/// discarded so the owner can start over.
pub fn load_session(conn: &Connection, owner_id: i64) -> Result<Option<WizardSession>, ServerError> {
    let raw: Option<String> = conn
        .query_row(
            "select state from wizard_sessions where owner_id = ?",
            params![owner_id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select wizard session failed: {e}")))?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(owner_id, %err, "discarding unreadable wizard session");
            clear_session(conn, owner_id)?;
            Ok(None)
        }
    }
}

pub fn save_session(
    conn: &Connection,
    owner_id: i64,
    session: &WizardSession,
    now: i64,
) -> Result<(), ServerError> {
    let state = serde_json::to_string(session)?;
    conn.execute(
        r#"
        insert into wizard_sessions (owner_id, state, updated_at)
        values (?, ?, ?)
        on conflict(owner_id) do update set state = excluded.state, updated_at = excluded.updated_at
        "#,
        params![owner_id, state, now],
    )
    .map_err(|e| ServerError::DbError(format!("save wizard session failed: {e}")))?;
    Ok(())
}

pub fn clear_session(conn: &Connection, owner_id: i64) -> Result<(), ServerError> {
    conn.execute(
        "delete from wizard_sessions where owner_id = ?",
        params![owner_id],
    )
    .map_err(|e| ServerError::DbError(format!("clear wizard session failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::get_or_create_user;
    use crate::domain::flow::FlowType;

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        let owner = get_or_create_user(&conn, "owner@example.com", 1000).unwrap();
        (conn, owner)
    }

    #[test]
    fn save_then_load_returns_the_same_session() {
        let (conn, owner) = setup();
        assert_eq!(load_session(&conn, owner).unwrap(), None);

        let mut session = WizardSession::for_flow(FlowType::CommercialRent);
        session
            .update_step("com_rent_basic_details", [("floor", "3")])
            .unwrap();
        save_session(&conn, owner, &session, 1000).unwrap();
        assert_eq!(load_session(&conn, owner).unwrap(), Some(session.clone()));

        session.select_flow(FlowType::LandSale).unwrap();
        save_session(&conn, owner, &session, 1001).unwrap();
        assert_eq!(
            load_session(&conn, owner).unwrap().and_then(|s| s.flow),
            Some(FlowType::LandSale)
        );
    }

    #[test]
    fn clear_removes_the_session() {
        let (conn, owner) = setup();
        save_session(&conn, owner, &WizardSession::new(), 1000).unwrap();
        clear_session(&conn, owner).unwrap();
        assert_eq!(load_session(&conn, owner).unwrap(), None);
    }

    #[test]
    fn unreadable_state_is_discarded() {
        let (conn, owner) = setup();
        conn.execute(
            "insert into wizard_sessions (owner_id, state, updated_at) values (?, ?, ?)",
            params![owner, "{\"stage\":\"warp\"}", 1000],
        )
        .unwrap();

        assert_eq!(load_session(&conn, owner).unwrap(), None);
        let left: i64 = conn
            .query_row("select count(*) from wizard_sessions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(left, 0);
    }
}
