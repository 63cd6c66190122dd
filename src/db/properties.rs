// src/db/properties.rs
use crate::domain::flow::FlowType;
use crate::domain::form::FormData;
use crate::domain::property::{ListingStatus, PropertyRecord, PropertySummary, StoredProperty};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// Upserts the listing as a draft and returns its id.
pub fn save_draft(
    conn: &Connection,
    owner_id: i64,
    record: &PropertyRecord,
    now: i64,
) -> Result<i64, ServerError> {
    upsert(conn, owner_id, record, ListingStatus::Draft, now)
}

/// Upserts the listing as published and returns its id.
pub fn save_and_publish(
    conn: &Connection,
    owner_id: i64,
    record: &PropertyRecord,
    now: i64,
) -> Result<i64, ServerError> {
    upsert(conn, owner_id, record, ListingStatus::Published, now)
}

/// Inserts when the record has no id, otherwise updates the row if `owner_id` owns it.
/// Someone else's id is reported as `NotFound`.
fn upsert(
    conn: &Connection,
    owner_id: i64,
    record: &PropertyRecord,
    status: ListingStatus,
    now: i64,
) -> Result<i64, ServerError> {
    let details = serde_json::to_string(&record.details)?;
    let published_at = (status == ListingStatus::Published).then_some(now);

    match record.id {
        None => {
            conn.execute(
                r#"
                insert into properties
                  (owner_id, title, price, city, locality, property_type, flow_type,
                   status, property_details, created_at, updated_at, published_at)
                values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    owner_id,
                    record.title,
                    record.price,
                    record.city,
                    record.locality,
                    record.property_type,
                    record.flow.key(),
                    status.as_str(),
                    details,
                    now,
                    now,
                    published_at,
                ],
            )
            .map_err(|e| ServerError::DbError(format!("insert property failed: {e}")))?;
            Ok(conn.last_insert_rowid())
        }
        Some(id) => {
            let updated = conn
                .execute(
                    r#"
                    update properties
                    set title = ?, price = ?, city = ?, locality = ?, property_type = ?,
                        flow_type = ?, status = ?, property_details = ?, updated_at = ?,
                        published_at = coalesce(?, published_at)
                    where id = ? and owner_id = ?
                    "#,
                    params![
                        record.title,
                        record.price,
                        record.city,
                        record.locality,
                        record.property_type,
                        record.flow.key(),
                        status.as_str(),
                        details,
                        now,
                        published_at,
                        id,
                        owner_id,
                    ],
                )
                .map_err(|e| ServerError::DbError(format!("update property failed: {e}")))?;

            if updated == 0 {
                return Err(ServerError::NotFound);
            }
            Ok(id)
        }
    }
}

/// Loads a listing for editing. Rows of other owners are invisible.
pub fn find_owned_property(
    conn: &Connection,
    id: i64,
    owner_id: i64,
) -> Result<Option<StoredProperty>, ServerError> {
    let row = conn
        .query_row(
            r#"
            select id, owner_id, flow_type, status, property_details, updated_at
            from properties
            where id = ? and owner_id = ?
            "#,
            params![id, owner_id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, i64>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select property failed: {e}")))?;

    let Some((id, owner_id, flow_type, status, details, updated_at)) = row else {
        return Ok(None);
    };

    let form: FormData = serde_json::from_str(&details)?;
    Ok(Some(StoredProperty {
        id,
        owner_id,
        flow: FlowType::from_key(&flow_type)?,
        status: parse_status(&status)?,
        form,
        updated_at,
    }))
}

/// Newest first.
pub fn list_owner_properties(
    conn: &Connection,
    owner_id: i64,
) -> Result<Vec<PropertySummary>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select id, title, flow_type, status, price, city, updated_at
            from properties
            where owner_id = ?
            order by updated_at desc, id desc
            "#,
        )
        .map_err(|e| ServerError::DbError(format!("prepare list properties failed: {e}")))?;

    let rows = stmt
        .query_map(params![owner_id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, Option<String>>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, Option<i64>>(4)?,
                r.get::<_, Option<String>>(5)?,
                r.get::<_, i64>(6)?,
            ))
        })
        .map_err(|e| ServerError::DbError(format!("list properties failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, title, flow_type, status, price, city, updated_at) =
            row.map_err(|e| ServerError::DbError(format!("read property row failed: {e}")))?;
        out.push(PropertySummary {
            id,
            title,
            flow: FlowType::from_key(&flow_type),
            status: parse_status(&status)?,
            price,
            city,
            updated_at,
        });
    }
    Ok(out)
}

fn parse_status(raw: &str) -> Result<ListingStatus, ServerError> {
    raw.parse().map_err(ServerError::DbError)
}
