use crate::errors::ServerError;
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into an HTML error page with the matching status.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!(%err, status, "request failed");
    } else {
        tracing::debug!(%err, status, "request rejected");
    }

    let message = match &err {
        ServerError::DbError(_) | ServerError::Config(_) => {
            "Something went wrong on our side. Please try again.".to_string()
        }
        other => other.to_string(),
    };
    let body = error_page(status, &message).into_string();

    match ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(body))
    {
        Ok(resp) => resp,
        Err(_) => Response::new(Body::from("Internal Server Error")),
    }
}
