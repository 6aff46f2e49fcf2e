//! Handler for the random quote page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::instrument;

use crate::config::MSG_NO_QUOTES;
use crate::error::{plain_text, AppError};
use crate::selection::{select_random_quote, Selection};
use crate::state::AppState;
use crate::templates::render_quote;

/// Serve one uniformly chosen quote as an HTML fragment.
///
/// An empty table is not an error and answers 200 with a plain-text notice.
#[instrument(name = "quote::random", skip(state))]
pub async fn random(State(state): State<AppState>) -> Result<Response, AppError> {
    let store = state.store()?;
    let database = &state.config.database;

    let selection =
        select_random_quote(store.as_ref(), database.selection, database.query_timeout()).await?;

    match selection {
        Selection::Empty => Ok(plain_text(StatusCode::OK, MSG_NO_QUOTES)),
        Selection::Found(quote) => {
            tracing::debug!(quote_id = quote.id, "Serving quote");
            let html = render_quote(&state.tera, &quote)?;
            Ok(Html(html).into_response())
        }
    }
}
