//! Advert request handlers
//!
//! Handlers return [`Result`]; status codes for failures are decided once,
//! in the error type's `IntoResponse`.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{Error, Result},
    models::{CreateAdvert, CreatedResponse},
    query::{GetQuery, ListQuery},
    sorting::sort_adverts,
    state::AppState,
};

/// `GET /adverts/{id}`
///
/// Success is answered with 302 Found and the selected fields.
pub async fn get_advert(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
    query: GetQuery,
) -> Result<impl IntoResponse> {
    let Path(id) = id.map_err(|e| Error::BadRequest(e.body_text()))?;
    let id: i64 = id
        .parse()
        .map_err(|_| Error::BadRequest(format!("advert id should be an integer, got '{id}'")))?;
    let selection = query.validate()?;

    let mut advert = state.catalog().fetch_one(id, selection.fields()).await?;
    if !selection.wants_all_photos() {
        advert.truncate_photos();
    }

    Ok((StatusCode::FOUND, Json(advert)))
}

/// `GET /adverts`
///
/// Field selection is not supported here; photos are always cut to the
/// first link.
pub async fn list_adverts(
    State(state): State<AppState>,
    query: ListQuery,
) -> Result<impl IntoResponse> {
    let params = query.validate()?;

    let mut adverts = state.catalog().fetch_all().await?;
    adverts.iter_mut().for_each(|advert| advert.truncate_photos());
    sort_adverts(&mut adverts, params.sort);

    let (start, end) = params.page.window(adverts.len());
    let page = adverts.drain(start..end).collect::<Vec<_>>();

    Ok((StatusCode::FOUND, Json(page)))
}

/// `POST /advert`
///
/// The body is decoded by hand so that every malformed or oversized
/// payload is a 400, whatever its content type.
pub async fn create_advert(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse> {
    let body = body.map_err(|e| Error::BadRequest(format!("invalid advert body: {e}")))?;
    let advert: CreateAdvert = serde_json::from_slice(&body)
        .map_err(|e| Error::BadRequest(format!("invalid advert body: {e}")))?;
    advert.validate().map_err(Error::BadRequest)?;

    let id = state.catalog().create(&advert).await?;
    tracing::info!(id, "Advert created");

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(id))))
}
