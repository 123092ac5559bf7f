//! Persistence boundary for adverts
//!
//! Handlers only see [`AdvertCatalog`]. [`PgCatalog`] is the PostgreSQL
//! implementation wired in at startup.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::error::{DatabaseError, DatabaseOperation, Error, Result};
use crate::models::{Advert, AdvertField, CreateAdvert};

/// Capability interface for advert persistence
#[async_trait]
pub trait AdvertCatalog: Send + Sync {
    /// Fetch one advert with only the requested fields loaded
    ///
    /// An empty selection loads the default subset. A missing advert is
    /// [`Error::NotFound`], distinct from other failures.
    async fn fetch_one(&self, id: i64, fields: &[AdvertField]) -> Result<Advert>;

    /// Fetch every advert in storage order
    async fn fetch_all(&self) -> Result<Vec<Advert>>;

    /// Persist a new advert and return its assigned id
    async fn create(&self, advert: &CreateAdvert) -> Result<i64>;
}

/// [`AdvertCatalog`] backed by a PostgreSQL `adverts` table
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdvertCatalog for PgCatalog {
    async fn fetch_one(&self, id: i64, fields: &[AdvertField]) -> Result<Advert> {
        let fields = AdvertField::or_default(fields);
        let sql = format!(
            "SELECT {} FROM adverts WHERE id = $1",
            select_list(fields)
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(DatabaseOperation::Query, &e))?
            .ok_or_else(|| Error::NotFound(format!("no advert with id {id}")))?;

        let mut advert = advert_from_row(&row, fields)?;
        advert.id = id;
        Ok(advert)
    }

    async fn fetch_all(&self) -> Result<Vec<Advert>> {
        let fields = AdvertField::DEFAULT;
        let sql = format!(
            "SELECT id::bigint AS id, {} FROM adverts",
            select_list(&fields)
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(DatabaseOperation::Query, &e))?;

        rows.iter()
            .map(|row| -> Result<Advert> {
                let mut advert = advert_from_row(row, &fields)?;
                advert.id = row.try_get("id")?;
                Ok(advert)
            })
            .collect()
    }

    async fn create(&self, advert: &CreateAdvert) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO adverts (title, ad_description, price, photos) \
             VALUES ($1, $2, $3, $4) RETURNING id::bigint",
        )
        .bind(&advert.title)
        .bind(&advert.ad_description)
        .bind(advert.price)
        .bind(&advert.photos)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(DatabaseOperation::Insert, &e))?;

        tracing::debug!(id, "Advert inserted");
        Ok(id)
    }
}

/// Select list for `fields`; names come from the closed [`AdvertField`] set
fn select_list(fields: &[AdvertField]) -> String {
    fields
        .iter()
        .map(|field| match field {
            AdvertField::Price => "price::bigint AS price",
            other => other.as_str(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn advert_from_row(row: &PgRow, fields: &[AdvertField]) -> Result<Advert> {
    let mut advert = Advert::default();
    for field in fields {
        let column = field.as_str();
        match field {
            AdvertField::Title => advert.title = row.try_get(column)?,
            AdvertField::Description => advert.description = row.try_get(column)?,
            AdvertField::Price => advert.price = row.try_get(column)?,
            AdvertField::Photos => {
                let photos: Option<Vec<String>> = row.try_get(column)?;
                advert.photos = photos.unwrap_or_default();
            }
        }
    }
    Ok(advert)
}
