//! Laundromat directory: every known NYC location, participating or not.
//!
//! Listing supports the explore view's filters (text search, borough,
//! minimum rating) and the map viewport. Filtering runs in memory over the
//! full ordered result set; the directory is small enough that the map and
//! list views share one fetch.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required, required_patch};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LaundromatRow {
    pub id: Uuid,
    pub laundromat_id: String,
    pub place_id: Option<String>,
    pub neighborhood: Option<String>,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub total_user_ratings: Option<i32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub accessible: Option<bool>,
    pub photo_reference: Option<String>,
    pub google_maps_url: Option<String>,
    pub top_review_text: Option<String>,
    pub top_review_rating: Option<f64>,
    pub top_review_author: Option<String>,
    pub original_query: Option<String>,
    pub borough: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewLaundromat {
    pub laundromat_id: Option<String>,
    pub name: String,
    pub place_id: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub total_user_ratings: Option<i32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub accessible: Option<bool>,
    pub photo_reference: Option<String>,
    pub google_maps_url: Option<String>,
    pub top_review_text: Option<String>,
    pub top_review_rating: Option<f64>,
    pub top_review_author: Option<String>,
    pub original_query: Option<String>,
    pub borough: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LaundromatPatch {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub total_user_ratings: Option<i32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub accessible: Option<bool>,
    pub photo_reference: Option<String>,
    pub google_maps_url: Option<String>,
    pub top_review_text: Option<String>,
    pub top_review_rating: Option<f64>,
    pub top_review_author: Option<String>,
    pub original_query: Option<String>,
    pub borough: Option<String>,
}

/// Explore-view filters. `borough = "all"` and `rating`-less queries match
/// everything; the bounding box applies only when all four edges are given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LaundromatFilter {
    pub search: Option<String>,
    pub borough: Option<String>,
    pub min_rating: Option<f64>,
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }
}

impl LaundromatFilter {
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Some(Bounds { south: self.south?, west: self.west?, north: self.north?, east: self.east? })
    }

    #[must_use]
    pub fn matches(&self, row: &LaundromatRow) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [row.name.as_str(), row.address.as_deref().unwrap_or_default()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(borough) = self.borough.as_deref().filter(|b| !b.is_empty() && *b != "all") {
            if row.borough.as_deref() != Some(borough) {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            if !row.rating.is_some_and(|rating| rating >= min_rating) {
                return false;
            }
        }

        if let Some(bounds) = self.bounds() {
            match (row.latitude, row.longitude) {
                (Some(lat), Some(lng)) if bounds.contains(lat, lng) => {}
                _ => return false,
            }
        }

        true
    }

    #[must_use]
    pub fn apply(&self, rows: Vec<LaundromatRow>) -> Vec<LaundromatRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

/// Marker payload for the clustered map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub laundromat_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub borough: Option<String>,
}

/// Markers for rows with usable coordinates; the rest are left off the map.
#[must_use]
pub fn map_markers(rows: &[LaundromatRow]) -> Vec<MapMarker> {
    rows.iter()
        .filter_map(|row| match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => Some(MapMarker {
                laundromat_id: row.laundromat_id.clone(),
                name: row.name.clone(),
                latitude,
                longitude,
                address: row.address.clone(),
                rating: row.rating,
                borough: row.borough.clone(),
            }),
            _ => None,
        })
        .collect()
}

// =============================================================================
// CRUD
// =============================================================================

/// All laundromats ordered by name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_laundromats(pool: &PgPool) -> Result<Vec<LaundromatRow>, RecordError> {
    let rows = sqlx::query_as::<_, LaundromatRow>("SELECT * FROM laundromats ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `laundromat_id`.
pub async fn get_laundromat(pool: &PgPool, laundromat_id: &str) -> Result<LaundromatRow, RecordError> {
    sqlx::query_as::<_, LaundromatRow>("SELECT * FROM laundromats WHERE laundromat_id = $1")
        .bind(laundromat_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("laundromat {laundromat_id}")))
}

/// Insert a laundromat. A missing `laundromat_id` is generated.
///
/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank name, or a database error
/// (e.g. duplicate `laundromat_id`).
pub async fn create_laundromat(pool: &PgPool, new: NewLaundromat) -> Result<LaundromatRow, RecordError> {
    let name = required("name", &new.name)?;
    let laundromat_id = key_or_generate(new.laundromat_id);

    let row = sqlx::query_as::<_, LaundromatRow>(
        r"INSERT INTO laundromats (
              laundromat_id, place_id, neighborhood, name, latitude, longitude, rating,
              total_user_ratings, address, phone, hours_of_operation, accessible,
              photo_reference, google_maps_url, top_review_text, top_review_rating,
              top_review_author, original_query, borough
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
          RETURNING *",
    )
    .bind(&laundromat_id)
    .bind(new.place_id)
    .bind(new.neighborhood)
    .bind(&name)
    .bind(new.latitude)
    .bind(new.longitude)
    .bind(new.rating)
    .bind(new.total_user_ratings)
    .bind(new.address)
    .bind(new.phone)
    .bind(new.hours_of_operation)
    .bind(new.accessible)
    .bind(new.photo_reference)
    .bind(new.google_maps_url)
    .bind(new.top_review_text)
    .bind(new.top_review_rating)
    .bind(new.top_review_author)
    .bind(new.original_query)
    .bind(new.borough)
    .fetch_one(pool)
    .await?;

    tracing::info!(%laundromat_id, "laundromat created");
    Ok(row)
}

/// Apply the fields present in `patch`.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `laundromat_id`.
pub async fn update_laundromat(
    pool: &PgPool,
    laundromat_id: &str,
    patch: LaundromatPatch,
) -> Result<LaundromatRow, RecordError> {
    let name = required_patch("name", patch.name.as_deref())?;

    let mut update = UpdateBuilder::new("laundromats");
    update
        .set("name", name)
        .set("place_id", patch.place_id)
        .set("neighborhood", patch.neighborhood)
        .set("latitude", patch.latitude)
        .set("longitude", patch.longitude)
        .set("rating", patch.rating)
        .set("total_user_ratings", patch.total_user_ratings)
        .set("address", patch.address)
        .set("phone", patch.phone)
        .set("hours_of_operation", patch.hours_of_operation)
        .set("accessible", patch.accessible)
        .set("photo_reference", patch.photo_reference)
        .set("google_maps_url", patch.google_maps_url)
        .set("top_review_text", patch.top_review_text)
        .set("top_review_rating", patch.top_review_rating)
        .set("top_review_author", patch.top_review_author)
        .set("original_query", patch.original_query)
        .set("borough", patch.borough);

    let mut query = update.finish("laundromat_id", laundromat_id);
    query
        .build_query_as::<LaundromatRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("laundromat {laundromat_id}")))
}

#[cfg(test)]
#[path = "laundromat_test.rs"]
mod tests;
