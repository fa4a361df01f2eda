use async_trait::async_trait;
use realty_core::models::{Listing, NearbyQuery, NewListing, TransactionType};
use realty_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const LISTING_COLUMNS: &str = "id, slug, owner_id, title, address, formatted_address, \
    display_name, longitude, latitude, property_type, transaction_type, price, bedrooms, \
    bathrooms, car_spaces, land_size, land_size_unit, description, features, nearby, \
    inspection_time, photos, published, status, views, created_at, updated_at";

/// Mean Earth radius used by the great-circle distance in [`PgListingRepository::find_nearby`].
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Listing persistence
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert a listing. A slug collision yields `AppError::Conflict`.
    async fn create(&self, listing: NewListing) -> Result<Listing, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, AppError>;

    /// Published listings matching the query's transaction and property type,
    /// excluding `exclude_id`, within `radius_meters`, nearest first.
    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<Listing>, AppError>;

    /// One page of published listings, newest first, plus the total count.
    async fn list_by_transaction(
        &self,
        transaction_type: TransactionType,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Listing>, i64), AppError>;

    async fn increment_views(&self, id: Uuid) -> Result<(), AppError>;

    /// Connectivity probe for health checks.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Rows skipped before `page` (1-based).
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size.max(1))
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    (total.max(0) + page_size - 1) / page_size
}

/// Repository for listings
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgListingRepository {
    #[tracing::instrument(skip(self, listing), fields(db.table = "listings", db.operation = "insert", slug = %listing.slug))]
    async fn create(&self, listing: NewListing) -> Result<Listing, AppError> {
        let sql = format!(
            r#"
            INSERT INTO listings (
                slug, owner_id, title, address, formatted_address, display_name,
                longitude, latitude, property_type, transaction_type, price,
                bedrooms, bathrooms, car_spaces, land_size, land_size_unit,
                description, features, nearby, inspection_time, photos, published, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );

        let result = sqlx::query_as::<Postgres, Listing>(&sql)
            .bind(&listing.slug)
            .bind(listing.owner_id)
            .bind(&listing.title)
            .bind(&listing.address)
            .bind(&listing.formatted_address)
            .bind(&listing.display_name)
            .bind(listing.location.longitude)
            .bind(listing.location.latitude)
            .bind(listing.property_type)
            .bind(listing.transaction_type)
            .bind(&listing.price)
            .bind(listing.bedrooms)
            .bind(listing.bathrooms)
            .bind(listing.car_spaces)
            .bind(listing.land_size)
            .bind(&listing.land_size_unit)
            .bind(&listing.description)
            .bind(&listing.features)
            .bind(&listing.nearby)
            .bind(&listing.inspection_time)
            .bind(&listing.photos)
            .bind(listing.published)
            .bind(listing.status)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!(slug = %listing.slug, "Listing slug already exists");
                Err(AppError::Conflict(
                    "This property already exists".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "listings", db.operation = "select"))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, AppError> {
        let sql = format!("SELECT {} FROM listings WHERE slug = $1", LISTING_COLUMNS);
        let listing = sqlx::query_as::<Postgres, Listing>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    #[tracing::instrument(skip(self), fields(db.table = "listings", db.operation = "select"))]
    async fn find_nearby(&self, query: NearbyQuery) -> Result<Vec<Listing>, AppError> {
        // Haversine form of the great-circle distance, clamped against rounding
        // pushing the asin argument past 1.
        let sql = format!(
            r#"
            SELECT * FROM (
                SELECT {columns},
                    2 * $1 * ASIN(LEAST(1.0, SQRT(
                        POWER(SIN(RADIANS(latitude - $2) / 2), 2)
                        + COS(RADIANS($2)) * COS(RADIANS(latitude))
                        * POWER(SIN(RADIANS(longitude - $3) / 2), 2)
                    ))) AS distance_meters
                FROM listings
                WHERE published = TRUE
                  AND transaction_type = $4
                  AND property_type = $5
                  AND id <> $6
            ) candidates
            WHERE distance_meters <= $7
            ORDER BY distance_meters ASC
            LIMIT $8
            "#,
            columns = LISTING_COLUMNS
        );

        let related = sqlx::query_as::<Postgres, Listing>(&sql)
            .bind(EARTH_RADIUS_METERS)
            .bind(query.near.latitude)
            .bind(query.near.longitude)
            .bind(query.transaction_type)
            .bind(query.property_type)
            .bind(query.exclude_id)
            .bind(query.radius_meters)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(related)
    }

    #[tracing::instrument(skip(self), fields(db.table = "listings", db.operation = "select"))]
    async fn list_by_transaction(
        &self,
        transaction_type: TransactionType,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Listing>, i64), AppError> {
        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM listings WHERE published = TRUE AND transaction_type = $1",
        )
        .bind(transaction_type)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM listings WHERE published = TRUE AND transaction_type = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            LISTING_COLUMNS
        );
        let listings = sqlx::query_as::<Postgres, Listing>(&sql)
            .bind(transaction_type)
            .bind(page_size)
            .bind(page_offset(page, page_size))
            .fetch_all(&self.pool)
            .await?;

        Ok((listings, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "listings", db.operation = "update", db.record_id = %id))]
    async fn increment_views(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE listings SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
