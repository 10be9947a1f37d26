use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::{Row, Postgres};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::filter::{ListParams, SelectBuilder};
use crate::middleware::AuthUser;
use crate::models::{Bootcamp, CreateBootcamp, UpdateBootcamp, PLACEHOLDER_PHOTO};
use crate::services::geocoder::GeoPoint;

const TABLE: &str = "bootcamps";

const INSERT_SQL: &str = r#"
    INSERT INTO bootcamps
        (id, user_id, name, description, website, phone, email, address,
         careers, housing, job_assistance, average_cost, latitude, longitude,
         photo, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    RETURNING *
"#;

// The authorization predicate rides inside the statement: the row is only
// touched when the requester owns it or the admin flag ($3) is set. This
// closes the race between a separate ownership check and the mutation.
const UPDATE_SQL: &str = r#"
    UPDATE bootcamps SET
        name = COALESCE($4, name),
        description = COALESCE($5, description),
        website = COALESCE($6, website),
        phone = COALESCE($7, phone),
        email = COALESCE($8, email),
        address = COALESCE($9, address),
        careers = COALESCE($10, careers),
        housing = COALESCE($11, housing),
        job_assistance = COALESCE($12, job_assistance),
        average_cost = COALESCE($13, average_cost)
    WHERE id = $1 AND (user_id = $2 OR $3)
    RETURNING *
"#;

const DELETE_SQL: &str = r#"
    DELETE FROM bootcamps
    WHERE id = $1 AND (user_id = $2 OR $3)
    RETURNING id
"#;

const UPDATE_PHOTO_SQL: &str = r#"
    UPDATE bootcamps SET photo = $4
    WHERE id = $1 AND (user_id = $2 OR $3)
    RETURNING id
"#;

// Great-circle distance expressed through the spherical law of cosines;
// $3 is the angular radius (distance / Earth radius) in radians. The
// LEAST/GREATEST clamp keeps acos in its domain against float rounding.
const RADIUS_SQL: &str = r#"
    SELECT * FROM bootcamps
    WHERE latitude IS NOT NULL AND longitude IS NOT NULL
      AND acos(LEAST(1.0, GREATEST(-1.0,
              sin(radians($1)) * sin(radians(latitude))
            + cos(radians($1)) * cos(radians(latitude))
            * cos(radians(longitude) - radians($2))))) <= $3
"#;

/// Store operations for bootcamp records. All statements run against the
/// shared pool from [`DatabaseManager`].
pub struct BootcampRepository;

impl BootcampRepository {
    /// Run the shaped list query plus a total count for pagination.
    ///
    /// Rows come back as JSON objects so a `select=` projection can drop
    /// columns without breaking a typed row mapping.
    pub async fn list(params: ListParams) -> Result<(Vec<Value>, i64), DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let builder = SelectBuilder::new(TABLE, params)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let select = builder
            .to_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let wrapped = format!("SELECT row_to_json(t) AS row FROM ({}) t", select.query);

        let mut query = sqlx::query(&wrapped);
        for p in select.params.iter() {
            query = bind_value(query, p);
        }
        let rows = query.fetch_all(&pool).await?;
        let data = rows
            .iter()
            .map(|row| row.try_get::<Value, _>("row"))
            .collect::<Result<Vec<_>, _>>()?;

        let count = builder
            .to_count_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let mut count_query = sqlx::query(&count.query);
        for p in count.params.iter() {
            count_query = bind_value(count_query, p);
        }
        let total: i64 = count_query.fetch_one(&pool).await?.try_get("count")?;

        Ok((data, total))
    }

    pub async fn find(id: Uuid) -> Result<Option<Bootcamp>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let bootcamp = sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?;
        Ok(bootcamp)
    }

    pub async fn exists(id: Uuid) -> Result<bool, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let row = sqlx::query("SELECT 1 AS one FROM bootcamps WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?;
        Ok(row.is_some())
    }

    /// Whether this user already owns a bootcamp (one-per-publisher rule)
    pub async fn owner_has_bootcamp(owner_id: Uuid) -> Result<bool, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let row = sqlx::query("SELECT 1 AS one FROM bootcamps WHERE user_id = $1 LIMIT 1")
            .bind(owner_id)
            .fetch_optional(&pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn insert(
        payload: &CreateBootcamp,
        owner_id: Uuid,
        location: Option<GeoPoint>,
    ) -> Result<Bootcamp, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let (latitude, longitude) = match location {
            Some(point) => (Some(point.latitude), Some(point.longitude)),
            None => (None, None),
        };

        let bootcamp = sqlx::query_as::<_, Bootcamp>(INSERT_SQL)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.website)
            .bind(&payload.phone)
            .bind(&payload.email)
            .bind(&payload.address)
            .bind(payload.careers.clone().unwrap_or_default())
            .bind(payload.housing.unwrap_or(false))
            .bind(payload.job_assistance.unwrap_or(false))
            .bind(payload.average_cost)
            .bind(latitude)
            .bind(longitude)
            .bind(PLACEHOLDER_PHOTO)
            .bind(Utc::now())
            .fetch_one(&pool)
            .await?;
        Ok(bootcamp)
    }

    /// Apply a partial update as a single conditional statement.
    /// Returns `None` when no row matched id + authorization predicate.
    pub async fn update_if_permitted(
        id: Uuid,
        changes: &UpdateBootcamp,
        user: &AuthUser,
    ) -> Result<Option<Bootcamp>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let bootcamp = sqlx::query_as::<_, Bootcamp>(UPDATE_SQL)
            .bind(id)
            .bind(user.id)
            .bind(user.role == crate::auth::Role::Admin)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.website)
            .bind(&changes.phone)
            .bind(&changes.email)
            .bind(&changes.address)
            .bind(&changes.careers)
            .bind(changes.housing)
            .bind(changes.job_assistance)
            .bind(changes.average_cost)
            .fetch_optional(&pool)
            .await?;
        Ok(bootcamp)
    }

    /// Permanently remove a record, gated by the same predicate as update.
    /// Returns false when no row matched. Dependent courses/reviews go with
    /// it via ON DELETE CASCADE at the schema level.
    pub async fn delete_if_permitted(id: Uuid, user: &AuthUser) -> Result<bool, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let row = sqlx::query(DELETE_SQL)
            .bind(id)
            .bind(user.id)
            .bind(user.role == crate::auth::Role::Admin)
            .fetch_optional(&pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn update_photo_if_permitted(
        id: Uuid,
        filename: &str,
        user: &AuthUser,
    ) -> Result<bool, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let row = sqlx::query(UPDATE_PHOTO_SQL)
            .bind(id)
            .bind(user.id)
            .bind(user.role == crate::auth::Role::Admin)
            .bind(filename)
            .fetch_optional(&pool)
            .await?;
        Ok(row.is_some())
    }

    /// All bootcamps whose location falls within the spherical cap centered
    /// at `center` with the given angular radius (radians).
    pub async fn within_radius(
        center: GeoPoint,
        angular_radius: f64,
    ) -> Result<Vec<Bootcamp>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let bootcamps = sqlx::query_as::<_, Bootcamp>(RADIUS_SQL)
            .bind(center.latitude)
            .bind(center.longitude)
            .bind(angular_radius)
            .fetch_all(&pool)
            .await?;
        Ok(bootcamps)
    }
}

fn bind_value<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays are expanded into individual placeholders by the filter
        // layer before binding; objects travel as JSONB
        Value::Array(_) => q,
        Value::Object(_) => q.bind(v.clone()),
    }
}
