use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::services::geocoder::Geocoder;

/// Earth's mean radius in kilometers; dividing a distance by it yields
/// the angular radius of the spherical cap to search.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// GET /bootcamps/radius/:zipcode/:distance - Bootcamps within a radius
///
/// Public. The postal code is resolved through the geocoding provider
/// (first candidate wins), then the store is asked for every record
/// within the spherical cap.
pub async fn radius(
    Path((zipcode, distance)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let distance: f64 = distance
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ApiError::bad_request("Distance must be a non-negative number"))?;

    let center = Geocoder::from_config()?
        .geocode_postal_code(&zipcode)
        .await?;
    let angular_radius = distance / EARTH_RADIUS_KM;

    let bootcamps = BootcampRepository::within_radius(center, angular_radius).await?;

    Ok(Json(json!({
        "success": true,
        "count": bootcamps.len(),
        "data": bootcamps,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angular_radius_is_distance_over_earth_radius() {
        let angular = 10.0 / EARTH_RADIUS_KM;
        assert!((angular - 0.001567).abs() < 1e-5);

        // Zero distance degenerates to a point query
        assert_eq!(0.0 / EARTH_RADIUS_KM, 0.0);
    }
}
