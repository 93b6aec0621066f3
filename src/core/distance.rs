use crate::models::{Candidate, GeoCoordinate};

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Slack added to the search radius to absorb provider imprecision
pub const RADIUS_SLACK_MILES: f64 = 1.0;

/// Meters per statute mile, for providers that take metric radii
pub const METERS_PER_MILE: f64 = 1609.344;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles. Any `NaN` input yields `NaN`.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Distance from `origin` to an optional location; missing locations are `NaN`
#[inline]
pub fn distance_to(origin: GeoCoordinate, location: Option<GeoCoordinate>) -> f64 {
    match location {
        Some(loc) => haversine_distance(
            origin.latitude,
            origin.longitude,
            loc.latitude,
            loc.longitude,
        ),
        None => f64::NAN,
    }
}

/// Check a computed distance against a radius bound (with slack)
#[inline]
pub fn is_within_radius(distance: f64, radius_miles: f64) -> bool {
    // NaN compares false, so invalid geometry never passes
    distance <= radius_miles + RADIUS_SLACK_MILES
}

/// Annotate candidates with their distance from `origin`, drop those outside
/// the radius bound, and sort nearest first.
///
/// The sort is stable, so equidistant candidates keep provider order.
pub fn filter_by_distance(
    origin: GeoCoordinate,
    radius_miles: f64,
    candidates: Vec<Candidate>,
) -> Vec<Candidate> {
    let mut nearby: Vec<Candidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            candidate.distance = distance_to(origin, candidate.location);
            candidate
        })
        .filter(|candidate| is_within_radius(candidate.distance, radius_miles))
        .collect();

    nearby.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoCoordinate = GeoCoordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    /// Point `miles` due north of NYC
    fn north_of_nyc(miles: f64) -> GeoCoordinate {
        let delta = (miles / EARTH_RADIUS_MILES).to_degrees();
        GeoCoordinate::new(NYC.latitude + delta, NYC.longitude)
    }

    fn candidate(name: &str, location: Option<GeoCoordinate>) -> Candidate {
        Candidate {
            place_id: None,
            name: name.to_string(),
            address: None,
            location,
            distance: f64::NAN,
            photo_reference: None,
            icon: None,
        }
    }

    #[test]
    fn test_haversine_distance() {
        // London to Paris is approximately 214 miles
        let distance = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((distance - 214.0).abs() < 5.0, "Distance should be ~214mi, got {}", distance);
    }

    #[test]
    fn test_missing_location_is_nan() {
        assert!(distance_to(NYC, None).is_nan());
    }

    #[test]
    fn test_radius_slack() {
        assert!(is_within_radius(6.0, 5.0));
        assert!(!is_within_radius(6.3, 5.0));
        assert!(!is_within_radius(f64::NAN, 5.0));
    }

    #[test]
    fn test_filter_by_distance_scenario() {
        let candidates = vec![
            candidate("far", Some(north_of_nyc(6.3))),
            candidate("near", Some(north_of_nyc(4.2))),
            candidate("edge", Some(north_of_nyc(5.9))),
            candidate("nowhere", None),
        ];

        let result = filter_by_distance(NYC, 5.0, candidates);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["near", "edge"]);
        assert!((result[0].distance - 4.2).abs() < 0.01);
    }

    #[test]
    fn test_zero_radius_keeps_within_one_mile() {
        let candidates = vec![
            candidate("here", Some(NYC)),
            candidate("close", Some(north_of_nyc(0.8))),
            candidate("beyond", Some(north_of_nyc(1.5))),
        ];

        let result = filter_by_distance(NYC, 0.0, candidates);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "here");
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let spot = Some(north_of_nyc(2.0));
        let candidates = vec![
            candidate("first", spot),
            candidate("second", spot),
            candidate("closer", Some(north_of_nyc(1.0))),
        ];

        let result = filter_by_distance(NYC, 5.0, candidates);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["closer", "first", "second"]);
    }
}
