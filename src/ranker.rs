//! # Proximity Ranker Module
//!
//! ## Purpose
//! Orders a bucket of candidate items against a query by a two-key comparator
//! and truncates to a bounded top-K slice. Pure: the shared bucket is never
//! sorted in place, so concurrent requests cannot race on its order.
//!
//! ## Input/Output Specification
//! - **Input**: Candidate items, a validated query, a result limit
//! - **Output**: At most `limit` item names, best match first
//! - **Comparator**: containment of the query term (descending) then
//!   great-circle distance (ascending), stable within equal keys
//!
//! ## Key Features
//! - Boolean containment partition: any containing item outranks any
//!   non-containing item regardless of distance
//! - Haversine distance on a spherical earth, not flat lat/lng Euclidean
//! - Truncation returns exactly the requested count, never one extra

use crate::classifier::normalize;
use crate::{Item, Query};

/// Mean earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rank candidates against the query, returning at most `limit` item names.
///
/// An empty candidate list yields an empty result; this function never fails.
pub fn rank(candidates: &[Item], query: &Query, limit: usize) -> Vec<String> {
    let term = normalize(&query.term);

    // Precompute the sort keys once, then stable-sort a scratch vector so the
    // shared bucket itself stays untouched.
    let mut keyed: Vec<(bool, f64, &Item)> = candidates
        .iter()
        .map(|item| {
            let contains = normalize(&item.name).contains(&term);
            let distance = haversine_km(
                item.latitude,
                item.longitude,
                query.latitude,
                query.longitude,
            );
            (contains, distance, item)
        })
        .collect();

    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.total_cmp(&b.1)));

    keyed
        .into_iter()
        .take(limit)
        .map(|(_, _, item)| item.name.clone())
        .collect()
}

/// Great-circle distance between two coordinate pairs, in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    // Floating-point error can push `a` past 1.0 for near-antipodal points;
    // clamp so asin stays in its domain instead of returning NaN.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}
