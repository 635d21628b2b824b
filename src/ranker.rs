//! Distance ranking: order candidates by great-circle distance to a target.
//!
//! Pure and allocation-only. Candidates without a known coordinate are
//! dropped, never reported as errors. Distances are full precision; rounding
//! for display lives in [`crate::presentation`].

use crate::geo::{haversine_km, Coordinate};
use std::cmp::Ordering;

/// Something to be ranked: an opaque key plus its last known position.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<K> {
    pub key: K,
    pub coordinate: Option<Coordinate>,
}

impl<K> Candidate<K> {
    pub fn new(key: K, coordinate: Option<Coordinate>) -> Self {
        Self { key, coordinate }
    }

    pub fn located(key: K, lat: f64, lon: f64) -> Self {
        Self { key, coordinate: Some(Coordinate::new(lat, lon)) }
    }

    pub fn unlocated(key: K) -> Self {
        Self { key, coordinate: None }
    }
}

/// A candidate key paired with its distance to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub distance_km: f64,
}

/// Rank `candidates` by distance to `target`, closest first.
///
/// The sort is stable: equal distances keep their input order. NaN distances
/// (only possible with NaN input) go last.
pub fn rank_by_distance<K, I>(target: Coordinate, candidates: I) -> Vec<Ranked<K>>
where
    I: IntoIterator<Item = Candidate<K>>,
{
    let mut ranked: Vec<Ranked<K>> = candidates
        .into_iter()
        .filter_map(|c| {
            let coord = c.coordinate?;
            Some(Ranked { key: c.key, distance_km: haversine_km(&target, &coord) })
        })
        .collect();

    ranked.sort_by(|a, b| by_distance(a.distance_km, b.distance_km));
    ranked
}

/// Total order on distances with NaN after every number.
fn by_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// The single closest candidate, if any has a coordinate.
pub fn nearest<K, I>(target: Coordinate, candidates: I) -> Option<Ranked<K>>
where
    I: IntoIterator<Item = Candidate<K>>,
{
    let mut best: Option<Ranked<K>> = None;
    for c in candidates {
        let Some(coord) = c.coordinate else { continue };
        let d = haversine_km(&target, &coord);
        // Strict comparison keeps the earliest of equals.
        let closer = match &best {
            Some(b) => by_distance(d, b.distance_km).is_lt(),
            None => true,
        };
        if closer {
            best = Some(Ranked { key: c.key, distance_km: d });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

    #[test]
    fn test_equator_ties_keep_input_order() {
        let candidates = vec![
            Candidate::located("east", 0.0, 1.0),
            Candidate::located("north", 1.0, 0.0),
            Candidate::located("here", 0.0, 0.0),
        ];
        let ranked = rank_by_distance(ORIGIN, candidates);

        let keys: Vec<_> = ranked.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["here", "east", "north"]);
        assert_eq!(ranked[0].distance_km, 0.0);
        assert_abs_diff_eq!(ranked[1].distance_km, 111.19, epsilon = 0.01);
        assert_abs_diff_eq!(ranked[2].distance_km, 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_tie_order_follows_input_not_key() {
        let ranked = rank_by_distance(
            ORIGIN,
            vec![Candidate::located(2, 0.0, 5.0), Candidate::located(1, 0.0, -5.0)],
        );
        assert_eq!(ranked[0].key, 2);
        assert_eq!(ranked[1].key, 1);
    }

    #[test]
    fn test_empty() {
        let ranked: Vec<Ranked<u64>> = rank_by_distance(ORIGIN, Vec::new());
        assert!(ranked.is_empty());
        assert!(nearest::<u64, _>(ORIGIN, Vec::new()).is_none());
    }

    #[test]
    fn test_missing_coordinates_dropped() {
        let candidates = vec![
            Candidate::unlocated("ghost"),
            Candidate::new("half", Coordinate::from_parts(Some(12.0), None)),
            Candidate::located("mumbai", 19.0760, 72.8777),
        ];
        let ranked = rank_by_distance(Coordinate::new(28.6139, 77.2090), candidates);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].key, "mumbai");
        assert!(ranked[0].distance_km > 1150.0 && ranked[0].distance_km < 1165.0);
    }

    #[test]
    fn test_zero_coordinate_is_present() {
        let ranked = rank_by_distance(Coordinate::new(1.0, 1.0), vec![Candidate::located("null island", 0.0, 0.0)]);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_nan_sorts_last() {
        let ranked = rank_by_distance(
            ORIGIN,
            vec![
                Candidate::located("nan", f64::NAN, 0.0),
                Candidate::located("far", 10.0, 10.0),
                Candidate::located("near", 1.0, 1.0),
            ],
        );
        let keys: Vec<_> = ranked.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["near", "far", "nan"]);
        assert!(ranked[2].distance_km.is_nan());
    }

    #[test]
    fn test_nearest_matches_ranking_head() {
        let candidates = vec![
            Candidate::located("kolkata", 22.5726, 88.3639),
            Candidate::unlocated("unknown"),
            Candidate::located("jaipur", 26.9124, 75.7873),
            Candidate::located("bengaluru", 12.9716, 77.5946),
        ];
        let delhi = Coordinate::new(28.6139, 77.2090);
        let head = rank_by_distance(delhi, candidates.clone()).into_iter().next().unwrap();
        let best = nearest(delhi, candidates).unwrap();
        assert_eq!(best, head);
        assert_eq!(best.key, "jaipur");
    }

    #[test]
    fn test_nearest_prefers_first_of_equals() {
        let best = nearest(
            ORIGIN,
            vec![Candidate::located("a", 0.0, 1.0), Candidate::located("b", 1.0, 0.0)],
        )
        .unwrap();
        assert_eq!(best.key, "a");
    }

    fn maybe_coord() -> impl Strategy<Value = Option<Coordinate>> {
        proptest::option::of((-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(a, b)| Coordinate::new(a, b)))
    }

    proptest! {
        #[test]
        fn prop_length_and_order(
            target in (-90.0f64..=90.0, -180.0f64..=180.0),
            coords in proptest::collection::vec(maybe_coord(), 0..40),
        ) {
            let present = coords.iter().filter(|c| c.is_some()).count();
            let candidates: Vec<_> = coords.into_iter().enumerate().map(|(i, c)| Candidate::new(i, c)).collect();
            let ranked = rank_by_distance(Coordinate::new(target.0, target.1), candidates);

            prop_assert_eq!(ranked.len(), present);
            for w in ranked.windows(2) {
                prop_assert!(w[0].distance_km <= w[1].distance_km);
                if w[0].distance_km == w[1].distance_km {
                    prop_assert!(w[0].key < w[1].key);
                }
            }
        }
    }
}
