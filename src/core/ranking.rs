use std::cmp::Ordering;

use crate::models::CaregiverProfile;

/// Ordering of eligible caregivers in a match result
///
/// Ranking rules, in priority order:
/// 1. higher average rating first
/// 2. unrated caregivers after every rated one (an absent rating is never zero)
/// 3. more recently registered first
/// 4. caregiver id, so the order does not depend on the store's row order
pub fn compare_candidates(a: &CaregiverProfile, b: &CaregiverProfile) -> Ordering {
    compare_ratings(a.rating(), b.rating())
        .then_with(|| b.registered_at.cmp(&a.registered_at))
        .then_with(|| a.caregiver_id.cmp(&b.caregiver_id))
}

/// Descending order of ratings with `None` last
#[inline]
pub fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort candidates in place by [`compare_candidates`]
pub fn rank(candidates: &mut [CaregiverProfile]) {
    candidates.sort_by(compare_candidates);
}
