use serde::Serialize;
use std::sync::Arc;

use crate::core::{error::CoreError, filters::is_eligible, ranking::rank};
use crate::models::{CaregiverProfile, SearchRequest};
use crate::services::{CaregiverQuery, RecordStore};

/// One caregiver in a match result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCaregiver {
    /// 1-based position in the result
    pub rank: usize,
    /// Rating the caregiver was ranked by; `None` when unrated
    pub score: Option<f64>,
    pub caregiver: CaregiverProfile,
}

/// Result of the matching process
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matches: Vec<RankedCaregiver>,
    pub count: usize,
    /// Profiles the store returned before the eligibility filters ran
    pub total_candidates: usize,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Matching engine - implements the caregiver selection pipeline
///
/// # Pipeline Stages
/// 1. Sector + active pre-filter (pushed down to the record store)
/// 2. Availability filter on the exact {day, time-slot}
/// 3. Gender-preference filter
/// 4. Ranking: rating descending, unrated last, newest registration first
#[derive(Clone)]
pub struct Matcher {
    store: Arc<dyn RecordStore>,
}

impl Matcher {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Find and rank the caregivers matching a search request
    ///
    /// An empty result is a success. Store failures are returned as
    /// [`CoreError::StoreUnavailable`] and never turned into an empty result.
    pub async fn search(&self, request: &SearchRequest) -> Result<MatchResult, CoreError> {
        tracing::debug!(
            "Searching caregivers: sector={}, day={}, slot={}, preference={}, marital_status={:?}",
            request.sector,
            request.day,
            request.time_slot,
            request.caregiver_preference,
            request.marital_status,
        );

        let candidates = self
            .store
            .find_caregivers(&CaregiverQuery::active_in(request.sector))
            .await?;

        let result = Self::rank_candidates(request, candidates);

        tracing::info!(
            "Matched {} of {} caregivers in sector {}",
            result.count,
            result.total_candidates,
            request.sector
        );

        Ok(result)
    }

    /// Apply the eligibility filters and the ranking to an already fetched
    /// candidate list
    pub fn rank_candidates(request: &SearchRequest, candidates: Vec<CaregiverProfile>) -> MatchResult {
        let total_candidates = candidates.len();

        let mut eligible: Vec<CaregiverProfile> = candidates
            .into_iter()
            .filter(|profile| is_eligible(profile, request))
            .collect();

        rank(&mut eligible);

        let matches: Vec<RankedCaregiver> = eligible
            .into_iter()
            .enumerate()
            .map(|(i, caregiver)| RankedCaregiver {
                rank: i + 1,
                score: caregiver.rating(),
                caregiver,
            })
            .collect();

        MatchResult {
            count: matches.len(),
            matches,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilitySlot, Day, Gender, GenderPreference, Sector, TimeSlot};
    use crate::services::{InMemoryStore, SeedData};
    use chrono::{Duration, Utc};

    fn create_candidate(
        id: &str,
        sector: Sector,
        gender: Gender,
        rating: Option<f64>,
        slot: (Day, TimeSlot),
    ) -> CaregiverProfile {
        CaregiverProfile {
            caregiver_id: id.to_string(),
            display_name: format!("Caregiver {}", id),
            sector,
            availability: [AvailabilitySlot::new(slot.0, slot.1)].into_iter().collect(),
            gender,
            average_rating: rating,
            total_reviews: 0,
            hourly_rate_cents: 2200,
            is_active: true,
            registered_at: Utc::now() - Duration::days(30),
        }
    }

    fn create_request(preference: GenderPreference) -> SearchRequest {
        SearchRequest {
            sector: Sector::HomeAssistance,
            day: Day::Monday,
            time_slot: TimeSlot::Morning,
            marital_status: None,
            caregiver_preference: preference,
        }
    }

    #[test]
    fn test_rank_candidates_basic() {
        let candidates = vec![
            create_candidate("1", Sector::HomeAssistance, Gender::Female, Some(4.0), (Day::Monday, TimeSlot::Morning)),
            create_candidate("2", Sector::HomeAssistance, Gender::Male, Some(4.5), (Day::Monday, TimeSlot::Morning)),
            create_candidate("3", Sector::HomeAssistance, Gender::Female, Some(5.0), (Day::Monday, TimeSlot::Evening)),
            create_candidate("4", Sector::Gardening, Gender::Female, Some(5.0), (Day::Monday, TimeSlot::Morning)),
        ];

        let result = Matcher::rank_candidates(&create_request(GenderPreference::Specific(Gender::Female)), candidates);

        assert_eq!(result.count, 1);
        assert_eq!(result.total_candidates, 4);
        assert_eq!(result.matches[0].caregiver.caregiver_id, "1");
        assert_eq!(result.matches[0].rank, 1);
        assert_eq!(result.matches[0].score, Some(4.0));
    }

    #[test]
    fn test_rank_candidates_empty_is_not_an_error() {
        let result = Matcher::rank_candidates(&create_request(GenderPreference::Indifferent), vec![]);
        assert!(result.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[tokio::test]
    async fn test_search_uses_store() {
        let store = InMemoryStore::from_seed(SeedData {
            caregivers: vec![
                create_candidate("a", Sector::HomeAssistance, Gender::Female, None, (Day::Monday, TimeSlot::Morning)),
                create_candidate("b", Sector::HomeAssistance, Gender::Male, Some(3.0), (Day::Monday, TimeSlot::Morning)),
                create_candidate("c", Sector::Childcare, Gender::Male, Some(5.0), (Day::Monday, TimeSlot::Morning)),
            ],
            ..Default::default()
        });
        let matcher = Matcher::new(Arc::new(store));

        let result = matcher.search(&create_request(GenderPreference::Indifferent)).await.unwrap();

        assert_eq!(result.total_candidates, 2);
        let ids: Vec<_> = result.matches.iter().map(|m| m.caregiver.caregiver_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(result.matches[1].score, None);
    }

    #[tokio::test]
    async fn test_search_propagates_store_failure() {
        let store = Arc::new(InMemoryStore::new());
        store.set_available(false);
        let matcher = Matcher::new(store);

        let err = matcher.search(&create_request(GenderPreference::Indifferent)).await.unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }
}
