use crate::models::{CaregiverProfile, SearchRequest};

/// Check the hard eligibility constraints: active profile in the requested sector
///
/// This is Stage 1 of the matching pipeline. The store already applies it to
/// its query; it is re-checked here so a loosely filtering store cannot leak
/// ineligible caregivers.
#[inline]
pub fn matches_sector(profile: &CaregiverProfile, request: &SearchRequest) -> bool {
    profile.is_active && profile.sector == request.sector
}

/// Check that the exact {day, time-slot} pair is in the caregiver's availability
///
/// This is Stage 2. Availability is a discrete set; there is no partial-slot
/// overlap.
#[inline]
pub fn matches_availability(profile: &CaregiverProfile, request: &SearchRequest) -> bool {
    profile.is_available(request.day, request.time_slot)
}

/// Check the client's caregiver-gender preference
///
/// This is Stage 3. Marital status is deliberately not consulted.
#[inline]
pub fn matches_gender_preference(profile: &CaregiverProfile, request: &SearchRequest) -> bool {
    request.caregiver_preference.accepts(profile.gender)
}

/// All eligibility stages combined
#[inline]
pub fn is_eligible(profile: &CaregiverProfile, request: &SearchRequest) -> bool {
    matches_sector(profile, request)
        && matches_availability(profile, request)
        && matches_gender_preference(profile, request)
}
