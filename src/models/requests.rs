use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::CoreError;
use crate::models::domain::{Day, GenderPreference, MaritalStatus, Sector, TimeSlot};

/// Caregiver search as received on the wire
///
/// Every field is a raw label (English slug or the French label shown in the
/// mobile app). [`SearchRequest::try_from`] turns it into the typed request
/// the matching engine works with.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchCaregiversRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "secteur", default)]
    pub sector: String,
    #[validate(length(min = 1))]
    #[serde(alias = "jour", default)]
    pub day: String,
    #[validate(length(min = 1))]
    #[serde(rename = "timeSlot", alias = "time_slot", alias = "horaires", default)]
    pub time_slot: String,
    #[serde(rename = "maritalStatus", alias = "marital_status", alias = "etatCivil", default)]
    pub marital_status: Option<String>,
    #[serde(
        rename = "caregiverPreference",
        alias = "caregiver_preference",
        alias = "preferenceAidant",
        default = "default_preference"
    )]
    pub caregiver_preference: String,
}

fn default_preference() -> String {
    "indifferent".to_string()
}

/// Typed caregiver search handed to the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub sector: Sector,
    pub day: Day,
    pub time_slot: TimeSlot,
    pub marital_status: Option<MaritalStatus>,
    pub caregiver_preference: GenderPreference,
}

/// Search criteria as echoed back to the client
///
/// Same as [`SearchRequest`] except that the sector stays a label, so a
/// search for a sector nobody offers can still be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub sector: String,
    pub day: Day,
    pub time_slot: TimeSlot,
    pub marital_status: Option<MaritalStatus>,
    pub caregiver_preference: GenderPreference,
}

impl From<SearchRequest> for SearchCriteria {
    fn from(request: SearchRequest) -> Self {
        Self {
            sector: request.sector.as_str().to_string(),
            day: request.day,
            time_slot: request.time_slot,
            marital_status: request.marital_status,
            caregiver_preference: request.caregiver_preference,
        }
    }
}

/// What a well-formed search resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Every label is known; run the matching engine
    Run(SearchRequest),
    /// The sector names no category, so no caregiver can match
    UnknownSector(SearchCriteria),
}

impl SearchCaregiversRequest {
    /// Validate the request and resolve its labels
    ///
    /// Day, time slot, marital status and preference must be known labels.
    /// An unrecognised sector is not an error: it resolves to
    /// [`SearchPlan::UnknownSector`] and yields an empty result.
    pub fn plan(&self) -> Result<SearchPlan, CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;

        let marital_status = match self.marital_status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(label.parse::<MaritalStatus>()?),
        };
        let day: Day = self.day.parse()?;
        let time_slot: TimeSlot = self.time_slot.parse()?;
        let caregiver_preference: GenderPreference = self.caregiver_preference.parse()?;

        Ok(match self.sector.parse::<Sector>() {
            Ok(sector) => SearchPlan::Run(SearchRequest {
                sector,
                day,
                time_slot,
                marital_status,
                caregiver_preference,
            }),
            Err(_) => SearchPlan::UnknownSector(SearchCriteria {
                sector: self.sector.trim().to_string(),
                day,
                time_slot,
                marital_status,
                caregiver_preference,
            }),
        })
    }
}

impl TryFrom<&SearchCaregiversRequest> for SearchRequest {
    type Error = CoreError;

    /// Strict conversion: an unknown sector is a validation error here
    fn try_from(raw: &SearchCaregiversRequest) -> Result<Self, Self::Error> {
        match raw.plan()? {
            SearchPlan::Run(request) => Ok(request),
            SearchPlan::UnknownSector(criteria) => Err(CoreError::Validation(format!(
                "unknown sector: {:?}",
                criteria.sector
            ))),
        }
    }
}

/// Query string of the statistics endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsQuery {
    /// Point in time to compute the snapshot for; defaults to now
    pub at: Option<DateTime<Utc>>,
}
