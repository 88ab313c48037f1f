use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a label does not name any variant of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Fold a user-facing label into a comparison key.
///
/// Case, surrounding whitespace and word separators are ignored so that
/// `"Home Assistance"`, `"home-assistance"` and `"home_assistance"` all agree.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '\'' | '’' => '_',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed enumeration that is stored and serialized as its slug and
/// parsed from the slug or any of its aliases.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $variant:ident => $slug:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            fn aliases(&self) -> &'static [&'static str] {
                match self {
                    $($name::$variant => &[$slug $(, $alias)*]),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let key = normalize_label(raw);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.aliases().iter().any(|a| normalize_label(a) == key))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: raw.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Category of care a caregiver offers
    Sector as "sector" {
        HomeAssistance => "home_assistance" | "Aide à domicile" | "aide a domicile",
        MealAssistance => "meal_assistance" | "Aide au repas" | "Aide aux repas",
        Companionship => "companionship" | "Dame de compagnie" | "Compagnie",
        LightCare => "light_care" | "Soins légers et assistance" | "soins legers et assistance",
        CognitiveStimulation => "cognitive_stimulation" | "Stimulation cognitive (jeux, lecture)" | "Stimulation cognitive",
        Childcare => "childcare" | "Garde d'enfants" | "garde d enfants",
        Housekeeping => "housekeeping" | "Ménage" | "menage",
        Errands => "errands" | "Courses",
        Gardening => "gardening" | "Jardinage",
        HandyWork => "handy_work" | "Bricolage",
        Accompaniment => "accompaniment" | "Accompagnement" | "Accompagnement médical",
        Other => "other" | "Autre",
    }
}

impl Sector {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Sector::HomeAssistance => "Home Assistance",
            Sector::MealAssistance => "Meal Assistance",
            Sector::Companionship => "Companionship",
            Sector::LightCare => "Light Care",
            Sector::CognitiveStimulation => "Cognitive Stimulation",
            Sector::Childcare => "Childcare",
            Sector::Housekeeping => "Housekeeping",
            Sector::Errands => "Errands",
            Sector::Gardening => "Gardening",
            Sector::HandyWork => "Handy Work",
            Sector::Accompaniment => "Accompaniment",
            Sector::Other => "Other",
        }
    }
}

closed_enum! {
    Day as "day" {
        Monday => "monday" | "lundi" | "mon",
        Tuesday => "tuesday" | "mardi" | "tue",
        Wednesday => "wednesday" | "mercredi" | "wed",
        Thursday => "thursday" | "jeudi" | "thu",
        Friday => "friday" | "vendredi" | "fri",
        Saturday => "saturday" | "samedi" | "sat",
        Sunday => "sunday" | "dimanche" | "sun",
    }
}

closed_enum! {
    /// Discrete part of a day, the unit of caregiver availability
    TimeSlot as "time slot" {
        Morning => "morning" | "matin",
        Afternoon => "afternoon" | "après-midi" | "apres-midi",
        Evening => "evening" | "soir" | "soirée",
    }
}

closed_enum! {
    Gender as "gender" {
        Female => "female" | "femme" | "f" | "woman",
        Male => "male" | "homme" | "m" | "man",
    }
}

closed_enum! {
    /// Marital status of the person receiving care. Advisory only.
    MaritalStatus as "marital status" {
        Single => "single" | "célibataire" | "celibataire",
        Married => "married" | "marié" | "mariée" | "marié(e)" | "marie",
        Partnered => "partnered" | "pacsé" | "pacsé(e)" | "en couple",
        Divorced => "divorced" | "divorcé" | "divorcée" | "divorcé(e)",
        Widowed => "widowed" | "veuf" | "veuve" | "veuf/veuve",
    }
}

closed_enum! {
    UserRole as "user role" {
        Client => "client",
        Caregiver => "caregiver" | "aidant",
    }
}

closed_enum! {
    PaymentStatus as "payment status" {
        Created => "created" | "pending" | "requires_payment_method",
        Succeeded => "succeeded" | "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
}

closed_enum! {
    /// Lifecycle state of a booked service
    ServiceStatus as "service status" {
        Pending => "pending" | "en_attente",
        Upcoming => "upcoming" | "a_venir",
        DepositPaid => "deposit_paid" | "acompte_paye",
        InProgress => "in_progress" | "en_cours",
        Completed => "completed" | "termine",
        Rated => "rated" | "evalue",
        FullyPaid => "fully_paid" | "paiement_complet",
        Cancelled => "cancelled" | "annule" | "canceled",
    }
}

impl ServiceStatus {
    /// Service was delivered (whether or not it has been rated or paid in full)
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Completed | ServiceStatus::Rated | ServiceStatus::FullyPaid
        )
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Upcoming | ServiceStatus::DepositPaid | ServiceStatus::InProgress
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServiceStatus::Cancelled)
    }
}

closed_enum! {
    ConversationStatus as "conversation status" {
        Open => "open" | "conversation" | "active",
        Ended => "ended" | "termine",
        Cancelled => "cancelled" | "annule" | "canceled",
    }
}

impl ConversationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ConversationStatus::Open)
    }
}

/// Caregiver gender preference expressed by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderPreference {
    Indifferent,
    Specific(Gender),
}

impl GenderPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPreference::Indifferent => "indifferent",
            GenderPreference::Specific(gender) => gender.as_str(),
        }
    }

    /// Whether a caregiver of the given gender satisfies this preference
    #[inline]
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            GenderPreference::Indifferent => true,
            GenderPreference::Specific(wanted) => *wanted == gender,
        }
    }
}

impl FromStr for GenderPreference {
    type Err = ParseEnumError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = normalize_label(raw);
        if ["indifferent", "indifférent", "any", "no_preference"].contains(&key.as_str()) {
            return Ok(GenderPreference::Indifferent);
        }
        raw.parse::<Gender>()
            .map(GenderPreference::Specific)
            .map_err(|_| ParseEnumError {
                kind: "caregiver preference",
                value: raw.to_string(),
            })
    }
}

impl Serialize for GenderPreference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for GenderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weekly availability entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub day: Day,
    pub time_slot: TimeSlot,
}

impl AvailabilitySlot {
    pub fn new(day: Day, time_slot: TimeSlot) -> Self {
        Self { day, time_slot }
    }
}

/// Caregiver profile as read from the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverProfile {
    pub caregiver_id: String,
    #[serde(default)]
    pub display_name: String,
    pub sector: Sector,
    #[serde(default)]
    pub availability: BTreeSet<AvailabilitySlot>,
    pub gender: Gender,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default = "default_hourly_rate_cents")]
    pub hourly_rate_cents: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
}

impl CaregiverProfile {
    /// Average rating, or `None` when the caregiver has not been rated.
    ///
    /// Values that are not finite or fall outside `0..=5` are treated as
    /// unrated rather than clamped.
    pub fn rating(&self) -> Option<f64> {
        self.average_rating
            .filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
    }

    #[inline]
    pub fn is_available(&self, day: Day, time_slot: TimeSlot) -> bool {
        self.availability
            .contains(&AvailabilitySlot::new(day, time_slot))
    }
}

fn default_true() -> bool { true }
fn default_hourly_rate_cents() -> i64 { 2200 }

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_suspended: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Payment as emitted by the payment gateway integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub payment_id: String,
    /// Amount in minor currency units (cents)
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub service_id: String,
    #[serde(default)]
    pub sector: Option<Sector>,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub conversation_id: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
}
