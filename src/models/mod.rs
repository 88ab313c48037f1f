// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilitySlot, CaregiverProfile, ConversationRecord, ConversationStatus, Day, Gender,
    GenderPreference, MaritalStatus, ParseEnumError, PaymentRecord, PaymentStatus, Sector,
    ServiceRecord, ServiceStatus, TimeSlot, UserRecord, UserRole,
};
pub use requests::{
    SearchCaregiversRequest, SearchCriteria, SearchPlan, SearchRequest, StatisticsQuery,
};
pub use responses::{
    round1, ErrorResponse, HealthResponse, MonthlyEntry, SearchResponse, SectorEntry,
    StatisticsResponse,
};
