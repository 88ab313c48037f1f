// Service exports
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::{InMemoryStore, SeedData};
pub use postgres::PostgresStore;
pub use store::{
    CaregiverQuery, CreatedRange, PaymentQuery, RecordStore, ServiceQuery, StoreError, UserQuery,
};
