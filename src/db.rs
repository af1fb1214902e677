pub mod tenant_store;
pub use tenant_store::TenantStore;
pub mod booking_repo;
pub use booking_repo::BookingRepository;
pub mod memory_store;
pub use memory_store::InMemoryStore;
