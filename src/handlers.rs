pub mod appointments;
pub mod crm;
