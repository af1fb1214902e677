pub mod appointment_service;
pub mod booking_service;
pub mod consumption;
pub mod eligibility;
pub mod package_service;
pub mod pricing;
