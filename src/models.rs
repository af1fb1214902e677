pub mod appointment;
pub mod catalog;
pub mod crm;
pub mod inventory;
pub mod notice;
pub mod tenant;
