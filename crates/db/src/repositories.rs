pub mod booking;
pub mod business;
pub mod business_hours;
pub mod profile;
pub mod service;
