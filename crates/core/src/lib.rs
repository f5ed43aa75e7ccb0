//! # SlotWise Core
//!
//! Domain types and pure scheduling logic shared by the database and API
//! crates. Nothing in this crate performs I/O.
//!
//! - [`availability`] derives the bookable slots for a service on one day
//! - [`clock`] parses and compares wall-clock times
//! - [`authorization`] decides who may read or change bookings
//! - [`models`] holds the request, response and domain records
//! - [`errors`] defines the error taxonomy used across the workspace

pub mod authorization;
pub mod availability;
pub mod clock;
pub mod errors;
pub mod models;

pub use availability::{compute_availability, AvailabilityError, Slots, SLOT_CADENCE_MINUTES};
