use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::hhmm;

/// One candidate appointment start and whether it can still be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    #[serde(rename = "time", with = "hhmm")]
    pub start_time: NaiveTime,
    pub available: bool,
}

/// Envelope returned to clients asking for a day's slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub time_slots: Vec<CandidateSlot>,
}

impl AvailabilityResponse {
    pub fn slots(time_slots: Vec<CandidateSlot>) -> Self {
        Self {
            success: true,
            message: None,
            time_slots,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            time_slots: Vec::new(),
        }
    }
}
