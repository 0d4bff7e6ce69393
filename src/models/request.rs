use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRequest {
    pub id: String,
    pub post_id: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub post_id: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub post_id: Option<String>,
    pub volunteer_email: Option<String>,
}
