use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const CATEGORIES: &[&str] = &[
    "Healthcare",
    "Education",
    "Social Service",
    "Animal Welfare",
    "Environmental",
    "Community Development",
    "Disaster Relief",
    "Arts & Culture",
    "Sports & Recreation",
    "Technology",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerPost {
    pub id: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub volunteers_needed: i32,
    pub deadline: NaiveDate,
    pub organizer_name: String,
    pub organizer_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insert {
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub volunteers_needed: i32,
    pub deadline: NaiveDate,
    pub organizer_name: String,
    pub organizer_email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub volunteers_needed: i32,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub organizer_email: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}
