use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Paper;

const ISO_LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Payload published once per created paper.
///
/// Carries a subset of the paper: `journal` and `updatedAt` are not part of
/// the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperCreatedEvent {
    pub id: String,
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl PaperCreatedEvent {
    pub fn from_paper(paper: &Paper) -> Self {
        Self {
            id: paper.id.to_string(),
            title: paper.title.clone(),
            author: paper.author.clone(),
            abstract_text: paper.abstract_text.clone(),
            status: paper.status.as_str().to_string(),
            created_at: format_local_date_time(&paper.created_at),
        }
    }
}

/// ISO-8601 local date-time, no offset.
///
/// The fraction keeps only significant digits and is dropped when zero.
pub fn format_local_date_time(value: &NaiveDateTime) -> String {
    let mut text = value.format(ISO_LOCAL_DATE_TIME).to_string();
    if text.contains('.') {
        let significant = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(significant);
    }
    text
}
