//! Notice Model (avisos)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time-boxed announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notice {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Notice {
    /// A notice is active from its start date through its end date, inclusive.
    /// Without an end date it stays active.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.start_date <= today && self.end_date.is_none_or(|end| end >= today)
    }
}

/// Create notice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeCreate {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
}

/// Update notice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeUpdate {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "data_inicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(start: &str, end: Option<&str>) -> Notice {
        Notice {
            id: 1,
            title: "Assembleia".into(),
            description: None,
            link: None,
            start_date: start.parse().unwrap(),
            end_date: end.map(|e| e.parse().unwrap()),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn active_window_is_inclusive() {
        let today: NaiveDate = "2024-05-10".parse().unwrap();
        assert!(notice("2024-05-10", Some("2024-05-10")).is_active_on(today));
        assert!(notice("2024-05-01", None).is_active_on(today));
        assert!(!notice("2024-05-11", None).is_active_on(today));
        assert!(!notice("2024-05-01", Some("2024-05-09")).is_active_on(today));
    }
}
