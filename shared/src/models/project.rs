//! Project Model (projetos)

use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "project_status"))]
pub enum ProjectStatus {
    #[serde(rename = "planejado")]
    #[cfg_attr(feature = "db", sqlx(rename = "planejado"))]
    Planned,
    #[serde(rename = "em andamento")]
    #[cfg_attr(feature = "db", sqlx(rename = "em andamento"))]
    InProgress,
    #[serde(rename = "concluído")]
    #[cfg_attr(feature = "db", sqlx(rename = "concluído"))]
    Done,
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Project {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub status: ProjectStatus,
    /// 0..=100
    #[serde(rename = "progresso")]
    pub progress: i32,
    /// Board term label, also the ordering scope
    #[serde(rename = "gestao")]
    pub cohort: String,
    #[serde(rename = "ordem")]
    pub position: i32,
    #[serde(rename = "ativo")]
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create project payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(rename = "progresso")]
    pub progress: Option<i32>,
    #[serde(rename = "gestao")]
    pub cohort: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
}

/// Update project payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(rename = "progresso")]
    pub progress: Option<i32>,
    #[serde(rename = "gestao")]
    pub cohort: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
}

/// List filters; `status` narrows a `gestao` listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectQuery {
    pub gestao: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Reorder projects payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReorder {
    #[serde(rename = "projetos")]
    pub project_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        let s: ProjectStatus = serde_json::from_str("\"em andamento\"").unwrap();
        assert_eq!(s, ProjectStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Done).unwrap(),
            "\"concluído\""
        );
        assert!(serde_json::from_str::<ProjectStatus>("\"cancelado\"").is_err());
    }
}
