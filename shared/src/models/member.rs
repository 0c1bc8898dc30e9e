//! Member Model (membros da gestão)

use serde::{Deserialize, Serialize};

/// Whether a member belongs to the current board or a past one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "member_status"))]
pub enum MemberStatus {
    #[serde(rename = "atual")]
    #[cfg_attr(feature = "db", sqlx(rename = "atual"))]
    Current,
    #[serde(rename = "antiga")]
    #[cfg_attr(feature = "db", sqlx(rename = "antiga"))]
    Former,
}

/// Board member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cargo")]
    pub role: String,
    pub area: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "contato")]
    pub contact: Option<String>,
    /// Board term label, e.g. "2024/2025"
    #[serde(rename = "gestao")]
    pub cohort: String,
    pub status: MemberStatus,
    #[serde(rename = "ordem")]
    pub position: i32,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(skip)]
    pub photo_base64: Option<String>,
    #[serde(skip)]
    pub photo_mime: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(rename = "foto_url", default)]
    pub photo_url: Option<String>,
}

impl Member {
    /// Fill `photo_url` from the stored payload
    pub fn with_photo_url(mut self) -> Self {
        self.photo_url = match (&self.photo_mime, &self.photo_base64) {
            (Some(mime), Some(data)) => Some(crate::util::data_url(mime, data)),
            _ => None,
        };
        self
    }
}

/// Create member payload
///
/// Every text field is required, including the photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cargo")]
    pub role: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "contato")]
    pub contact: Option<String>,
    #[serde(rename = "gestao")]
    pub cohort: Option<String>,
    pub status: Option<MemberStatus>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
    #[serde(rename = "foto")]
    pub photo: Option<String>,
}

/// Update member payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "cargo")]
    pub role: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "contato")]
    pub contact: Option<String>,
    #[serde(rename = "gestao")]
    pub cohort: Option<String>,
    pub status: Option<MemberStatus>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
    #[serde(rename = "foto")]
    pub photo: Option<String>,
}

/// Reorder members payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberReorder {
    #[serde(rename = "membroIds")]
    pub member_ids: Vec<i64>,
}

/// List filters; `status` narrows a `gestao` listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberQuery {
    pub gestao: Option<String>,
    pub status: Option<MemberStatus>,
}
