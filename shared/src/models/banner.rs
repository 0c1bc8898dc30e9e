//! Banner Model

use serde::{Deserialize, Serialize};

/// Banner entity
///
/// The image bytes never leave the database as a separate field: reads
/// return `imagem_url` as a `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Banner {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    /// Placement slot, `principal` unless stated
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "posicao")]
    pub position: i32,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(skip)]
    pub image_base64: Option<String>,
    #[serde(skip)]
    pub image_mime: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Derived (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(rename = "imagem_url", default)]
    pub image_url: Option<String>,
}

impl Banner {
    /// Fill `image_url` from the stored payload
    pub fn with_image_url(mut self) -> Self {
        self.image_url = match (&self.image_mime, &self.image_base64) {
            (Some(mime), Some(data)) => Some(crate::util::data_url(mime, data)),
            _ => None,
        };
        self
    }
}

/// Create banner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerCreate {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
    /// Image as a `data:` URL or bare base64
    #[serde(rename = "imagem")]
    pub image: Option<String>,
}

/// Update banner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerUpdate {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<bool>,
    #[serde(rename = "imagem")]
    pub image: Option<String>,
}

/// Reorder banners payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerReorder {
    #[serde(rename = "bannerIds")]
    pub banner_ids: Vec<i64>,
}
