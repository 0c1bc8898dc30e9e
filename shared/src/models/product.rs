//! Product Model (loja)

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    /// Price in cents
    #[serde(rename = "preco")]
    pub price: i64,
    #[serde(rename = "quantidade")]
    pub quantity: i32,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub tags: Vec<String>,
    #[serde(rename = "disponivel")]
    pub available: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(rename = "imagens", default)]
    pub images: Vec<ProductImage>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(rename = "campos_personalizados", default)]
    pub custom_fields: Vec<CustomField>,
}

/// One image of a product gallery, ordered by `ordem` within its product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: i64,
    #[serde(rename = "produto_id")]
    pub product_id: i64,
    #[serde(rename = "ordem")]
    pub position: i32,
    #[serde(skip)]
    pub image_base64: String,
    #[serde(skip)]
    pub image_mime: String,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub url: String,
}

impl ProductImage {
    pub fn with_url(mut self) -> Self {
        self.url = crate::util::data_url(&self.image_mime, &self.image_base64);
        self
    }
}

/// Custom field value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "custom_field_kind", rename_all = "lowercase")
)]
pub enum CustomFieldKind {
    Texto,
    Numero,
    Opcao,
}

/// Free-form attribute attached to a product (size, color, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomField {
    pub id: i64,
    #[serde(rename = "produto_id")]
    pub product_id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: CustomFieldKind,
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(rename = "opcoes", default)]
    pub options: Vec<String>,
    #[serde(rename = "valor")]
    pub value: Option<String>,
}

/// Custom field as sent by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: CustomFieldKind,
    #[serde(rename = "opcoes", default)]
    pub options: Vec<String>,
    #[serde(rename = "valor")]
    pub value: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: i64,
    #[serde(rename = "quantidade")]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "disponivel")]
    pub available: Option<bool>,
    /// Gallery in display order, each a `data:` URL or bare base64
    #[serde(rename = "imagens", default)]
    pub images: Vec<String>,
    #[serde(rename = "campos_personalizados", default)]
    pub custom_fields: Vec<CustomFieldInput>,
}

/// Update product payload
///
/// `imagens` and `campos_personalizados`, when present, replace the
/// current sets entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: Option<i64>,
    #[serde(rename = "quantidade")]
    pub quantity: Option<i32>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "disponivel")]
    pub available: Option<bool>,
    #[serde(rename = "imagens")]
    pub images: Option<Vec<String>>,
    #[serde(rename = "campos_personalizados")]
    pub custom_fields: Option<Vec<CustomFieldInput>>,
}

/// Append one image to a product gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImageCreate {
    #[serde(rename = "imagem")]
    pub image: String,
}

/// Reorder product images payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReorder {
    #[serde(rename = "imagemIds")]
    pub image_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_defaults() {
        let body: ProductCreate =
            serde_json::from_str(r#"{"nome":"Caneca","preco":2500}"#).unwrap();
        assert_eq!(body.price, 2500);
        assert!(body.images.is_empty());
        assert!(body.custom_fields.is_empty());
        assert!(body.tags.is_empty());
    }

    #[test]
    fn custom_field_kind_wire_names() {
        let field: CustomFieldInput = serde_json::from_str(
            r#"{"nome":"Tamanho","tipo":"opcao","opcoes":["P","M","G"]}"#,
        )
        .unwrap();
        assert_eq!(field.kind, CustomFieldKind::Opcao);
        assert_eq!(field.options.len(), 3);
        assert!(serde_json::from_str::<CustomFieldKind>("\"data\"").is_err());
    }

    #[test]
    fn image_serializes_url_and_order() {
        let image = ProductImage {
            id: 5,
            product_id: 1,
            position: 2,
            image_base64: "AAAA".into(),
            image_mime: "image/jpeg".into(),
            url: String::new(),
        }
        .with_url();
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["ordem"], 2);
        assert_eq!(json["url"], "data:image/jpeg;base64,AAAA");
        assert!(json.get("image_base64").is_none());
    }
}
