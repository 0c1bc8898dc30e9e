//! Product (loja) routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /produtos | GET | no |
//! | /produtos/{id} | GET | no |
//! | /produtos | POST | yes |
//! | /produtos/{id} | PUT, DELETE | yes |
//! | /produtos/{id}/imagens | POST | yes |
//! | /produtos/{id}/imagens/{imagem_id} | DELETE | yes |
//! | /produtos/{id}/reordenar-imagens | POST | yes |

use axum::extract::State;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router, middleware};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CustomFieldInput, CustomFieldKind, ImageReorder, Product, ProductCreate, ProductImage,
    ProductImageCreate, ProductUpdate,
};

use super::{ApiResult, Success};
use crate::auth::require_auth;
use crate::db::products::{self, NewProduct};
use crate::extract::{ApiJson, ApiPath};
use crate::media::{self, ImagePayload, MAX_PRODUCT_IMAGE_BYTES};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_TAGS, validate_optional_text,
    validate_price, validate_quantity, validate_required_text,
};

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/produtos", get(list))
        .route("/produtos/{id}", get(get_by_id));

    let protected = Router::new()
        .route("/produtos", post(create))
        .route("/produtos/{id}", put(update).delete(remove))
        .route("/produtos/{id}/imagens", post(add_image))
        .route("/produtos/{id}/imagens/{imagem_id}", delete(remove_image))
        .route("/produtos/{id}/reordenar-imagens", post(reorder_images))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected)
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(Json(products::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Product> {
    Ok(Json(products::find(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    validate_required_text(&payload.name, "nome", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    validate_price(payload.price)?;
    let quantity = payload.quantity.unwrap_or(0);
    validate_quantity(quantity)?;
    validate_tags(&payload.tags)?;
    validate_custom_fields(&payload.custom_fields)?;
    let images = parse_images(&payload.images)?;

    let product = products::create(
        &state.pool,
        NewProduct {
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            quantity,
            tags: payload.tags,
            available: payload.available.unwrap_or(true),
            images,
            custom_fields: payload.custom_fields,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `imagens` and `campos_personalizados`, when sent, replace the stored sets
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> ApiResult<Product> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "nome", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "descricao", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(ref tags) = payload.tags {
        validate_tags(tags)?;
    }
    if let Some(ref fields) = payload.custom_fields {
        validate_custom_fields(fields)?;
    }
    let images = payload.images.as_deref().map(parse_images).transpose()?;

    Ok(Json(products::update(&state.pool, id, &payload, images).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    products::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductImageCreate>,
) -> Result<(StatusCode, Json<ProductImage>), AppError> {
    let image = media::parse_image(&payload.image, MAX_PRODUCT_IMAGE_BYTES)?;
    let image = products::add_image(&state.pool, id, image).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn remove_image(
    State(state): State<AppState>,
    ApiPath((id, image_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    products::delete_image(&state.pool, id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_images(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ImageReorder>,
) -> ApiResult<Success> {
    products::reorder_images(&state.pool, id, &payload.image_ids).await?;
    Ok(Success::ok())
}

fn parse_images(images: &[String]) -> Result<Vec<ImagePayload>, AppError> {
    images
        .iter()
        .map(|raw| media::parse_image(raw, MAX_PRODUCT_IMAGE_BYTES))
        .collect()
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if tags.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "too many tags ({}, max {MAX_TAGS})",
            tags.len()
        ))
        .with_detail("field", "tags"));
    }
    for tag in tags {
        validate_required_text(tag, "tags", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

/// `opcao` fields need options and a value among them; `numero` values
/// must parse as numbers
fn validate_custom_fields(fields: &[CustomFieldInput]) -> Result<(), AppError> {
    for field in fields {
        let invalid = |reason: String| {
            AppError::with_message(ErrorCode::CustomFieldInvalid, reason)
                .with_detail("field", field.name.clone())
        };

        if field.name.trim().is_empty() {
            return Err(invalid("custom field name must not be empty".to_string()));
        }
        if field.name.chars().count() > MAX_SHORT_TEXT_LEN {
            return Err(invalid(format!("custom field name is too long (max {MAX_SHORT_TEXT_LEN})")));
        }

        match field.kind {
            CustomFieldKind::Opcao => {
                if field.options.iter().all(|o| o.trim().is_empty()) {
                    return Err(invalid(format!("{} needs at least one option", field.name)));
                }
                if let Some(ref value) = field.value
                    && !field.options.contains(value)
                {
                    return Err(invalid(format!("{value} is not an option of {}", field.name)));
                }
            }
            CustomFieldKind::Numero => {
                if let Some(ref value) = field.value
                    && value.trim().parse::<f64>().is_err()
                {
                    return Err(invalid(format!("{} must be a number", field.name)));
                }
            }
            CustomFieldKind::Texto => {}
        }
    }
    Ok(())
}
