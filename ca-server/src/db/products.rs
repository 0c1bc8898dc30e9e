//! Product repository
//!
//! A product owns its gallery (`product_images`, ordered per product) and
//! its custom fields. Both are written in the same transaction as the
//! product row.

use std::collections::HashMap;

use shared::error::ErrorCode;
use shared::models::{CustomField, CustomFieldInput, Product, ProductImage, ProductUpdate};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use super::{lock_keys, not_found};
use crate::error::ServiceResult;
use crate::media::ImagePayload;
use crate::ordering::{self, OrderedCollection, ReorderPlan, Scope};

/// Product images, ordered independently per product
pub struct ProductImages;

impl OrderedCollection for ProductImages {
    const TABLE: &'static str = "product_images";
    const SCOPE_EXPR: &'static str = "product_id::text";
    const LOCK_KEY: i64 = lock_keys::PRODUCT_IMAGES;
    const LABEL: &'static str = "product_images";
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub tags: Vec<String>,
    pub available: bool,
    pub images: Vec<ImagePayload>,
    pub custom_fields: Vec<CustomFieldInput>,
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Product>> {
    let mut products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, description, price, quantity, tags, available, created_at, updated_at
        FROM products
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    load_relations(pool, &mut products).await?;
    Ok(products)
}

pub async fn find(pool: &PgPool, id: i64) -> ServiceResult<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, description, price, quantity, tags, available, created_at, updated_at
        FROM products WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(ErrorCode::ProductNotFound, id))?;

    let mut products = vec![product];
    load_relations(pool, &mut products).await?;
    Ok(products.remove(0))
}

/// Attach images (by position) and custom fields to loaded products
async fn load_relations(pool: &PgPool, products: &mut [Product]) -> ServiceResult<()> {
    if products.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();

    let images = sqlx::query_as::<_, ProductImage>(
        r#"
        SELECT id, product_id, position, image_base64, image_mime
        FROM product_images
        WHERE product_id = ANY($1)
        ORDER BY product_id, position, id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let fields = sqlx::query_as::<_, CustomField>(
        r#"
        SELECT id, product_id, name, kind, options, value
        FROM product_custom_fields
        WHERE product_id = ANY($1)
        ORDER BY product_id, id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut images_by_product: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    for image in images {
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(image.with_url());
    }
    let mut fields_by_product: HashMap<i64, Vec<CustomField>> = HashMap::new();
    for field in fields {
        fields_by_product.entry(field.product_id).or_default().push(field);
    }

    for product in products.iter_mut() {
        product.images = images_by_product.remove(&product.id).unwrap_or_default();
        product.custom_fields = fields_by_product.remove(&product.id).unwrap_or_default();
    }
    Ok(())
}

pub async fn create(pool: &PgPool, data: NewProduct) -> ServiceResult<Product> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO products (id, name, description, price, quantity, tags, available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.quantity)
    .bind(Json(&data.tags))
    .bind(data.available)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_images(&mut tx, id, &data.images, now).await?;
    insert_custom_fields(&mut tx, id, &data.custom_fields).await?;

    tx.commit().await?;
    tracing::info!(
        product_id = id,
        images = data.images.len(),
        fields = data.custom_fields.len(),
        "Product created"
    );
    find(pool, id).await
}

/// Partial update. A present `imagens` or `campos_personalizados` list
/// replaces the stored one, images taking their list index as position.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ProductUpdate,
    images: Option<Vec<ImagePayload>>,
) -> ServiceResult<Product> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        r#"
        UPDATE products SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            quantity = COALESCE($4, quantity),
            tags = COALESCE($5, tags),
            available = COALESCE($6, available),
            updated_at = $7
        WHERE id = $8
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.price)
    .bind(data.quantity)
    .bind(data.tags.as_ref().map(Json))
    .bind(data.available)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::ProductNotFound, id));
    }

    if let Some(ref images) = images {
        // the gallery is rewritten wholesale, so hold the ordering lock too
        ordering::store::lock::<ProductImages>(&mut tx).await?;
        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_images(&mut tx, id, images, now).await?;
    }

    if let Some(ref fields) = data.custom_fields {
        sqlx::query("DELETE FROM product_custom_fields WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_custom_fields(&mut tx, id, fields).await?;
    }

    tx.commit().await?;
    find(pool, id).await
}

/// Images and custom fields go with the product (ON DELETE CASCADE)
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::ProductNotFound, id));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(())
}

/// Append one image at the end of the product's gallery
pub async fn add_image(
    pool: &PgPool,
    product_id: i64,
    image: ImagePayload,
) -> ServiceResult<ProductImage> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let mut tx = pool.begin().await?;

    ensure_exists(&mut tx, product_id).await?;
    let position = ordering::store::append_position::<ProductImages>(
        &mut tx,
        &Scope::Product(product_id),
    )
    .await?;

    let row = sqlx::query_as::<_, ProductImage>(
        r#"
        INSERT INTO product_images (id, product_id, position, image_base64, image_mime, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, product_id, position, image_base64, image_mime
        "#,
    )
    .bind(id)
    .bind(product_id)
    .bind(position)
    .bind(&image.base64)
    .bind(&image.mime)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(product_id, image_id = id, position, "Product image added");
    Ok(row.with_url())
}

/// Remove one image; remaining positions keep their gap until reordered
pub async fn delete_image(pool: &PgPool, product_id: i64, image_id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM product_images WHERE id = $1 AND product_id = $2")
        .bind(image_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(ErrorCode::ProductImageNotFound, image_id));
    }
    Ok(())
}

/// Reorder one product's gallery. Ids of other products' images are unknown here.
pub async fn reorder_images(
    pool: &PgPool,
    product_id: i64,
    ids: &[i64],
) -> ServiceResult<ReorderPlan<String>> {
    {
        let mut conn = pool.acquire().await?;
        ensure_exists(&mut conn, product_id).await?;
    }
    ordering::store::reorder::<ProductImages>(pool, Some(&Scope::Product(product_id)), ids).await
}

async fn ensure_exists(conn: &mut PgConnection, product_id: i64) -> ServiceResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(product_id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Err(not_found(ErrorCode::ProductNotFound, product_id));
    }
    Ok(())
}

async fn insert_images(
    conn: &mut PgConnection,
    product_id: i64,
    images: &[ImagePayload],
    now: i64,
) -> ServiceResult<()> {
    if images.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = images.iter().map(|_| shared::util::snowflake_id()).collect();
    let positions: Vec<i32> = (0..images.len() as i32).collect();
    let data: Vec<&str> = images.iter().map(|i| i.base64.as_str()).collect();
    let mimes: Vec<&str> = images.iter().map(|i| i.mime.as_str()).collect();

    sqlx::query(
        r#"
        INSERT INTO product_images (id, product_id, position, image_base64, image_mime, created_at, updated_at)
        SELECT u.id, $2, u.position, u.data, u.mime, $6, $6
        FROM UNNEST($1::bigint[], $3::integer[], $4::text[], $5::text[]) AS u(id, position, data, mime)
        "#,
    )
    .bind(&ids)
    .bind(product_id)
    .bind(&positions)
    .bind(&data)
    .bind(&mimes)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_custom_fields(
    conn: &mut PgConnection,
    product_id: i64,
    fields: &[CustomFieldInput],
) -> ServiceResult<()> {
    for field in fields {
        sqlx::query(
            r#"
            INSERT INTO product_custom_fields (id, product_id, name, kind, options, value)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(shared::util::snowflake_id())
        .bind(product_id)
        .bind(field.name.trim())
        .bind(field.kind)
        .bind(Json(&field.options))
        .bind(&field.value)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
