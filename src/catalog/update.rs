//! Description updates as allow-listed partial writes.
//!
//! The catalog accepts a full product document on `POST /products/{id}` and
//! rejects or silently rewrites server-managed fields it finds there. A write
//! therefore starts from the current product and projects it onto the fixed
//! set of fields below; nested collections are rebuilt item by item so
//! per-item ids, ordering and other internal metadata never travel back.
//!
//! Projection rules:
//! - a scalar absent on the source is omitted, an explicit `null` is kept;
//! - list fields that are absent or `null` become `[]`;
//! - rebuilt collections that are not arrays become `[]`, non-object items
//!   project to `{}`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::CatalogApi;
use crate::types::{Error, ProductId, Result};

type Object = Map<String, Value>;

/// Top-level write payload for `POST /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ribbon_text: Option<Value>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchasable: Option<Value>,
    pub options: Value,
    #[serde(rename = "type")]
    pub product_type: ProductTypeRef,
    pub collections: Vec<CollectionRef>,
    pub additional_info: Value,
    pub custom_fields: Value,
    pub variants: Vec<VariantPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Value>,
    pub media: Vec<MediaPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_product_selection: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_settings: Option<SeoSettingsPayload>,
    pub related_products: Value,
}

/// `type`, reduced to its reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProductTypeRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Collection membership, reduced to its reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CollectionRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_inventory: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_low_stock: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    pub prices: Vec<PricePayload>,
    pub options: Value,
    pub digital_assets: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_event: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_card: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PricePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_amount: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MediaPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_slot: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeoSettingsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(rename = "ogImageAlt", skip_serializing_if = "Option::is_none")]
    pub og_image_alt: Option<Value>,
    #[serde(rename = "ogImagePath", skip_serializing_if = "Option::is_none")]
    pub og_image_path: Option<Value>,
    #[serde(rename = "ogImageOrigin", skip_serializing_if = "Option::is_none")]
    pub og_image_origin: Option<Value>,
}

// =============================================================================
// Projection helpers
// =============================================================================

fn field(source: Option<&Object>, key: &str) -> Option<Value> {
    source.and_then(|obj| obj.get(key)).cloned()
}

fn list_or_empty(source: Option<&Object>, key: &str) -> Value {
    match source.and_then(|obj| obj.get(key)) {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(value) => value.clone(),
    }
}

fn rebuild<T>(source: Option<&Object>, key: &str, project: fn(Option<&Object>) -> T) -> Vec<T> {
    match source.and_then(|obj| obj.get(key)) {
        Some(Value::Array(items)) => items.iter().map(|item| project(item.as_object())).collect(),
        _ => Vec::new(),
    }
}

fn project_collection(item: Option<&Object>) -> CollectionRef {
    CollectionRef {
        id: field(item, "id"),
        title: field(item, "title"),
    }
}

fn project_price(item: Option<&Object>) -> PricePayload {
    PricePayload {
        currency_code: field(item, "currency_code"),
        amount: field(item, "amount"),
        sale_amount: field(item, "sale_amount"),
    }
}

fn project_variant(item: Option<&Object>) -> VariantPayload {
    VariantPayload {
        id: field(item, "id"),
        title: field(item, "title"),
        sku: field(item, "sku"),
        manage_inventory: field(item, "manage_inventory"),
        inventory_quantity: field(item, "inventory_quantity"),
        track_low_stock: field(item, "track_low_stock"),
        image_url: field(item, "image_url"),
        weight: field(item, "weight"),
        prices: rebuild(item, "prices", project_price),
        options: list_or_empty(item, "options"),
        digital_assets: list_or_empty(item, "digital_assets"),
        booking_event: field(item, "booking_event"),
        gift_card: field(item, "gift_card"),
    }
}

fn project_media(item: Option<&Object>) -> MediaPayload {
    MediaPayload {
        url: field(item, "url"),
        media_type: field(item, "type"),
        display_slot: field(item, "display_slot"),
    }
}

fn project_seo(source: Option<&Object>) -> Option<SeoSettingsPayload> {
    let seo = source.and_then(|obj| obj.get("seo_settings"))?;
    // A present-but-null block is treated as absent.
    if seo.is_null() {
        return None;
    }
    let seo = seo.as_object();
    Some(SeoSettingsPayload {
        slug: field(seo, "slug"),
        description: field(seo, "description"),
        og_image_alt: field(seo, "ogImageAlt"),
        og_image_path: field(seo, "ogImagePath"),
        og_image_origin: field(seo, "ogImageOrigin"),
    })
}

// =============================================================================
// Public API
// =============================================================================

/// Pull the product object out of a `GET /products/{id}` envelope.
pub fn extract_product(envelope: &Value) -> Result<&Object> {
    envelope
        .get("product")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::malformed("product envelope has no 'product' object"))
}

/// Project `product` onto the update allow-list with `description` replaced.
///
/// The description is used exactly as given; an empty string stays empty.
pub fn build_description_update(product: &Object, description: &str) -> UpdatePayload {
    let product = Some(product);
    UpdatePayload {
        title: field(product, "title"),
        subtitle: field(product, "subtitle"),
        ribbon_text: field(product, "ribbon_text"),
        description: description.to_string(),
        status: field(product, "status"),
        purchasable: field(product, "purchasable"),
        options: list_or_empty(product, "options"),
        product_type: {
            let product_type = product.and_then(|p| p.get("type")).and_then(Value::as_object);
            ProductTypeRef {
                id: field(product_type, "id"),
                value: field(product_type, "value"),
            }
        },
        collections: rebuild(product, "collections", project_collection),
        additional_info: list_or_empty(product, "additional_info"),
        custom_fields: list_or_empty(product, "custom_fields"),
        variants: rebuild(product, "variants", project_variant),
        thumbnail: field(product, "thumbnail"),
        media: rebuild(product, "media", project_media),
        site_product_selection: field(product, "site_product_selection"),
        seo_settings: project_seo(product),
        related_products: list_or_empty(product, "related_products"),
    }
}

/// Read the product, project it, write it back.
///
/// A failed read never turns into a write.
pub async fn update_product_description(
    api: &dyn CatalogApi,
    product_id: &ProductId,
    description: &str,
) -> Result<Value> {
    let envelope = api.get_product(product_id).await?;
    let product = extract_product(&envelope)?;
    let payload = build_description_update(product, description);

    tracing::debug!(
        product_id = %product_id,
        variants = payload.variants.len(),
        media = payload.media.len(),
        "submitting description update"
    );

    api.update_product(product_id, &payload).await
}
