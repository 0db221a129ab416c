//! # Request Handlers
//!
//! Axum request handlers for the InventoHub API. Each handler is a thin
//! mapping from path/query/body input to one or two store operations;
//! the interesting ones are user/shop registration (find-or-create) and
//! checkout settlement (conditional stock decrements, then cart clear).

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use hub_auth::{has_role, ROLE_ADMIN, ROLE_MANAGER};
use hub_core::{doc_i64, doc_str, DocId, Document, HubError, HubResult};
use hub_store::{
    collections, DeleteResult, Filter, InsertManyResult, InsertResult, Sort, Update, UpdateResult,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Stock allowance stamped on every new shop. Recorded only; no
/// endpoint enforces it against the actual product count.
const SHOP_PRODUCT_LIMIT: i64 = 3;

/// All payment intents are created in this currency
const INTENT_CURRENCY: &str = "usd";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Token issue response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Optional owner scope for cart listing
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Checkout settlement request. A product id appearing N times in
/// `productIds` means N units were purchased.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub cart_ids: Vec<String>,
}

/// Payment intent request: price in major currency units
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub price: f64,
}

/// Payment intent response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn docs_json(docs: Vec<Document>) -> Json<Value> {
    Json(Value::Array(docs.into_iter().map(Value::Object).collect()))
}

fn doc_or_null(doc: Option<Document>) -> Json<Value> {
    Json(doc.map(Value::Object).unwrap_or(Value::Null))
}

/// Parses external id strings, rejecting the whole batch on the first
/// malformed one
fn parse_ids(raw: &[String]) -> HubResult<Vec<DocId>> {
    raw.iter().map(|id| DocId::parse(id)).collect()
}

// =============================================================================
// System
// =============================================================================

/// Liveness text
pub async fn root() -> &'static str {
    "InventoHub server is running"
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "inventohub",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Signs a submitted identity payload into a bearer token
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<Document>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens.issue(payload)?;
    Ok(Json(TokenResponse { token }))
}

// =============================================================================
// Users
// =============================================================================

/// Idempotent registration keyed by email
pub async fn register_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> ApiResult<Json<Value>> {
    let email = doc_str(&user, "email")
        .ok_or_else(|| HubError::InvalidRequest("user registration requires an email".into()))?
        .to_string();

    let existing = state
        .store
        .find_one(collections::USERS, &Filter::new().eq("email", email.clone()))
        .await?;
    if existing.is_some() {
        return Ok(Json(
            json!({"message": "user already exists", "insertedId": null}),
        ));
    }

    let result = state.store.insert_one(collections::USERS, user).await?;
    info!("registered user {email}");
    Ok(Json(json!(result)))
}

/// Every user except the admins
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let users = state
        .store
        .find_many(collections::USERS, &Filter::new().ne("role", ROLE_ADMIN), None)
        .await?;
    Ok(docs_json(users))
}

/// Boolean manager check, `false` when the user is unknown
pub async fn is_manager(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = state
        .store
        .find_one(collections::USERS, &Filter::new().eq("email", email))
        .await?;
    let manager = user.as_ref().is_some_and(|u| has_role(u, ROLE_MANAGER));
    Ok(Json(json!({ "manager": manager })))
}

/// Boolean admin check, `false` when the user is unknown
pub async fn is_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = state
        .store
        .find_one(collections::USERS, &Filter::new().eq("email", email))
        .await?;
    let admin = user.as_ref().is_some_and(|u| has_role(u, ROLE_ADMIN));
    Ok(Json(json!({ "admin": admin })))
}

/// The first admin account, or JSON null
pub async fn get_admin(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let admin = state
        .store
        .find_one(collections::USERS, &Filter::new().eq("role", ROLE_ADMIN))
        .await?;
    Ok(doc_or_null(admin))
}

/// Merge-updates the admin account's profile
pub async fn update_admin(
    State(state): State<AppState>,
    Json(fields): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .store
        .update_one(
            collections::USERS,
            &Filter::new().eq("role", ROLE_ADMIN),
            Update::new().set_fields(fields),
            false,
        )
        .await?;
    Ok(Json(result))
}

/// Merge-updates a user by email. Role changes take effect on the
/// target's next request, since guards re-read the user document.
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(fields): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .store
        .update_one(
            collections::USERS,
            &Filter::new().eq("email", email),
            Update::new().set_fields(fields),
            false,
        )
        .await?;
    Ok(Json(result))
}

// =============================================================================
// Shops
// =============================================================================

pub async fn list_shops(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let shops = state
        .store
        .find_many(collections::SHOPS, &Filter::new(), None)
        .await?;
    Ok(docs_json(shops))
}

/// A shop looked up by its owner's email, or JSON null
pub async fn get_shop(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let shop = state
        .store
        .find_one(collections::SHOPS, &Filter::new().eq("owner_email", email))
        .await?;
    Ok(doc_or_null(shop))
}

/// Registers a shop for an owner, once. Every new shop gets the same
/// product allowance regardless of what the payload claims.
pub async fn create_shop(
    State(state): State<AppState>,
    Json(mut shop): Json<Document>,
) -> ApiResult<Json<Value>> {
    let owner = doc_str(&shop, "owner_email")
        .ok_or_else(|| {
            HubError::InvalidRequest("shop registration requires an owner_email".into())
        })?
        .to_string();

    let existing = state
        .store
        .find_one(
            collections::SHOPS,
            &Filter::new().eq("owner_email", owner.clone()),
        )
        .await?;
    if existing.is_some() {
        return Ok(Json(
            json!({"message": "shop already exists", "insertedId": null}),
        ));
    }

    shop.insert("productLimit".to_string(), json!(SHOP_PRODUCT_LIMIT));
    let result = state.store.insert_one(collections::SHOPS, shop).await?;
    info!("registered shop for {owner}");
    Ok(Json(json!(result)))
}

/// Merge-updates a shop by its owner's email
pub async fn update_shop(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(fields): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let result = state
        .store
        .update_one(
            collections::SHOPS,
            &Filter::new().eq("owner_email", email),
            Update::new().set_fields(fields),
            false,
        )
        .await?;
    Ok(Json(result))
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let products = state
        .store
        .find_many(collections::PRODUCTS, &Filter::new(), None)
        .await?;
    Ok(docs_json(products))
}

/// Products owned by one seller
pub async fn list_products_by_seller(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let products = state
        .store
        .find_many(collections::PRODUCTS, &Filter::new().eq("userEmail", email), None)
        .await?;
    Ok(docs_json(products))
}

/// Single product by id. The owner segment of the path is kept for URL
/// compatibility but the lookup is by id alone.
pub async fn get_product(
    State(state): State<AppState>,
    Path((_owner, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let id = DocId::parse(&id)?;
    let product = state
        .store
        .find_one(collections::PRODUCTS, &Filter::new().id(id))
        .await?;
    Ok(doc_or_null(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.store.insert_one(collections::PRODUCTS, product).await?;
    Ok(Json(result))
}

/// Creates or replaces a product's catalog fields by id
pub async fn upsert_product(
    State(state): State<AppState>,
    Path((_owner, id)): Path<(String, String)>,
    Json(fields): Json<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let id = DocId::parse(&id)?;
    let result = state
        .store
        .update_one(
            collections::PRODUCTS,
            &Filter::new().id(id),
            Update::new().set_fields(fields),
            true,
        )
        .await?;
    Ok(Json(result))
}

/// One unit sold: `saleCount` up, `product_quantity` down, in a single
/// atomic store operation. The quantity may go negative here; only the
/// checkout path guards stock.
pub async fn record_unit_sale(
    State(state): State<AppState>,
    Path((_owner, id)): Path<(String, String)>,
) -> ApiResult<Json<UpdateResult>> {
    let id = DocId::parse(&id)?;
    let result = state
        .store
        .update_one(
            collections::PRODUCTS,
            &Filter::new().id(id),
            Update::new().inc("saleCount", 1).inc("product_quantity", -1),
            false,
        )
        .await?;
    Ok(Json(result))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path((_owner, id)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResult>> {
    let id = DocId::parse(&id)?;
    let result = state
        .store
        .delete_one(collections::PRODUCTS, &Filter::new().id(id))
        .await?;
    Ok(Json(result))
}

// =============================================================================
// Carts
// =============================================================================

/// Cart entries, optionally scoped to one owner via `?email=`
pub async fn list_cart_items(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> ApiResult<Json<Value>> {
    let filter = match query.email {
        Some(email) => Filter::new().eq("email", email),
        None => Filter::new(),
    };
    let items = state
        .store
        .find_many(collections::CARTS, &filter, None)
        .await?;
    Ok(docs_json(items))
}

pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(item): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.store.insert_one(collections::CARTS, item).await?;
    Ok(Json(result))
}

// =============================================================================
// Sales & Checkout
// =============================================================================

pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let sales = state
        .store
        .find_many(collections::SALES, &Filter::new(), None)
        .await?;
    Ok(docs_json(sales))
}

/// One seller's sales, newest first
pub async fn list_sales_by_seller(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let sales = state
        .store
        .find_many(
            collections::SALES,
            &Filter::new().eq("email", email),
            Some(Sort::desc("currentDate")),
        )
        .await?;
    Ok(docs_json(sales))
}

/// Bulk-records sale documents
pub async fn record_sales(
    State(state): State<AppState>,
    Json(sales): Json<Vec<Document>>,
) -> ApiResult<Json<InsertManyResult>> {
    let result = state.store.insert_many(collections::SALES, sales).await?;
    Ok(Json(result))
}

/// Appends an aggregate sold-total record
pub async fn record_total_sold(
    State(state): State<AppState>,
    Json(total): Json<Document>,
) -> ApiResult<Json<InsertResult>> {
    let result = state.store.insert_one(collections::SOLD_TOTALS, total).await?;
    Ok(Json(result))
}

/// Settles a checkout: decrements stock for every purchased product,
/// then clears the purchased cart entries.
///
/// Each product is settled with one conditional update that refuses to
/// take the quantity below zero, so concurrent settlements cannot
/// oversell. There is no cross-product transaction: products settled
/// before a failure stay settled, and the cart entries are removed only
/// after every product succeeds.
#[instrument(skip(state, request), fields(products = request.product_ids.len(), carts = request.cart_ids.len()))]
pub async fn settle_checkout(
    State(state): State<AppState>,
    Json(request): Json<SettleRequest>,
) -> ApiResult<Json<DeleteResult>> {
    let cart_ids = parse_ids(&request.cart_ids)?;
    let product_ids = parse_ids(&request.product_ids)?;

    // Duplicate product ids in the purchase list express quantity.
    let mut tallies: Vec<(DocId, i64)> = Vec::new();
    for id in product_ids {
        match tallies.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 += 1,
            None => tallies.push((id, 1)),
        }
    }

    let settled = tallies.len();
    for (id, units) in tallies {
        let result = state
            .store
            .update_one(
                collections::PRODUCTS,
                &Filter::new().id(id).gte("product_quantity", units as f64),
                Update::new()
                    .inc("saleCount", units)
                    .inc("product_quantity", -units),
                false,
            )
            .await?;
        if result.matched_count == 0 {
            return Err(settlement_failure(&state, id, units).await.into());
        }
    }

    let cleared = state
        .store
        .delete_many(collections::CARTS, &Filter::new().id_in(cart_ids))
        .await?;
    info!(
        "checkout settled {settled} products, cleared {} cart entries",
        cleared.deleted_count
    );
    Ok(Json(cleared))
}

/// Distinguishes a vanished product from insufficient stock after a
/// conditional settlement update matched nothing
async fn settlement_failure(state: &AppState, id: DocId, requested: i64) -> HubError {
    match state
        .store
        .find_one(collections::PRODUCTS, &Filter::new().id(id))
        .await
    {
        Ok(Some(product)) => HubError::InsufficientStock {
            product_id: id.to_string(),
            requested,
            available: doc_i64(&product, "product_quantity").unwrap_or(0),
        },
        Ok(None) => HubError::NotFound {
            what: format!("product {id}"),
        },
        Err(e) => e,
    }
}

// =============================================================================
// Payments
// =============================================================================

/// Creates a payment intent for a major-unit price and relays the
/// processor's client secret
#[instrument(skip(state, request), fields(price = request.price))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<Json<CreateIntentResponse>> {
    if !request.price.is_finite() || request.price <= 0.0 {
        return Err(HubError::InvalidRequest("price must be a positive number".into()).into());
    }

    let amount = (request.price * 100.0).trunc() as i64;
    let intent = state.payments.create(amount, INTENT_CURRENCY).await?;
    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
    }))
}

// =============================================================================
// Storefront
// =============================================================================

pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let reviews = state
        .store
        .find_many(collections::REVIEWS, &Filter::new(), None)
        .await?;
    Ok(docs_json(reviews))
}

pub async fn list_subscriptions(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let plans = state
        .store
        .find_many(collections::SUBSCRIPTIONS, &Filter::new(), None)
        .await?;
    Ok(docs_json(plans))
}

/// Single subscription plan by id, or JSON null
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = DocId::parse(&id)?;
    let plan = state
        .store
        .find_one(collections::SUBSCRIPTIONS, &Filter::new().id(id))
        .await?;
    Ok(doc_or_null(plan))
}
