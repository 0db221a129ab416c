//! # Routes
//!
//! Axum router configuration for the InventoHub API. Routes are grouped
//! by the guard tier they sit behind: public, token-only, manager, and
//! admin. The tiers are separate routers merged at the end, so each
//! tier carries its own guard layers.

use crate::handlers;
use crate::middleware::{require_admin, require_manager, require_token};
use crate::state::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  /                  - Liveness text
///   - GET  /health            - Health check
///   - POST /jwt               - Issue a bearer token
///   - POST /users             - Idempotent user registration
///   - GET  /products          - Storefront catalog
///   - GET  /reviews           - Storefront reviews
///   - GET  /subscription, /subscription/{id} - Subscription plans
///
/// - Token-guarded:
///   - GET  /users/manager/{email}, /users/admin/{email} - Role checks
///   - GET  /shops/{email}, POST /shops - Shop lookup / registration
///   - GET  /products/{email}, /products/{email}/{id} - Seller catalog reads
///   - GET/POST /carts - Cart listing / add-to-cart
///   - POST /api/create-payment-intent - Payment intent creation
///
/// - Manager-guarded:
///   - POST /products, PUT/PATCH/DELETE /products/{email}/{id} - Catalog writes
///   - PATCH /shops/{email} - Shop profile update
///   - GET  /sales/{email}, POST /sales, POST /totalSold - Sales recording
///   - POST /getPaid - Checkout settlement
///
/// - Admin-guarded:
///   - GET  /users, GET/PATCH /users/admin, PATCH /users/manager/{email}
///   - GET  /shops, GET /sales
pub fn create_router(state: AppState) -> Router {
    // Storefront and dashboard are served from separate origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/jwt", post(handlers::issue_token))
        .route("/users", post(handlers::register_user))
        .route("/products", get(handlers::list_products))
        .route("/reviews", get(handlers::list_reviews))
        .route("/subscription", get(handlers::list_subscriptions))
        .route("/subscription/{id}", get(handlers::get_subscription));

    let token_routes = Router::new()
        .route("/users/manager/{email}", get(handlers::is_manager))
        .route("/users/admin/{email}", get(handlers::is_admin))
        .route("/shops/{email}", get(handlers::get_shop))
        .route("/shops", post(handlers::create_shop))
        .route("/products/{email}", get(handlers::list_products_by_seller))
        .route("/products/{email}/{id}", get(handlers::get_product))
        .route(
            "/carts",
            get(handlers::list_cart_items).post(handlers::add_cart_item),
        )
        .route(
            "/api/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route_layer(from_fn_with_state(state.clone(), require_token));

    // route_layer wraps bottom-up: the token guard added last runs
    // first, so an anonymous request gets 401, not 403.
    let manager_routes = Router::new()
        .route("/products", post(handlers::create_product))
        .route(
            "/products/{email}/{id}",
            put(handlers::upsert_product)
                .patch(handlers::record_unit_sale)
                .delete(handlers::delete_product),
        )
        .route("/shops/{email}", patch(handlers::update_shop))
        .route("/sales/{email}", get(handlers::list_sales_by_seller))
        .route("/sales", post(handlers::record_sales))
        .route("/totalSold", post(handlers::record_total_sold))
        .route("/getPaid", post(handlers::settle_checkout))
        .route_layer(from_fn_with_state(state.clone(), require_manager))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    let admin_routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/admin",
            get(handlers::get_admin).patch(handlers::update_admin),
        )
        .route("/users/manager/{email}", patch(handlers::update_user))
        .route("/shops", get(handlers::list_shops))
        .route("/sales", get(handlers::list_sales))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(public_routes)
        .merge(token_routes)
        .merge(manager_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
