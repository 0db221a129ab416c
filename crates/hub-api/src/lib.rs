//! # hub-api
//!
//! HTTP API layer for InventoHub.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for users, shops, products, carts, and sales
//! - Bearer-token auth with admin/manager role guards
//! - Payment-intent creation via Stripe
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness text |
//! | GET | `/health` | Health check |
//! | POST | `/jwt` | Issue bearer token |
//! | POST | `/users` | Register user (idempotent) |
//! | GET | `/users` | List non-admin users (admin) |
//! | GET | `/users/manager/{email}` | Manager check (token) |
//! | PATCH | `/users/manager/{email}` | Merge-update user (admin) |
//! | GET | `/users/admin/{email}` | Admin check (token) |
//! | GET/PATCH | `/users/admin` | Fetch / update the admin (admin) |
//! | GET/POST | `/shops` | List (admin) / register (token) |
//! | GET/PATCH | `/shops/{email}` | Lookup (token) / update (manager) |
//! | GET/POST | `/products` | Storefront list / create (manager) |
//! | GET | `/products/{email}` | Seller's products (token) |
//! | GET/PUT/PATCH/DELETE | `/products/{email}/{id}` | Fetch / upsert / unit sale / delete |
//! | GET/POST | `/carts` | List / add item (token) |
//! | GET/POST | `/sales` | List (admin) / bulk record (manager) |
//! | GET | `/sales/{email}` | Seller's sales, newest first (manager) |
//! | POST | `/totalSold` | Append sold-total (manager) |
//! | POST | `/getPaid` | Checkout settlement (manager) |
//! | GET | `/reviews` | List reviews |
//! | GET | `/subscription`, `/subscription/{id}` | Subscription plans |
//! | POST | `/api/create-payment-intent` | Create payment intent (token) |

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
