//! Collection names used by the InventoHub backend.

pub const USERS: &str = "users";
pub const SHOPS: &str = "shops";
pub const PRODUCTS: &str = "products";
pub const CARTS: &str = "carts";
pub const SALES: &str = "sales";
pub const REVIEWS: &str = "reviews";
pub const SUBSCRIPTIONS: &str = "subscriptions";
pub const SOLD_TOTALS: &str = "sold_totals";
