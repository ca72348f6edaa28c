//! Storefront configuration endpoint.

use axum::{Json, extract::State};

use tienda_core::EcommerceConfig;

use crate::state::AppState;

/// `GET /api/config/ecommerce` - public storefront settings.
pub async fn show(State(state): State<AppState>) -> Json<EcommerceConfig> {
    Json(state.ecommerce().clone())
}
