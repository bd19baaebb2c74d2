use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct CropPrice {
    pub crop_name: &'static str,
    pub price: u32,
    pub trend: Trend,
}

// Placeholder board until a real price feed exists; identical for every region.
const MOCK_PRICES: [CropPrice; 2] = [
    CropPrice {
        crop_name: "Пшеница 3 кл.",
        price: 12500,
        trend: Trend::Up,
    },
    CropPrice {
        crop_name: "Подсолнечник",
        price: 28100,
        trend: Trend::Down,
    },
];

pub fn router() -> Router<AppState> {
    Router::new().route("/prices/:region", get(prices_for_region))
}

#[instrument]
pub async fn prices_for_region(Path(region): Path<String>) -> Json<Vec<CropPrice>> {
    Json(MOCK_PRICES.to_vec())
}
