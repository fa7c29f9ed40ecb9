//! Request handlers for the pricing calculator.

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::{
    config::PricingConfig,
    core::{CostingScope, DistributionMethod, PriceReport, ProductionMonth, calculate_product_prices},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query string of `GET /api/pricing/calculate`.
///
/// Values are taken as text so that bad input gets the same JSON error body as
/// every other validation failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingQuery {
    pub company_id: Option<String>,
    pub production_month: Option<String>,
    pub distribution_method: Option<String>,
}

impl PricingQuery {
    /// Validates the query, filling optional values from `defaults`.
    ///
    /// # Errors
    /// Returns a validation error when `companyId` is missing or not an integer,
    /// or when the month or method is malformed.
    pub fn into_scope(self, defaults: &PricingConfig) -> Result<CostingScope> {
        let company_id = non_empty(self.company_id)
            .ok_or_else(|| Error::MissingParameter {
                name: "companyId".to_string(),
            })?
            .parse::<i64>()
            .map_err(|e| Error::InvalidParameter {
                name: "companyId".to_string(),
                reason: e.to_string(),
            })?;

        let month = non_empty(self.production_month)
            .map(|m| m.parse::<ProductionMonth>())
            .transpose()?
            .unwrap_or(defaults.default_month);

        let method = non_empty(self.distribution_method)
            .map(|m| m.parse::<DistributionMethod>())
            .transpose()?
            .unwrap_or(defaults.default_distribution_method);

        Ok(CostingScope {
            company_id,
            month,
            method,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn map_query_rejection(err: &QueryRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid query parameters: {}", err.body_text()))
}

/// Calculates unit costs and suggested prices for every active product of a company.
pub async fn calculate_prices(
    State(state): State<AppState>,
    query: std::result::Result<Query<PricingQuery>, QueryRejection>,
) -> ApiResult<Json<PriceReport>> {
    let expose_details = state.config.server.expose_error_details;
    let Query(query) = query.map_err(|e| map_query_rejection(&e))?;

    let scope = query
        .into_scope(&state.config.pricing)
        .map_err(|e| ApiError::from_error(&e, expose_details))?;

    info!(
        company_id = scope.company_id,
        month = %scope.month,
        method = %scope.method,
        "Calculating product prices"
    );

    let report = calculate_product_prices(&state.db, scope)
        .await
        .map_err(|e| ApiError::from_error(&e, expose_details))?;

    Ok(Json(report))
}
