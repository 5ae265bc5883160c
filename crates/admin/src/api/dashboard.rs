//! Dashboard figures.

use tracing::instrument;

use bookshelf_core::SalesPeriod;

use super::wire::{DashboardStatsDto, SalesPointDto};
use super::{ApiClient, ApiError, ApiRequest, Listing};
use crate::models::{DashboardStats, SalesPoint};

impl ApiClient {
    /// Catalog and order counters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let dto: DashboardStatsDto = self
            .fetch_json(ApiRequest::get("/api/dashboard/stats"))
            .await?;
        Ok(dto.into())
    }

    /// Sales over `period`, oldest point first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_sales(&self, period: SalesPeriod) -> Result<Vec<SalesPoint>, ApiError> {
        let listing: Listing<SalesPointDto> = self
            .fetch_listing(ApiRequest::get("/api/dashboard/sales").query("period", period.as_str()))
            .await?;
        Ok(listing.into_items().into_iter().map(SalesPoint::from).collect())
    }
}
