//! Orders: the admin back office plus the public guest checkout.

use tracing::instrument;

use bookshelf_core::forms::{OrderForm, Validate};
use bookshelf_core::{DeliveryType, OrderId, OrderStatus, Price};

use super::conversions::order_from_wire;
use super::wire::{DeliveryFeeDto, OrderDto, OrderPayload, StatusPayload};
use super::{ApiClient, ApiError, ApiRequest, ListQuery, Listing};
use crate::models::Order;

/// Parameters of a delivery fee quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFeeQuery {
    pub wilaya: String,
    pub delivery_type: DeliveryType,
}

impl DeliveryFeeQuery {
    #[must_use]
    pub fn new(wilaya: impl Into<String>, delivery_type: DeliveryType) -> Self {
        Self {
            wilaya: wilaya.into(),
            delivery_type,
        }
    }
}

impl ApiClient {
    /// List orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or an order is malformed.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &ListQuery) -> Result<Listing<Order>, ApiError> {
        let listing: Listing<OrderDto> = self
            .fetch_listing(ApiRequest::get("/api/orders").list_query(query))
            .await?;

        listing.try_map(order_from_wire)
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let dto: OrderDto = self
            .fetch_json(ApiRequest::get(format!("/api/orders/{id}")))
            .await?;
        order_from_wire(dto)
    }

    /// Place an order from the storefront. No session is needed and the
    /// endpoint is exempt from the CSRF header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the form does
    /// not validate.
    #[instrument(skip(self, form), fields(items = form.items.len(), delivery = ?form.delivery_type))]
    pub async fn create_guest_order(&self, form: &OrderForm) -> Result<Order, ApiError> {
        form.check()?;
        let request = ApiRequest::post("/api/orders").json(&OrderPayload::from(form))?;
        let dto: OrderDto = self.fetch_json(request).await?;
        tracing::info!(order_id = %dto.id, total = %dto.total_amount, "Order placed");
        order_from_wire(dto)
    }

    /// Replace the customer, shipping and item details of an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` if the form does not validate.
    #[instrument(skip(self, form))]
    pub async fn update_order(&self, id: OrderId, form: &OrderForm) -> Result<Order, ApiError> {
        form.check()?;
        let request = ApiRequest::put(format!("/api/orders/{id}")).json(&OrderPayload::from(form))?;
        let dto: OrderDto = self.fetch_json(request).await?;
        order_from_wire(dto)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the transition.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let request =
            ApiRequest::put(format!("/api/orders/{id}/status")).json(&StatusPayload { status })?;
        let dto: OrderDto = self.fetch_json(request).await?;
        tracing::info!(order_id = %id, status = %status, "Order status updated");
        order_from_wire(dto)
    }

    /// Save the edit dialog: details first, then the status once the update
    /// has been accepted. The status step is skipped when unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; a failed update leaves the
    /// status untouched.
    #[instrument(skip(self, form))]
    pub async fn apply_order_edit(
        &self,
        id: OrderId,
        form: &OrderForm,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let updated = self.update_order(id, form).await?;
        if updated.status == status {
            return Ok(updated);
        }
        self.update_order_status(id, status).await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.fetch_empty(ApiRequest::delete(format!("/api/orders/{id}")))
            .await?;
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Orders matching `query` as a CSV document.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn export_orders(&self, query: &ListQuery) -> Result<Vec<u8>, ApiError> {
        let csv = self
            .fetch_bytes(ApiRequest::get("/api/orders/export").list_query(query))
            .await?;
        tracing::debug!(bytes = csv.len(), "Orders exported");
        Ok(csv)
    }

    /// Delivery fee for a wilaya and delivery type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails, e.g. an unknown wilaya.
    #[instrument(skip(self))]
    pub async fn delivery_fee(&self, query: &DeliveryFeeQuery) -> Result<Price, ApiError> {
        let request = ApiRequest::get("/api/orders/delivery-fee")
            .query("wilaya", query.wilaya.trim())
            .query("deliveryType", query.delivery_type.as_str());
        let dto: DeliveryFeeDto = self.fetch_json(request).await?;
        Ok(dto.fee)
    }
}
