//! Customer orders.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bookshelf_core::forms::OrderLineItem;
use bookshelf_core::{DeliveryType, OrderId, OrderStatus, Price};

/// Who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Where the order goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    pub wilaya: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub delivery_type: DeliveryType,
}

/// One ordered book or pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(skip)]
    pub item: OrderLineItem,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// An order as shown in the admin list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub shipping: Shipping,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub delivery_fee: Price,
    pub total: Price,
    pub created_at: Option<DateTime<Utc>>,
}
