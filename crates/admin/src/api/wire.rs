//! Backend JSON records, field for field.
//!
//! Response records (`*Dto`) are only deserialized; request records
//! (`*Payload`) are only serialized. Both use the backend's camelCase names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookshelf_core::{
    AuthorId, BookId, CategoryId, DeliveryType, Language, OrderId, OrderStatus, PackId, Price,
    TagId,
};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: AuthorId,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRefDto {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub author: Option<AuthorDto>,
    pub price: Price,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub tags: Vec<TagRefDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Book as embedded in packs and tags. Only the id is guaranteed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRefDto {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackDto {
    pub id: PackId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub books: Vec<BookRefDto>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// A tag; main display tags are the home page sections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub main_display: bool,
    #[serde(default)]
    pub books: Vec<BookRefDto>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(default)]
    pub book_id: Option<BookId>,
    #[serde(default)]
    pub pack_id: Option<PackId>,
    #[serde(default)]
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub wilaya: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItemDto>,
    #[serde(default)]
    pub delivery_fee: Price,
    pub total_amount: Price,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryFeeDto {
    pub fee: Price,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStatsDto {
    pub total_books: u64,
    pub total_authors: u64,
    pub total_packs: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub low_stock_books: u64,
    pub total_revenue: Price,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPointDto {
    pub label: String,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub revenue: Price,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileDto {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub admin: Option<AdminProfileDto>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("admin", &self.admin)
            .finish()
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AuthorId>,
    pub name: String,
    pub biography: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author_id: Option<AuthorId>,
    pub price: Price,
    pub stock_quantity: i32,
    pub language: Option<Language>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Vec<TagId>,
}

/// `{"id": ...}` reference inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRef<I> {
    pub id: I,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PackId>,
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub books: Vec<IdRef<BookId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub main_display: bool,
    pub book_ids: Vec<BookId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_id: Option<PackId>,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub wilaya: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub delivery_type: DeliveryType,
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPayload {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct LoginPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
}
