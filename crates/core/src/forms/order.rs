use crate::types::{BookId, DeliveryType, PackId};

use super::{FieldErrors, Validate, is_blank, is_mobile_number};

/// What an order line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLineItem {
    Book(BookId),
    Pack(PackId),
}

/// One line of an order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub item: OrderLineItem,
    pub quantity: u32,
}

/// Order form, used both for guest checkout and for admin edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Wilaya (province) code or name.
    pub wilaya: String,
    pub city: String,
    pub address: String,
    pub delivery_type: DeliveryType,
    pub items: Vec<OrderLine>,
}

impl Validate for OrderForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.first_name) {
            errors.add("firstName", "First name is required");
        }
        if is_blank(&self.last_name) {
            errors.add("lastName", "Last name is required");
        }

        if is_blank(&self.phone) {
            errors.add("phone", "Phone number is required");
        } else if !is_mobile_number(&self.phone) {
            errors.add("phone", "Phone number must be 10 digits starting with 05, 06 or 07");
        }

        if is_blank(&self.wilaya) {
            errors.add("wilaya", "Wilaya is required");
        }

        if self.delivery_type == DeliveryType::Home && is_blank(&self.address) {
            errors.add("address", "Address is required for home delivery");
        }

        if self.items.is_empty() {
            errors.add("items", "The order has no items");
        } else if self.items.iter().any(|line| line.quantity == 0) {
            errors.add("items", "Every item needs a quantity of at least 1");
        }

        errors
    }
}
