use bookshelf_core::forms::{ContactForm, OrderForm, OrderLine, OrderLineItem};

use super::non_blank;
use crate::api::ApiError;
use crate::api::wire::{ContactPayload, OrderDto, OrderItemDto, OrderItemPayload, OrderPayload};
use crate::models::{Customer, Order, OrderItem, Shipping};

fn item_from_wire(dto: OrderItemDto) -> Result<OrderItem, ApiError> {
    let item = match (dto.book_id, dto.pack_id) {
        (Some(book), None) => OrderLineItem::Book(book),
        (None, Some(pack)) => OrderLineItem::Pack(pack),
        (Some(_), Some(_)) => {
            return Err(ApiError::Parse(
                "order item references both a book and a pack".to_string(),
            ));
        }
        (None, None) => {
            return Err(ApiError::Parse(
                "order item references neither a book nor a pack".to_string(),
            ));
        }
    };

    Ok(OrderItem {
        item,
        title: dto.title,
        quantity: dto.quantity,
        unit_price: dto.unit_price,
    })
}

/// Backend order -> UI order, grouping customer and shipping fields.
///
/// # Errors
///
/// Returns `ApiError::Parse` if an item references neither or both of a book
/// and a pack.
pub fn order_from_wire(dto: OrderDto) -> Result<Order, ApiError> {
    Ok(Order {
        id: dto.id,
        customer: Customer {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone: dto.phone,
            email: dto.email,
        },
        shipping: Shipping {
            wilaya: dto.wilaya,
            city: dto.city,
            address: dto.address,
            delivery_type: dto.delivery_type,
        },
        status: dto.status,
        items: dto
            .items
            .into_iter()
            .map(item_from_wire)
            .collect::<Result<_, _>>()?,
        delivery_fee: dto.delivery_fee,
        total: dto.total_amount,
        created_at: dto.created_at,
    })
}

impl From<&OrderForm> for OrderPayload {
    fn from(form: &OrderForm) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            // digits only; the form accepts spaces and dashes
            phone: form
                .phone
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
            email: non_blank(&form.email),
            wilaya: form.wilaya.trim().to_string(),
            city: non_blank(&form.city),
            address: non_blank(&form.address),
            delivery_type: form.delivery_type,
            items: form
                .items
                .iter()
                .map(|line| match line.item {
                    OrderLineItem::Book(id) => OrderItemPayload {
                        book_id: Some(id),
                        pack_id: None,
                        quantity: line.quantity,
                    },
                    OrderLineItem::Pack(id) => OrderItemPayload {
                        book_id: None,
                        pack_id: Some(id),
                        quantity: line.quantity,
                    },
                })
                .collect(),
        }
    }
}

impl From<&Order> for OrderForm {
    /// Prefill the edit form from a loaded order.
    fn from(order: &Order) -> Self {
        Self {
            first_name: order.customer.first_name.clone(),
            last_name: order.customer.last_name.clone(),
            phone: order.customer.phone.clone(),
            email: order.customer.email.clone().unwrap_or_default(),
            wilaya: order.shipping.wilaya.clone(),
            city: order.shipping.city.clone().unwrap_or_default(),
            address: order.shipping.address.clone().unwrap_or_default(),
            delivery_type: order.shipping.delivery_type,
            items: order
                .items
                .iter()
                .map(|item| OrderLine {
                    item: item.item,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

impl From<&ContactForm> for ContactPayload {
    fn from(form: &ContactForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: non_blank(&form.subject),
            message: form.message.trim().to_string(),
        }
    }
}
