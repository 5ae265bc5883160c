//! Order queue commands.

use std::path::Path;

use bookshelf_admin::ListQuery;
use bookshelf_admin::api::DeliveryFeeQuery;
use bookshelf_core::{DeliveryType, OrderId, OrderStatus};

use super::{CliError, Context, or_dash};

pub async fn list(ctx: &Context, query: &ListQuery) -> Result<(), CliError> {
    ctx.require_login()?;
    let orders = ctx.client.list_orders(query).await?;
    ctx.output.listing(
        &orders,
        &["ID", "STATUS", "CUSTOMER", "PHONE", "WILAYA", "TOTAL"],
        |o| {
            vec![
                o.id.to_string(),
                o.status.to_string(),
                o.customer.full_name(),
                o.customer.phone.clone(),
                o.shipping.wilaya.clone(),
                o.total.to_string(),
            ]
        },
    )
}

pub async fn show(ctx: &Context, id: OrderId) -> Result<(), CliError> {
    ctx.require_login()?;
    let order = ctx.client.get_order(id).await?;

    let mut fields = vec![
        ("Id", order.id.to_string()),
        ("Status", order.status.to_string()),
        ("Customer", order.customer.full_name()),
        ("Phone", order.customer.phone.clone()),
        ("Email", or_dash(order.customer.email.as_deref())),
        ("Wilaya", order.shipping.wilaya.clone()),
        ("Address", or_dash(order.shipping.address.as_deref())),
        ("Delivery", format!("{:?}", order.shipping.delivery_type)),
    ];
    fields.extend(order.items.iter().map(|item| {
        (
            "Item",
            format!("{} x{} = {}", item.title, item.quantity, item.subtotal()),
        )
    }));
    fields.push(("Delivery fee", order.delivery_fee.to_string()));
    fields.push(("Total", order.total.to_string()));

    ctx.output.record(&order, &fields)
}

pub async fn set_status(ctx: &Context, id: OrderId, status: OrderStatus) -> Result<(), CliError> {
    ctx.require_login()?;
    let order = ctx.client.update_order_status(id, status).await?;
    ctx.output
        .done(&format!("Order {} is now {}", order.id, order.status))
}

pub async fn delete(ctx: &Context, id: OrderId) -> Result<(), CliError> {
    ctx.require_login()?;
    ctx.client.delete_order(id).await?;
    ctx.output.done(&format!("Order {id} deleted"))
}

/// Write the CSV export to `output`, or stdout.
pub async fn export(
    ctx: &Context,
    query: &ListQuery,
    output: Option<&Path>,
) -> Result<(), CliError> {
    use std::io::Write;

    ctx.require_login()?;
    let csv = ctx.client.export_orders(query).await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &csv).await?;
            tracing::info!(path = %path.display(), bytes = csv.len(), "Orders exported");
        }
        None => std::io::stdout().lock().write_all(&csv)?,
    }
    Ok(())
}

/// Public endpoint; works without a session.
pub async fn fee(ctx: &Context, wilaya: &str, delivery: DeliveryType) -> Result<(), CliError> {
    let fee = ctx
        .client
        .delivery_fee(&DeliveryFeeQuery::new(wilaya, delivery))
        .await?;
    ctx.output.record(
        &serde_json::json!({ "wilaya": wilaya, "deliveryType": delivery, "fee": fee }),
        &[("Wilaya", wilaya.to_string()), ("Fee", fee.to_string())],
    )
}
