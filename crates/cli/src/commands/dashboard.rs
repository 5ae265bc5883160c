use bookshelf_core::SalesPeriod;

use super::{CliError, Context};

/// Counters followed by the sales series for `period`.
pub async fn show(ctx: &Context, period: SalesPeriod) -> Result<(), CliError> {
    ctx.require_login()?;
    let (stats, sales) = tokio::try_join!(
        ctx.client.dashboard_stats(),
        ctx.client.dashboard_sales(period)
    )?;

    if ctx.output.is_json() {
        return ctx.output.record(
            &serde_json::json!({ "stats": stats, "sales": sales, "period": period }),
            &[],
        );
    }

    ctx.output.record(
        &stats,
        &[
            ("Books", stats.total_books.to_string()),
            ("Low stock", stats.low_stock_books.to_string()),
            ("Authors", stats.total_authors.to_string()),
            ("Packs", stats.total_packs.to_string()),
            ("Orders", stats.total_orders.to_string()),
            ("Pending", stats.pending_orders.to_string()),
            ("Revenue", stats.total_revenue.to_string()),
        ],
    )?;

    let rows: Vec<Vec<String>> = sales
        .iter()
        .map(|p| vec![p.label.clone(), p.orders.to_string(), p.revenue.to_string()])
        .collect();
    ctx.output.table(&[period.as_str(), "ORDERS", "REVENUE"], &rows)
}
