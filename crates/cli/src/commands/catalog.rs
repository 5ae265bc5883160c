//! Authors, books, packs and sections.

use bookshelf_admin::ListQuery;
use bookshelf_core::{AuthorId, BookId, PackId};

use super::{CliError, Context, or_dash};

pub async fn list_authors(ctx: &Context, query: &ListQuery) -> Result<(), CliError> {
    ctx.require_login()?;
    let authors = ctx.client.list_authors(query).await?;
    ctx.output.listing(&authors, &["ID", "NAME", "NATIONALITY"], |a| {
        vec![
            a.id.to_string(),
            a.name.clone(),
            or_dash(a.nationality.as_deref()),
        ]
    })
}

pub async fn delete_author(ctx: &Context, id: AuthorId) -> Result<(), CliError> {
    ctx.require_login()?;
    ctx.client.delete_author(id).await?;
    ctx.output.done(&format!("Author {id} deleted"))
}

pub async fn list_books(ctx: &Context, query: &ListQuery) -> Result<(), CliError> {
    ctx.require_login()?;
    let books = ctx.client.list_books(query).await?;
    ctx.output
        .listing(&books, &["ID", "TITLE", "AUTHOR", "PRICE", "STOCK"], |b| {
            vec![
                b.id.to_string(),
                b.title.clone(),
                or_dash(Some(b.author_name())),
                b.price.to_string(),
                b.stock_quantity.to_string(),
            ]
        })
}

pub async fn show_book(ctx: &Context, id: BookId) -> Result<(), CliError> {
    ctx.require_login()?;
    let book = ctx.client.get_book(id).await?;
    let tags: Vec<&str> = book.tags.iter().map(|t| t.title.as_str()).collect();

    ctx.output.record(
        &book,
        &[
            ("Id", book.id.to_string()),
            ("Title", book.title.clone()),
            ("Author", or_dash(Some(book.author_name()))),
            ("Price", book.price.to_string()),
            (
                "Stock",
                if book.in_stock() {
                    book.stock_quantity.to_string()
                } else {
                    "out of stock".to_string()
                },
            ),
            ("Language", or_dash(book.language.map(|l| l.as_str()))),
            ("Tags", or_dash(Some(tags.join(", ").as_str()))),
            ("Cover", book.cover_url.clone()),
        ],
    )
}

pub async fn delete_book(ctx: &Context, id: BookId) -> Result<(), CliError> {
    ctx.require_login()?;
    ctx.client.delete_book(id).await?;
    ctx.output.done(&format!("Book {id} deleted"))
}

pub async fn list_packs(ctx: &Context, query: &ListQuery) -> Result<(), CliError> {
    ctx.require_login()?;
    let packs = ctx.client.list_packs(query).await?;
    ctx.output
        .listing(&packs, &["ID", "NAME", "BOOKS", "PRICE"], |p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.book_ids.len().to_string(),
                p.price.to_string(),
            ]
        })
}

pub async fn show_pack(ctx: &Context, id: PackId) -> Result<(), CliError> {
    ctx.require_login()?;
    let pack = ctx.client.get_pack(id).await?;
    let books: Vec<&str> = pack.books.iter().map(|b| b.title.as_str()).collect();

    ctx.output.record(
        &pack,
        &[
            ("Id", pack.id.to_string()),
            ("Name", pack.name.clone()),
            ("Price", pack.price.to_string()),
            (
                "Books total",
                or_dash(pack.books_total().map(|p| p.to_string()).as_deref()),
            ),
            ("Books", books.join(", ")),
            ("Cover", or_dash(pack.image.as_deref())),
        ],
    )
}

pub async fn delete_pack(ctx: &Context, id: PackId) -> Result<(), CliError> {
    ctx.require_login()?;
    ctx.client.delete_pack(id).await?;
    ctx.output.done(&format!("Pack {id} deleted"))
}

/// Every tag, or only the home page sections in display order.
pub async fn list_sections(ctx: &Context, main_only: bool) -> Result<(), CliError> {
    ctx.require_login()?;
    let sections = if main_only {
        bookshelf_admin::Listing::Bare(ctx.client.main_display_sections().await?)
    } else {
        ctx.client.list_sections(&ListQuery::new()).await?
    };

    ctx.output
        .listing(&sections, &["ID", "ORDER", "TITLE", "BOOKS", "HOME"], |s| {
            vec![
                s.id.to_string(),
                s.display_order.to_string(),
                s.title.clone(),
                s.book_ids.len().to_string(),
                if s.main_display { "yes" } else { "no" }.to_string(),
            ]
        })
}
