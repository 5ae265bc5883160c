use bookshelf_core::forms::{AuthorForm, BookForm, ImageSelection, PackForm, SectionForm};

use super::{AssetUrls, non_blank};
use crate::api::wire::{
    AuthorDto, AuthorPayload, BookDto, BookPayload, BookRefDto, IdRef, PackDto, PackPayload,
    TagDto, TagPayload,
};
use crate::models::{Author, Book, BookRef, Pack, Section, TagRef};

// =============================================================================
// Authors
// =============================================================================

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            biography: dto.biography,
            nationality: dto.nationality,
        }
    }
}

impl From<&AuthorForm> for AuthorPayload {
    fn from(form: &AuthorForm) -> Self {
        Self {
            id: form.id,
            name: form.name.trim().to_string(),
            biography: non_blank(&form.biography),
            nationality: non_blank(&form.nationality),
        }
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            id: Some(author.id),
            name: author.name.clone(),
            biography: author.biography.clone().unwrap_or_default(),
            nationality: author.nationality.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Books
// =============================================================================

/// Backend book -> UI book. The cover URL is always derived from the id.
#[must_use]
pub fn book_from_wire(dto: BookDto, urls: &AssetUrls<'_>) -> Book {
    Book {
        cover_url: urls.book_cover(dto.id),
        id: dto.id,
        title: dto.title,
        author: dto.author.map(Author::from),
        price: dto.price,
        stock_quantity: dto.stock_quantity,
        language: dto.language,
        description: dto.description,
        category_id: dto.category_id,
        tags: dto
            .tags
            .into_iter()
            .map(|tag| TagRef {
                id: tag.id,
                title: tag.name,
            })
            .collect(),
        created_at: dto.created_at,
    }
}

impl From<&BookForm> for BookPayload {
    /// Expects a validated form; missing numbers fall back to zero.
    fn from(form: &BookForm) -> Self {
        Self {
            id: form.id,
            title: form.title.trim().to_string(),
            author_id: form.author_id,
            price: form.price.unwrap_or_default(),
            stock_quantity: form.stock_quantity.unwrap_or_default(),
            language: form.language,
            description: non_blank(&form.description),
            category_id: form.category_id,
            tag_ids: form.tag_ids.clone(),
        }
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author_id: book.author.as_ref().map(|a| a.id),
            price: Some(book.price),
            stock_quantity: Some(book.stock_quantity),
            language: book.language,
            description: book.description.clone().unwrap_or_default(),
            category_id: book.category_id,
            tag_ids: book.tags.iter().map(|t| t.id).collect(),
            cover: ImageSelection::Existing(book.cover_url.clone()),
        }
    }
}

// =============================================================================
// Packs
// =============================================================================

fn book_ref(dto: BookRefDto) -> BookRef {
    BookRef {
        id: dto.id,
        title: dto.title,
        price: dto.price,
    }
}

/// Backend pack -> UI pack: `title` becomes `name`, the cover is derived
/// from the id, and the embedded books are reduced to their ids. Every pack
/// has a cover, so `coverUrl` is not consulted.
#[must_use]
pub fn pack_from_wire(dto: PackDto, urls: &AssetUrls<'_>) -> Pack {
    Pack {
        id: dto.id,
        name: dto.title,
        description: dto.description,
        price: dto.price,
        book_ids: dto.books.iter().map(|b| b.id).collect(),
        books: dto.books.into_iter().map(book_ref).collect(),
        image: Some(urls.pack_cover(dto.id)),
    }
}

impl From<&PackForm> for PackPayload {
    fn from(form: &PackForm) -> Self {
        Self {
            id: form.id,
            title: form.name.trim().to_string(),
            description: non_blank(&form.description),
            price: form.price.unwrap_or_default(),
            books: form.book_ids.iter().map(|&id| IdRef { id }).collect(),
        }
    }
}

impl From<&Pack> for PackForm {
    fn from(pack: &Pack) -> Self {
        Self {
            id: Some(pack.id),
            name: pack.name.clone(),
            description: pack.description.clone().unwrap_or_default(),
            price: Some(pack.price),
            book_ids: pack.book_ids.clone(),
            cover: pack
                .image
                .clone()
                .map_or(ImageSelection::Empty, ImageSelection::Existing),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Backend tag -> UI section: `name` becomes `title`. A tag with an
/// `imageUrl` gets the derived, stamped image URL; one without keeps `None`.
#[must_use]
pub fn section_from_wire(dto: TagDto, urls: &AssetUrls<'_>) -> Section {
    Section {
        id: dto.id,
        title: dto.name,
        description: dto.description,
        display_order: dto.display_order,
        main_display: dto.main_display,
        book_ids: dto.books.iter().map(|b| b.id).collect(),
        books: dto.books.into_iter().map(book_ref).collect(),
        image: dto.image_url.is_some().then(|| urls.section_image(dto.id)),
    }
}

impl From<&SectionForm> for TagPayload {
    /// Sections are always main display tags.
    fn from(form: &SectionForm) -> Self {
        Self {
            id: form.id,
            name: form.title.trim().to_string(),
            description: non_blank(&form.description),
            display_order: form.display_order,
            main_display: true,
            book_ids: form.book_ids.clone(),
        }
    }
}

impl From<&Section> for SectionForm {
    fn from(section: &Section) -> Self {
        Self {
            id: Some(section.id),
            title: section.title.clone(),
            description: section.description.clone().unwrap_or_default(),
            display_order: section.display_order,
            book_ids: section.book_ids.clone(),
            image: section
                .image
                .clone()
                .map_or(ImageSelection::Empty, ImageSelection::Existing),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookshelf_core::{BookId, Language, Price, TagId, Validate};
    use serde_json::json;

    use super::*;

    const URLS: AssetUrls<'static> = AssetUrls::new("http://localhost:8080", 42);

    #[test]
    fn test_pack_round_trip_preserves_id_price_and_books() {
        let dto: PackDto = serde_json::from_value(json!({
            "id": 7,
            "title": "Algerian classics",
            "price": 2500,
            "books": [{"id": 1, "title": "Nedjma"}, {"id": 2}],
            "coverUrl": "/api/book-packs/7/cover"
        }))
        .unwrap();

        let pack = pack_from_wire(dto, &URLS);
        assert_eq!(pack.name, "Algerian classics");
        assert_eq!(
            pack.image.as_deref(),
            Some("http://localhost:8080/api/book-packs/7/cover?t=42")
        );
        assert_eq!(pack.book_ids, vec![BookId::new(1), BookId::new(2)]);

        let form = PackForm::from(&pack);
        assert!(form.validate().is_empty());

        let payload = serde_json::to_value(PackPayload::from(&form)).unwrap();
        assert_eq!(payload["id"], 7);
        assert_eq!(payload["title"], "Algerian classics");
        assert_eq!(payload["price"].as_f64(), Some(2500.0));
        assert_eq!(payload["books"], json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn test_section_renames() {
        let dto: TagDto = serde_json::from_value(json!({
            "id": 4,
            "name": "New arrivals",
            "displayOrder": 1,
            "mainDisplay": true,
            "imageUrl": "/api/tags/4/image",
            "books": [{"id": 10}]
        }))
        .unwrap();

        let section = section_from_wire(dto, &URLS);
        assert_eq!(section.title, "New arrivals");
        assert_eq!(
            section.image.as_deref(),
            Some("http://localhost:8080/api/tags/4/image?t=42")
        );

        let payload = TagPayload::from(&SectionForm::from(&section));
        assert_eq!(payload.id, Some(TagId::new(4)));
        assert_eq!(payload.name, "New arrivals");
        assert!(payload.main_display);
        assert_eq!(payload.book_ids, vec![BookId::new(10)]);
    }

    #[test]
    fn test_image_urls_are_derived_and_stamped() {
        let pack: PackDto = serde_json::from_value(json!({
            "id": 9,
            "title": "No cover field",
            "price": 1200,
            "books": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();
        assert_eq!(
            pack_from_wire(pack, &URLS).image.as_deref(),
            Some("http://localhost:8080/api/book-packs/9/cover?t=42")
        );

        let tag: TagDto = serde_json::from_value(json!({
            "id": 5,
            "name": "Stale path",
            "imageUrl": "/uploads/old-banner.jpg",
            "books": []
        }))
        .unwrap();
        assert_eq!(
            section_from_wire(tag, &URLS).image.as_deref(),
            Some("http://localhost:8080/api/tags/5/image?t=42")
        );

        let bare: TagDto = serde_json::from_value(json!({
            "id": 6,
            "name": "No image",
            "books": []
        }))
        .unwrap();
        assert_eq!(section_from_wire(bare, &URLS).image, None);
    }

    #[test]
    fn test_book_cover_is_derived_and_prefills_existing() {
        let dto: BookDto = serde_json::from_value(json!({
            "id": 12,
            "title": "L'Étranger",
            "price": 1500.0,
            "stockQuantity": 3,
            "language": "FRENCH",
            "author": {"id": 2, "name": "Albert Camus"},
            "tags": [{"id": 4, "name": "New arrivals"}]
        }))
        .unwrap();

        let book = book_from_wire(dto, &URLS);
        assert_eq!(
            book.cover_url,
            "http://localhost:8080/api/books/12/cover?t=42"
        );
        assert_eq!(book.author_name(), "Albert Camus");
        assert_eq!(book.tags[0].title, "New arrivals");

        let form = BookForm::from(&book);
        assert!(form.is_edit());
        assert!(form.validate().is_empty());

        let payload = BookPayload::from(&form);
        assert_eq!(payload.price, Price::from_dinars(1500));
        assert_eq!(payload.language, Some(Language::French));
        assert_eq!(payload.tag_ids, vec![TagId::new(4)]);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_new_pack_payload_has_no_id() {
        let form = PackForm {
            name: " Starter pack ".to_string(),
            price: Some(Price::from_dinars(1900)),
            book_ids: vec![BookId::new(1), BookId::new(3)],
            ..PackForm::default()
        };
        let json = serde_json::to_value(PackPayload::from(&form)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["title"], "Starter pack");
    }
}
