//! Client-side filtering and paging of the book list
//!
//! The API returns the whole collection; search, filters, ordering and the
//! page slice are applied here.

use super::Book;

/// Page sizes the list steps through
pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// What the list view asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Zero-based page index
    pub page: usize,
    pub page_size: usize,
    /// Case-insensitive match on title or author; blank means no filter
    pub search: String,
    /// Exact genre; `None` means all
    pub genre: Option<String>,
    /// Exact status; `None` means all
    pub status: Option<String>,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size,
            search: String::new(),
            genre: None,
            status: None,
        }
    }

    /// Number of pages needed for `item_count` rows
    pub fn page_count(&self, item_count: usize) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        item_count.div_ceil(self.page_size).max(1)
    }
}

/// One page of results plus the filtered total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPage {
    pub items: Vec<Book>,
    /// Rows matching the filters across all pages
    pub item_count: usize,
}

/// Filter, order newest first, and slice out the requested page
pub fn apply(books: Vec<Book>, query: &ListQuery) -> BookPage {
    let needle = query.search.trim().to_lowercase();

    let mut matching: Vec<Book> = books
        .into_iter()
        .filter(|b| {
            needle.is_empty()
                || b.title.to_lowercase().contains(&needle)
                || b.author.to_lowercase().contains(&needle)
        })
        .filter(|b| filter_matches(query.genre.as_deref(), &b.genre))
        .filter(|b| filter_matches(query.status.as_deref(), &b.status))
        .collect();

    matching.sort_by(|a, b| b.id.cmp(&a.id));

    let item_count = matching.len();
    let start = query.page.saturating_mul(query.page_size).min(item_count);
    let end = start.saturating_add(query.page_size).min(item_count);
    let items = matching.drain(start..end).collect();

    BookPage { items, item_count }
}

fn filter_matches(filter: Option<&str>, value: &str) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => value == wanted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u64, title: &str, author: &str, genre: &str, status: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            published_year: 1990,
            status: status.to_string(),
        }
    }

    fn library() -> Vec<Book> {
        vec![
            book(1, "Dune", "Frank Herbert", "Science Fiction", "Available"),
            book(2, "Sapiens", "Yuval Noah Harari", "History", "Issued"),
            book(3, "The Road", "Cormac McCarthy", "Post-Apocalyptic", "Available"),
            book(4, "Dune Messiah", "Frank Herbert", "Science Fiction", "Issued"),
            book(5, "It", "Stephen King", "Horror", "Available"),
        ]
    }

    #[test]
    fn test_newest_first_and_total() {
        let page = apply(library(), &ListQuery::new(10));
        let ids: Vec<_> = page.items.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert_eq!(page.item_count, 5);
    }

    #[test]
    fn test_search_matches_title_or_author_case_insensitive() {
        let mut query = ListQuery::new(10);
        query.search = "  HERBERT ".to_string();
        let page = apply(library(), &query);
        assert_eq!(page.item_count, 2);

        query.search = "road".to_string();
        let page = apply(library(), &query);
        assert_eq!(page.items[0].id, 3);
    }

    #[test]
    fn test_genre_and_status_filters_combine() {
        let mut query = ListQuery::new(10);
        query.genre = Some("Science Fiction".to_string());
        query.status = Some("Issued".to_string());

        let page = apply(library(), &query);
        assert_eq!(page.item_count, 1);
        assert_eq!(page.items[0].title, "Dune Messiah");
    }

    #[test]
    fn test_blank_filter_is_ignored() {
        let mut query = ListQuery::new(10);
        query.genre = Some(String::new());
        assert_eq!(apply(library(), &query).item_count, 5);
    }

    #[test]
    fn test_pagination_slices_after_filtering() {
        let mut query = ListQuery::new(2);
        query.page = 1;
        let page = apply(library(), &query);
        let ids: Vec<_> = page.items.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(page.item_count, 5);
        assert_eq!(query.page_count(page.item_count), 3);

        query.page = 9;
        let page = apply(library(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.item_count, 5);
    }
}
