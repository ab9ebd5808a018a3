//! Book REST client
//!
//! `HttpBookApi` talks to `/api/books` over reqwest. `MemoryBookApi` keeps the
//! same contract in process for tests and `--demo`.

use super::query::{self, BookPage, ListQuery};
use super::{Book, BookDraft};
use crate::config::{ApiConfig, BOOKS_PATH};
use crate::errors::ApiError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// CRUD over the book collection
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Every stored book, in server order
    async fn fetch_all(&self) -> Result<Vec<Book>, ApiError>;

    async fn get(&self, id: u64) -> Result<Book, ApiError>;

    async fn create(&self, draft: &BookDraft) -> Result<Book, ApiError>;

    async fn update(&self, id: u64, draft: &BookDraft) -> Result<(), ApiError>;

    async fn delete(&self, id: u64) -> Result<(), ApiError>;

    /// Fetch everything, then search/filter/sort/page locally
    async fn list(&self, query: &ListQuery) -> Result<BookPage, ApiError> {
        let all = self.fetch_all().await?;
        Ok(query::apply(all, query))
    }
}

/// reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpBookApi {
    client: reqwest::Client,
    collection: url::Url,
}

impl HttpBookApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason,
        };

        let base = url::Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        let collection = base.join(BOOKS_PATH).map_err(|e| invalid(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::debug!(url = %collection, "Book API client ready");
        Ok(Self { client, collection })
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{id}", self.collection.as_str().trim_end_matches('/'))
    }
}

fn check(response: &reqwest::Response, context: &'static str) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        tracing::warn!(status = status.as_u16(), context, "Book API request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            context,
        })
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn fetch_all(&self) -> Result<Vec<Book>, ApiError> {
        let response = self.client.get(self.collection.clone()).send().await?;
        check(&response, "Failed to fetch books")?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get(&self, id: u64) -> Result<Book, ApiError> {
        let response = self.client.get(self.item_url(id)).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::NotFound(id));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, draft: &BookDraft) -> Result<Book, ApiError> {
        let response = self
            .client
            .post(self.collection.clone())
            .json(draft)
            .send()
            .await?;
        check(&response, "Failed to create book")?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn update(&self, id: u64, draft: &BookDraft) -> Result<(), ApiError> {
        let response = self.client.put(self.item_url(id)).json(draft).send().await?;
        check(&response, "Failed to update book")
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        check(&response, "Failed to delete book")
    }
}

/// In-process book store
#[derive(Debug, Default)]
pub struct MemoryBookApi {
    books: Mutex<Vec<Book>>,
    failing: AtomicBool,
}

impl MemoryBookApi {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            failing: AtomicBool::new(false),
        }
    }

    /// A small library for demo mode
    pub fn seeded() -> Self {
        let sample = [
            ("The Midnight Library", "Matt Haig", "Fantasy", 2020, "Available"),
            ("Sapiens", "Yuval Noah Harari", "History", 2011, "Issued"),
            ("Dune", "Frank Herbert", "Science Fiction", 1965, "Available"),
            ("Educated", "Tara Westover", "Memoir", 2018, "Available"),
            ("1984", "George Orwell", "Dystopian", 1949, "Issued"),
            ("The Road", "Cormac McCarthy", "Post-Apocalyptic", 2006, "Available"),
            ("Meditations", "Marcus Aurelius", "Philosophy", 1558, "Available"),
            ("Atomic Habits", "James Clear", "Self-Help", 2018, "Issued"),
            ("Pride and Prejudice", "Jane Austen", "Romance", 1813, "Available"),
            ("The Shining", "Stephen King", "Horror", 1977, "Available"),
            ("Gone Girl", "Gillian Flynn", "Thriller", 2012, "Issued"),
            ("Steve Jobs", "Walter Isaacson", "Biography", 2011, "Available"),
        ];

        let books = sample
            .into_iter()
            .zip(1u64..)
            .map(|((title, author, genre, year, status), id)| Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                genre: genre.to_string(),
                published_year: year,
                status: status.to_string(),
            })
            .collect();
        Self::new(books)
    }

    /// Make every call fail with a 500 until switched back
    #[cfg(test)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn guard(&self, context: &'static str) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 500,
                context,
            })
        } else {
            Ok(())
        }
    }

    fn books(&self) -> std::sync::MutexGuard<'_, Vec<Book>> {
        self.books.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BookApi for MemoryBookApi {
    async fn fetch_all(&self) -> Result<Vec<Book>, ApiError> {
        self.guard("Failed to fetch books")?;
        Ok(self.books().clone())
    }

    async fn get(&self, id: u64) -> Result<Book, ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::NotFound(id));
        }
        self.books()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(ApiError::NotFound(id))
    }

    async fn create(&self, draft: &BookDraft) -> Result<Book, ApiError> {
        self.guard("Failed to create book")?;
        let mut books = self.books();
        let id = books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let book = draft.clone().into_book(id);
        books.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: u64, draft: &BookDraft) -> Result<(), ApiError> {
        self.guard("Failed to update book")?;
        let mut books = self.books();
        let slot = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::Status {
                status: 404,
                context: "Failed to update book",
            })?;
        *slot = draft.clone().into_book(id);
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.guard("Failed to delete book")?;
        let mut books = self.books();
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Err(ApiError::Status {
                status: 404,
                context: "Failed to delete book",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            genre: "Science Fiction".to_string(),
            published_year: 1969,
            status: "Available".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_crud_cycle() {
        let api = MemoryBookApi::default();

        let created = api.create(&draft("The Left Hand of Darkness")).await.unwrap();
        assert_eq!(created.id, 1);

        let mut edited = draft("The Dispossessed");
        edited.status = "Issued".to_string();
        api.update(created.id, &edited).await.unwrap();

        let fetched = api.get(created.id).await.unwrap();
        assert_eq!(fetched.title, "The Dispossessed");
        assert_eq!(fetched.status, "Issued");

        api.delete(created.id).await.unwrap();
        assert!(matches!(api.get(created.id).await, Err(ApiError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_memory_list_applies_query() {
        let api = MemoryBookApi::seeded();
        let mut query = ListQuery::new(5);
        query.status = Some("Issued".to_string());

        let page = api.list(&query).await.unwrap();
        assert_eq!(page.item_count, 4);
        assert!(page.items.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_failing_store_reports_context() {
        let api = MemoryBookApi::seeded();
        api.set_failing(true);

        let err = api.delete(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete book (HTTP 500)");

        api.set_failing(false);
        assert!(api.delete(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_book_fails() {
        let api = MemoryBookApi::seeded();
        assert!(matches!(
            api.delete(999).await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_http_client_builds_collection_url() {
        let config = ApiConfig {
            base_url: "http://books.local:8080/".to_string(),
            timeout_secs: 5,
        };
        let api = HttpBookApi::new(&config).unwrap();
        assert_eq!(api.collection.as_str(), "http://books.local:8080/api/books");
        assert_eq!(api.item_url(7), "http://books.local:8080/api/books/7");
    }

    #[test]
    fn test_http_client_rejects_bad_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            HttpBookApi::new(&config),
            Err(ApiError::InvalidUrl { .. })
        ));
    }
}
