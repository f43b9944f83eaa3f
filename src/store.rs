use crate::error::{CatalogError, Result};
use crate::models::{Book, BookStatus, Genre};

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];

/// In-memory copy of the remote collection plus the view parameters.
///
/// The collection keeps service insertion order and is only mutated in
/// lockstep with confirmed remote operations; nothing here survives a
/// restart. [`CatalogStore::view`] is a pure function of the collection and
/// the current filter and page parameters.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    books: Vec<Book>,
    search: String,
    genre: Option<Genre>,
    status: Option<BookStatus>,
    page: usize,
    page_size: usize,
}

/// The slice of the collection currently visible, plus the total filtered
/// count for the pagination control.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub items: Vec<Book>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl Default for CatalogStore {
    fn default() -> Self {
        CatalogStore {
            books: Vec::new(),
            search: String::new(),
            genre: None,
            status: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        CatalogStore::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Wholesale replace after a successful list fetch.
    pub fn replace_all(&mut self, records: Vec<Book>) {
        self.books = records;
    }

    /// Appends a record the service has confirmed.
    pub fn insert(&mut self, record: Book) {
        self.books.push(record);
    }

    /// Swaps in the confirmed replacement for the record with `id`.
    pub fn replace_one(&mut self, id: &str, record: Book) -> Result<()> {
        match self.books.iter_mut().find(|book| book.id == id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(CatalogError::NotFound { id: id.to_string() }),
        }
    }

    /// Drops the record with `id`, returning it.
    pub fn remove_one(&mut self, id: &str) -> Result<Book> {
        match self.books.iter().position(|book| book.id == id) {
            Some(index) => Ok(self.books.remove(index)),
            None => Err(CatalogError::NotFound { id: id.to_string() }),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn genre_filter(&self) -> Option<Genre> {
        self.genre
    }

    pub fn status_filter(&self) -> Option<BookStatus> {
        self.status
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_genre_filter(&mut self, genre: Option<Genre>) {
        self.genre = genre;
    }

    pub fn set_status_filter(&mut self, status: Option<BookStatus>) {
        self.status = status;
    }

    pub fn set_filters(
        &mut self,
        search: impl Into<String>,
        genre: Option<Genre>,
        status: Option<BookStatus>,
    ) {
        self.search = search.into();
        self.genre = genre;
        self.status = status;
    }

    pub fn set_page(&mut self, index: usize) {
        self.page = index;
    }

    /// Changing the page size jumps back to the first page so the view never
    /// lands past the end of the filtered set.
    pub fn set_page_size(&mut self, size: usize) {
        if size == 0 {
            log::warn!("ignoring page size of 0");
            return;
        }
        self.page_size = size;
        self.page = 0;
    }

    /// The visible slice: search over title and author (case-insensitive),
    /// exact genre and status filters, collection order preserved, then the
    /// current page window.
    pub fn view(&self) -> CatalogView {
        let needle = self.search.to_lowercase();
        let matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|book| {
                let title_match = book.title.to_lowercase().contains(&needle);
                let author_match = book.author.to_lowercase().contains(&needle);
                let genre_match = self.genre.map(|genre| book.genre == genre).unwrap_or(true);
                let status_match = self
                    .status
                    .map(|status| book.status == status)
                    .unwrap_or(true);
                (title_match || author_match) && genre_match && status_match
            })
            .collect();

        let total = matches.len();
        let items = matches
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        CatalogView {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, author: &str, genre: Genre, status: BookStatus) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            genre,
            year: 1965,
            status,
        }
    }

    fn seeded() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_all(vec![
            book("1", "Dune", "Herbert", Genre::Fiction, BookStatus::Available),
            book("2", "Cosmos", "Sagan", Genre::Science, BookStatus::Issued),
            book("3", "Dune Messiah", "Herbert", Genre::Fiction, BookStatus::Issued),
            book("4", "The Hobbit", "Tolkien", Genre::Fantasy, BookStatus::Available),
        ]);
        store
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let mut store = CatalogStore::new();
        store.replace_all(vec![book(
            "1",
            "Dune",
            "Herbert",
            Genre::Fiction,
            BookStatus::Available,
        )]);
        store.set_search("dune");

        let view = store.view();
        assert_eq!(view.total, 1);
        assert_eq!(view.items[0].id, "1");
    }

    #[test]
    fn search_matches_author_too() {
        let mut store = seeded();
        store.set_search("HERBERT");

        let view = store.view();
        assert_eq!(view.total, 2);
        assert!(view.items.iter().all(|b| b.author == "Herbert"));
    }

    #[test]
    fn filters_compose_and_keep_collection_order() {
        let mut store = seeded();
        store.set_filters("", Some(Genre::Fiction), Some(BookStatus::Issued));
        let view = store.view();
        assert_eq!(view.total, 1);
        assert_eq!(view.items[0].id, "3");

        store.set_filters("", None, None);
        let view = store.view();
        let ids: Vec<&str> = view.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let store = seeded();
        assert_eq!(store.view().total, 4);
    }

    #[test]
    fn page_window_never_exceeds_page_size() {
        let mut store = seeded();
        store.set_page_size(3);
        let first = store.view();
        assert_eq!(first.items.len(), 3);
        assert_eq!(first.total, 4);

        store.set_page(1);
        let second = store.view();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, "4");
        assert_eq!(second.total, 4);
    }

    #[test]
    fn page_past_the_end_is_empty_but_total_stands() {
        let mut store = seeded();
        store.set_page(9);
        let view = store.view();
        assert!(view.items.is_empty());
        assert_eq!(view.total, 4);
    }

    #[test]
    fn changing_page_size_resets_to_the_first_page() {
        let mut store = seeded();
        store.set_page(2);
        store.set_page_size(25);

        let view = store.view();
        assert_eq!(view.page, 0);
        assert_eq!(view.page_size, 25);
    }

    #[test]
    fn zero_page_size_is_ignored() {
        let mut store = seeded();
        store.set_page_size(0);
        assert_eq!(store.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn set_filters_is_idempotent() {
        let mut store = seeded();
        store.set_filters("dune", Some(Genre::Fiction), None);
        let first = store.view();
        store.set_filters("dune", Some(Genre::Fiction), None);
        assert_eq!(store.view(), first);
    }

    #[test]
    fn inserted_record_shows_up_exactly_once() {
        let mut store = seeded();
        store.insert(book(
            "5",
            "Foundation",
            "Asimov",
            Genre::Fiction,
            BookStatus::Available,
        ));

        let view = store.view();
        assert_eq!(view.total, 5);
        let hits = view.items.iter().filter(|b| b.id == "5").count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn replace_one_swaps_the_record_in_place() {
        let mut store = seeded();
        let mut updated = store.get("1").expect("seeded record").clone();
        updated.status = BookStatus::Issued;
        store.replace_one("1", updated).expect("record exists");

        let ids: Vec<&str> = store.books().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(store.get("1").expect("record").status, BookStatus::Issued);
    }

    #[test]
    fn removed_record_never_reappears_and_total_drops() {
        let mut store = seeded();
        let before = store.view().total;
        store.remove_one("1").expect("record exists");

        let view = store.view();
        assert_eq!(view.total, before - 1);
        assert!(view.items.iter().all(|b| b.id != "1"));
        assert!(store.get("1").is_none());
    }

    #[test]
    fn missing_ids_signal_not_found() {
        let mut store = seeded();
        assert!(matches!(
            store.remove_one("99"),
            Err(CatalogError::NotFound { id }) if id == "99"
        ));
        let stray = book("99", "X", "Y", Genre::History, BookStatus::Available);
        assert!(matches!(
            store.replace_one("99", stray),
            Err(CatalogError::NotFound { .. })
        ));
    }
}
