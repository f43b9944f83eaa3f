//! Client-side engine for a book inventory dashboard.
//!
//! The crate talks to a remote `/books` REST service and keeps an in-memory
//! copy of the collection with filtered, paginated views over it. Three
//! pieces cooperate: the [`api::CatalogApi`] client issues the four remote
//! operations, the [`store::CatalogStore`] holds the fetched collection and
//! derives the visible slice, and the [`controller::CatalogController`]
//! sequences user intents so the store only ever changes in lockstep with
//! confirmed remote mutations. Rendering is left entirely to the caller.

pub mod api;
pub mod controller;
pub mod error;
pub mod models;
pub mod store;

pub use api::{CatalogApi, RestCatalog, DEFAULT_BASE_URL};
pub use controller::{CatalogController, EventSink, Overlay, Toast, ToastLevel, WriteKind};
pub use error::{CatalogError, Result};
pub use models::{Book, BookDraft, BookFields, BookStatus, Genre, MIN_PUBLICATION_YEAR};
pub use store::{CatalogStore, CatalogView, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
