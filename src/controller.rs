use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::api::CatalogApi;
use crate::error::Result;
use crate::models::{Book, BookDraft};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastLevel {
    Success,
    Error,
}

/// Transient notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Where the controller sends its toasts. A plain closure works.
pub trait EventSink {
    fn emit(&self, toast: Toast);
}

impl<F: Fn(Toast)> EventSink for F {
    fn emit(&self, toast: Toast) {
        self(toast)
    }
}

/// The one dialog that can be open at a time. Each variant carries the
/// record it is about, so a confirmation dialog without a selected record
/// cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    /// "Book Added Successfully!" popup after a confirmed create.
    AddedConfirmation { book: Book },
    /// Edit form, prefilled from the selected record.
    Edit { book: Book },
    /// "Confirm Deletion" dialog for the selected record.
    DeleteConfirm { book: Book },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
    Delete,
}

/// Sequences user intents into client calls and store mutations.
///
/// Every action runs Idle → Pending → Success/Failed within one call; the
/// store is only touched after the service confirms, so a failed write
/// leaves the collection exactly as it was. Failures surface as toasts and
/// as the returned error, and the controller is always interactive again
/// when the call returns.
pub struct CatalogController<A: CatalogApi, S: EventSink> {
    api: A,
    events: S,
    store: CatalogStore,
    overlay: Overlay,
    loading: bool,
    pending_write: Option<WriteKind>,
    cancelled: Arc<AtomicBool>,
}

impl<A: CatalogApi, S: EventSink> CatalogController<A, S> {
    pub fn new(api: A, events: S) -> Self {
        CatalogController {
            api,
            events,
            store: CatalogStore::new(),
            overlay: Overlay::None,
            loading: false,
            pending_write: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The collection and its view parameters; the presentation layer reads
    /// `store().view()` to render the table.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Mutable access for the filter and pagination controls.
    pub fn store_mut(&mut self) -> &mut CatalogStore {
        &mut self.store
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// True while the initial list fetch is in flight (skeleton rows).
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The write currently in flight, if any, so duplicate triggers can be
    /// disabled at the source.
    pub fn pending_write(&self) -> Option<WriteKind> {
        self.pending_write
    }

    /// Handle for flagging the current fetch as stale from elsewhere, e.g.
    /// when the originating view goes away mid-request.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel_refresh(&self) {
        log::info!("cancelling catalog fetch");
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Fetches the collection and replaces the store with the result. A
    /// fetch failure degrades to an empty catalog plus an error toast; it
    /// never tears down the view. A fetch cancelled mid-flight is dropped
    /// without touching the store.
    pub fn refresh(&mut self) {
        self.cancelled.store(false, Ordering::SeqCst);
        self.loading = true;
        let result = self.api.list_all();
        self.loading = false;

        if self.cancelled.load(Ordering::SeqCst) {
            log::info!("catalog fetch cancelled, dropping response");
            return;
        }

        match result {
            Ok(books) => {
                self.store.replace_all(books);
            }
            Err(err) => {
                log::warn!("failed to fetch books: {}", err);
                self.store.replace_all(Vec::new());
                self.toast_error("Failed to fetch books");
            }
        }
    }

    /// Submits the add form. The draft is validated before anything goes on
    /// the wire; on failure the caller still holds the draft, so the form
    /// keeps its contents for a retry. Success inserts the confirmed record
    /// and opens the added-book popup.
    pub fn add_book(&mut self, draft: &BookDraft) -> Result<()> {
        let fields = draft.validated()?;
        if let Some(kind) = self.pending_write {
            log::warn!("ignoring add while a {:?} write is pending", kind);
            return Ok(());
        }

        self.pending_write = Some(WriteKind::Create);
        let result = self.api.create(&fields);
        self.pending_write = None;

        match result {
            Ok(book) => {
                log::info!("book {} (\"{}\") added", book.id, book.title);
                self.store.insert(book.clone());
                self.overlay = Overlay::AddedConfirmation { book };
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to add book: {}", err);
                self.toast_error("Failed to add book");
                Err(err)
            }
        }
    }

    /// Opens the edit form for an existing record.
    pub fn open_edit(&mut self, id: &str) -> Result<()> {
        let book = self.selected(id)?;
        self.overlay = Overlay::Edit { book };
        Ok(())
    }

    /// Saves the edit form over the record it was opened for. On failure the
    /// form stays open and the stored record is untouched; there is no
    /// partial overwrite.
    pub fn save_edit(&mut self, draft: &BookDraft) -> Result<()> {
        let book = match &self.overlay {
            Overlay::Edit { book } => book.clone(),
            _ => {
                log::warn!("ignoring save with no edit form open");
                return Ok(());
            }
        };
        let fields = draft.validated()?;
        if let Some(kind) = self.pending_write {
            log::warn!("ignoring save while a {:?} write is pending", kind);
            return Ok(());
        }

        self.pending_write = Some(WriteKind::Update);
        let result = self.api.update(&book.id, &fields);
        self.pending_write = None;

        match result {
            Ok(updated) => {
                self.store.replace_one(&book.id, updated)?;
                self.overlay = Overlay::None;
                self.toast_success("Book updated successfully");
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to update book {}: {}", book.id, err);
                self.toast_error("Failed to update book");
                Err(err)
            }
        }
    }

    /// Opens the delete confirmation dialog for an existing record.
    pub fn open_delete(&mut self, id: &str) -> Result<()> {
        let book = self.selected(id)?;
        self.overlay = Overlay::DeleteConfirm { book };
        Ok(())
    }

    /// Confirms the open delete dialog. The dialog closes whether the
    /// service accepted the delete or not, so a failure never traps the user
    /// in the dialog. A confirm with no dialog open (a stray second click
    /// after the first one resolved) is ignored.
    pub fn confirm_delete(&mut self) -> Result<()> {
        let book = match &self.overlay {
            Overlay::DeleteConfirm { book } => book.clone(),
            _ => {
                log::warn!("ignoring delete confirmation with no dialog open");
                return Ok(());
            }
        };
        if let Some(kind) = self.pending_write {
            log::warn!("ignoring delete while a {:?} write is pending", kind);
            return Ok(());
        }

        self.pending_write = Some(WriteKind::Delete);
        let result = self.api.remove(&book.id);
        self.pending_write = None;
        self.overlay = Overlay::None;

        match result {
            Ok(()) => {
                self.store.remove_one(&book.id)?;
                self.toast_success("Book deleted successfully");
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to delete book {}: {}", book.id, err);
                self.toast_error("Failed to delete book");
                Err(err)
            }
        }
    }

    /// Dismisses whatever dialog is open.
    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    fn selected(&self, id: &str) -> Result<Book> {
        match self.store.get(id) {
            Some(book) => Ok(book.clone()),
            None => Err(crate::error::CatalogError::NotFound { id: id.to_string() }),
        }
    }

    fn toast_success(&self, message: &str) {
        self.events.emit(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn toast_error(&self, message: &str) {
        self.events.emit(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}
