#![deny(unsafe_code)]

//! Student directory core.
//!
//! Holds the roster model and the directory query engine (filter, sort,
//! paginate and the pagination window), together with the per-viewer
//! session, profile form state, group chat feed and the read-only HTTP API
//! built on top of them.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future for async trait methods that
/// are called through `dyn Trait`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shutdown signal sent via broadcast channel to long-running tasks.
#[derive(Debug, Clone)]
pub struct ShutdownSignal;

/// Read-only HTTP/JSON API.
pub mod api;
/// Group search, message feed and poll loop.
pub mod chat;
/// Generic add/remove/edit form rows.
pub mod editable;
/// Filter option lists derived from a roster.
pub mod facets;
/// Student profile records.
pub mod model;
/// Profile create/edit drafts and validation.
pub mod profile;
/// Filter, sort, paginate and the pagination window.
pub mod query;
/// Roster loading and lookup.
pub mod roster;
/// Semester label parsing and ordering.
pub mod semester;
/// Per-viewer directory state.
pub mod session;

pub use api::ApiState;
pub use chat::{
    ChatError, ChatGroup, ChatMessage, ChatPoller, GroupMember, InMemoryChat, MessageFeed,
    MessageSource, member_summary,
};
pub use editable::{Blank, EditableList};
pub use facets::Facets;
pub use model::StudentRecord;
pub use profile::{ProfileDraft, ProfileError};
pub use query::{PageItem, QueryOutcome, QueryParams, SortKey, pagination_window};
pub use roster::{Roster, RosterError};
pub use session::{DirectorySession, SessionError};
