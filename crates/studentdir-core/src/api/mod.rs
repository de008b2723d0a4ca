//! Read-only HTTP/JSON API over the loaded roster.
//!
//! ```text
//! ┌──────────┐        TCP          ┌──────────────┐
//! │  client  │────────────────────▶│  API server  │
//! └──────────┘  HTTP/1.1 + JSON    │  (axum)      │
//!                                  └──────┬───────┘
//!                                         │ Arc<Roster>
//!                                  ┌──────▼───────┐
//!                                  │ query engine │
//!                                  └──────────────┘
//! ```

pub mod server;
pub mod types;

pub use server::{ApiState, router, serve};
pub use types::*;
