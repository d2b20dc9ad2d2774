//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, header helpers)
//!     → middleware/client_auth.rs (delete routes only)
//!     → handlers.rs (review endpoints)
//!     → error.rs (status code + plain-text body on failure)
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{CLIENT_ID_HEADER, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
