//! Domain documents stored in the review collections.

pub mod client;
pub mod review;

pub use client::Client;
pub use review::{Review, ReviewPayload};
