pub mod client;
pub mod payload;
pub mod response;

pub use client::{BackendClient, Endpoint, RequestBody};
pub use response::Decode;
