// refdesk-api: Async Rust client for the refdesk reference-data REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod filters;
pub mod resources;
pub mod session;
pub mod transport;
pub mod types;

pub use auth::{CredentialStore, MemoryCredentials};
pub use client::ApiClient;
pub use error::Error;
pub use resources::{
    Branches, Categories, Clients, Employees, ListParams, Orients, Resource, Roles, SortDirection,
    UpdateStyle,
};
pub use transport::{TlsMode, TransportConfig};
