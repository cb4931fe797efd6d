// sutro-api: Async Rust client for the Sutro pool monitor GraphQL API

pub mod auth;
pub mod client;
pub mod error;
pub mod graphql;
pub mod models;
pub mod transport;

pub use auth::{LoginClient, LoginResult};
pub use client::SutroClient;
pub use error::Error;
pub use graphql::DEFAULT_ENDPOINT;
pub use models::{
    Device, Hub, LatestRecommendations, Me, Pool, Reading, Recommendation, Snapshot,
};
pub use transport::{Method, Transport, TransportConfig};
