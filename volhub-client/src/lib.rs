//! VolHub client library
//!
//! Client-side session bootstrap and API access for the volunteer
//! coordination backend: identity exchange with guest fallback, a
//! TTL-bounded session store, and a typed REST client. Domain models
//! and the registration workflow live in `volhub-core`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod store;
pub mod telegram;

pub use api::{ApiClient, VerifyResponse, INIT_DATA_HEADER};
pub use auth::{AuthState, ExchangeResult, SessionController};
pub use config::Config;
pub use error::{ClientError, Result};
pub use store::{MemoryBackend, Session, SessionStore, SqliteBackend, StorageBackend};
pub use telegram::{
    make_guest_profile, HostEnvironment, IdentityAssertion, NoHost, StaticHost, TelegramUser,
};
