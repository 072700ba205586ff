//! # sapore-client: REST Backend Client
//!
//! Everything that leaves the process goes through this crate.
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          sapore-client                                  │
//! │                                                                         │
//! │  config ──► ApiClient::new(config, session)                             │
//! │                 │                                                       │
//! │                 ├── http        transport, bearer auth, error mapping  │
//! │                 ├── endpoints   customers, products, orders, expenses, │
//! │                 │               ingredients, pricing, auth             │
//! │                 ├── board       pricing lists + optimistic commit      │
//! │                 ├── debounce    ingredient search timer                │
//! │                 └── photo       image file → data URL                  │
//! │                                                                         │
//! │  session   SessionStore (file / memory) holding one token              │
//! │  error     ClientError + UserNotice                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```no_run
//! use sapore_client::{ApiClient, ClientConfig, Session};
//!
//! # async fn run() -> sapore_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let session = Session::in_memory();
//! let client = ApiClient::new(&config, session)?;
//!
//! client.login("ana@santsapore.com.br", "segredo").await?;
//! let customers = client.list_customers().await?;
//! println!("{} customers", customers.len());
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod config;
pub mod debounce;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod photo;
pub mod session;

pub use board::{BoardLists, PricingBoard};
pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult, NoticeKind, UserNotice};
pub use http::ApiClient;
pub use session::{CurrentUser, Session, SessionStore};
