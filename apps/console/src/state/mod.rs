//! # State Module
//!
//! Everything a command needs, built once per invocation and passed in
//! explicitly. Nothing is global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppContext                                      │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ ClientConfig │  │  ApiClient   │  │ PricingBoard │  │ Debouncer  │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │ console.toml │  │ reqwest +    │  │ Arc<..>      │  │ ingredient │  │
//! │  │ + SAPORE_*   │  │ Session      │  │ pending /    │  │ search     │  │
//! │  │              │  │ (token file) │  │ priced       │  │ timer      │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Session: RwLock inside the store                                     │
//! │  • PricingBoard: tokio Mutex, shared with its refetch task              │
//! │  • Debouncer: owns at most one pending timer                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod context;

pub use context::AppContext;
