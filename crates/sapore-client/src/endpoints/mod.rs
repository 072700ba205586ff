//! # Backend Endpoints
//!
//! One module per resource, each adding methods to [`ApiClient`].
//!
//! ## Resource Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  auth         POST   /users/login                                       │
//! │  customers    CRUD   /customers[/{id}]                                  │
//! │  products     CRUD   /products[/{id}]                                   │
//! │  orders       CRUD   /orders[/{id}]     PATCH /orders/{id}/status       │
//! │  expenses     CRUD   /expenses[/{id}]                                   │
//! │  ingredients  CRUD   /pricing/ingredients[/{id}]   ?search=             │
//! │  pricing      GET    /pricing/products/{pending,priced}                 │
//! │               POST   /pricing/products/{id}/simulate                    │
//! │               POST   /pricing/products/{id}/pricing                     │
//! │               POST   /pricing/products/{id}/ingredients                 │
//! │               DELETE /pricing/products/{id}/ingredients/{line}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ApiClient`]: crate::http::ApiClient

pub mod auth;
pub mod customers;
pub mod expenses;
pub mod ingredients;
pub mod orders;
pub mod pricing;
pub mod products;
