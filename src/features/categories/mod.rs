//! Storefront categories: public navigation and admin listing.
//!
//! The flat list comes from the upstream catalog API and is turned into a
//! sorted forest by [`tree`].
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories?tree=bool` | No | Active categories, flat or nested |
//! | GET | `/api/categories/{slug}` | No | Active category with its subtree |
//! | GET | `/api/admin/categories` | Basic (optional) | Admin tree or flat search results |
//! | POST | `/api/admin/categories/refresh` | Basic (optional) | Invalidate the cached list |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod tree;

pub use clients::{CatalogApiClient, CategorySource};
pub use services::CategoryService;
pub use tree::InactivePolicy;
