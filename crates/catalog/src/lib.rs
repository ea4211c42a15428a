//! # Dinepick Catalog
//!
//! Restaurant catalog kept in one JSON file.
//!
//! ## Flow
//!
//! ```text
//! restaurants.json ──load──> Catalog ──filter──> recommend (random pick + links)
//!        ^                    │  ^
//!        └──────save──────────┘  └── merge <── parse_upload(bytes)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use dinepick_catalog::{Config, CuisineType, Filter, Session};
//!
//! let session = Session::open(&Config::default());
//! let filter = Filter::new([CuisineType::Korean], []);
//! if let Some(pick) = session.recommend(&filter) {
//!     println!("{} -> {}", pick.record.name, pick.map_url);
//! }
//! ```

mod catalog;
mod config;
mod error;
mod import;
mod links;
mod recommend;
mod record;
mod session;
mod store;

pub use catalog::{Catalog, Filter, MergeStats};
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use error::{CatalogError, ConfigError, ImportError, Result, StoreError};
pub use import::{parse_upload, Upload, UploadedRow};
pub use links::{
    neighborhood, search_term, LinkConfig, DEFAULT_MAP_BASE_URL, DEFAULT_SEARCH_BASE_URL,
};
pub use recommend::{recommend, Recommendation};
pub use record::{
    CuisineType, PriceTier, Record, RecordPatch, FIELD_ADDRESS, FIELD_CONTACT, FIELD_CUISINE,
    FIELD_MENU, FIELD_NAME, FIELD_PRICE, REQUIRED_FIELDS,
};
pub use session::{ImportReport, Notice, Session};
pub use store::{Loaded, Store, DEFAULT_DATA_FILE};
