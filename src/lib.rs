// Care Finder - Core Library
// Exposes all modules for use in the TUI, the API server, and tests

pub mod provider;
pub mod catalog;
pub mod search;
pub mod render;
pub mod notify;
pub mod support;
pub mod records;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use provider::{
    ProviderRecord, SPECIALTY_OPTIONS, DISTANCE_OPTIONS,
    canonical_specialty, canonical_distance,
};
pub use catalog::{
    CatalogError, ProviderSource, StaticCatalog,
    fixture_providers, validate_catalog, load_catalog, load_csv, load_json,
};
pub use search::{
    QueryState, SearchController, CatalogStatus, QueryTicket,
    filter_providers, matches, matches_search, matches_specialty,
};
pub use render::{
    StarRating, ProviderCard, ResultView,
    star_rating, compose_results, compose_view, results_heading,
};
pub use notify::{Notifier, Toast, ToastLevel, ToastLog, TracingNotifier};
pub use support::{SupportError, SupportRequest, SupportTicket, SupportTopic};
pub use records::{VisitRecord, TestResult, ResultStatus, recent_visits, test_results};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
