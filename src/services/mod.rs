//! Services
//!
//! Business logic for the search subsystem. Services own state and policy;
//! the `api` layer below them only moves bytes.

pub mod membership;
pub mod search;

pub use membership::{MembershipChange, MembershipWatch};
pub use search::{
    RecentSearchStore, SearchConfig, SearchOutcome, SearchService, SettledSearch, SortOrder,
    SuggestionEngine, Suggestions,
};
