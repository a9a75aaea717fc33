pub mod listing;

pub use listing::{Listing, ListingQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
