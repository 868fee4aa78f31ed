//! Service contracts the domains depend on instead of the concrete client.

pub mod listing;

pub use listing::ListingApiService;
