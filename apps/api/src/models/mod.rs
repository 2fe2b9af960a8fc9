pub mod listing;
pub mod search;
pub mod user;
