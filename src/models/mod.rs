pub mod filters;
pub mod party;
pub mod rates;
pub mod search;
pub mod selection;
