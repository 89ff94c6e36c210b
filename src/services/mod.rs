pub mod filter_service;
pub mod flow_registry;
pub mod occupancy_service;
pub mod provider_client;
pub mod rate_catalog;
pub mod recommendation_service;
pub mod search_session;
pub mod selection_service;
