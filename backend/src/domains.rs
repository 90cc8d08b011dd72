pub mod farm_client;
pub mod tracking_client;
