pub mod sled_campaign_store;

pub use sled_campaign_store::*;
