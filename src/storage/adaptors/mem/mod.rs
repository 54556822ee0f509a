pub mod mem_campaign_store;

pub use mem_campaign_store::*;
