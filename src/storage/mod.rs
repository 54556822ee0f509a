mod adaptors;
mod campaign_store;
pub(crate) mod retry;

#[cfg(test)]
pub(crate) mod storage_suite;
#[cfg(test)]
mod retry_test;

use std::path::Path;

#[doc(hidden)]
pub use adaptors::*;
#[doc(hidden)]
pub use campaign_store::*;
use tracing::debug;
use tracing::warn;

/// campaign records storage
pub fn init_sled_campaign_db(
    sled_db_root_path: impl AsRef<Path> + std::fmt::Debug
) -> std::result::Result<sled::Db, std::io::Error> {
    debug!("init_sled_campaign_db from path: {:?}", &sled_db_root_path);

    let path = sled_db_root_path.as_ref();
    let campaign_db_path = path.join("campaign");

    sled::Config::default()
        .path(&campaign_db_path)
        .use_compression(true)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            warn!(
                "Try to open DB at this location: {:?} and failed: {:?}",
                campaign_db_path, e
            );
            std::io::Error::other(e)
        })
}
