// -
// Database namespaces

/// Sled database tree namespaces
pub(crate) const TEST_RECORD_TREE: &str = "_test_record_tree";
pub(crate) const ROUND_STATE_TREE: &str = "_round_state_tree";

/// Sled entry key namespaces
pub(crate) const ROUND_STATE_KEY: &str = "_campaign_round_state";

// -
// Selector strategy tags

pub(crate) const FIRST_CLUSTER_RANDOM_DB: &str = "first-cluster-random-db";
pub(crate) const ROUND_ROBIN_CLUSTER: &str = "round-robin-cluster";

// -
// Registration sentinels

/// Round value carried literally when a client could not resolve its round
pub const UNRESOLVED_ROUND: i64 = -1;
