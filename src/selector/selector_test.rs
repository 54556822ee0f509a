use super::*;
use crate::ClusterEndpoints;

fn pool(databases: &[&str]) -> CampaignConfig {
    CampaignConfig {
        clusters: vec![
            ClusterEndpoints {
                urls: vec!["http://c0-a:8080".to_string(), "http://c0-b:8080".to_string()],
                credential: Some("campaign-client".to_string()),
            },
            ClusterEndpoints {
                urls: vec!["http://c1-a:8080".to_string()],
                credential: None,
            },
        ],
        databases: databases.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn random_strategy_should_fail_fast_without_drawable_databases() {
    let strategy = FirstClusterRandomDatabase::new();

    assert!(strategy.initialize(&pool(&[])).is_err());
    assert!(strategy.initialize(&pool(&["db0"])).is_err());
    assert!(strategy.initialize(&pool(&["db0", "db1"])).is_ok());
}

#[test]
fn random_strategy_should_fail_when_never_initialized() {
    let strategy = FirstClusterRandomDatabase::new();
    assert!(strategy.next_test_config().is_err());
}

#[test]
fn random_strategy_should_reserve_database_index_zero() {
    let campaign = pool(&["db0", "db1", "db2", "db3"]);
    for _ in 0..50 {
        let strategy = FirstClusterRandomDatabase::new();
        strategy.initialize(&campaign).unwrap();
        let config = strategy.next_test_config().unwrap();
        assert_ne!(config.database_name, "db0");
        assert!(campaign.databases.contains(&config.database_name));
    }
}

#[test]
fn random_strategy_should_pair_with_first_cluster() {
    let campaign = pool(&["db0", "db1"]);
    let strategy = FirstClusterRandomDatabase::new();
    strategy.initialize(&campaign).unwrap();

    let config = strategy.next_test_config().unwrap();

    assert_eq!(config.cluster_urls, campaign.clusters[0].urls);
    assert_eq!(config.client_credential.as_deref(), Some("campaign-client"));
    assert_eq!(config.database_name, "db1");
    assert_eq!(config.strategy_name, "first-cluster-random-db");
}

#[test]
fn random_draw_should_freeze_after_first_read_until_reinitialized() {
    let campaign = pool(&["db0", "db1", "db2", "db3", "db4", "db5", "db6", "db7"]);
    let strategy = FirstClusterRandomDatabase::new();
    strategy.initialize(&campaign).unwrap();

    let first = strategy.next_test_config().unwrap();
    for _ in 0..20 {
        assert_eq!(strategy.next_test_config().unwrap(), first);
    }

    // reinitializing starts a fresh activation epoch with a fresh draw
    strategy.initialize(&campaign).unwrap();
    let redrawn = strategy.next_test_config().unwrap();
    assert!(campaign.databases.contains(&redrawn.database_name));
    assert_ne!(redrawn.database_name, "db0");
}

#[test]
fn round_robin_strategy_should_cycle_clusters() {
    let campaign = pool(&["db0", "db1"]);
    let strategy = RoundRobinCluster::new();
    strategy.initialize(&campaign).unwrap();

    let a = strategy.next_test_config().unwrap();
    let b = strategy.next_test_config().unwrap();
    let c = strategy.next_test_config().unwrap();

    assert_eq!(a.cluster_urls, campaign.clusters[0].urls);
    assert_eq!(b.cluster_urls, campaign.clusters[1].urls);
    assert_eq!(c.cluster_urls, campaign.clusters[0].urls);
    assert_eq!(a.database_name, "db0");
}

#[test]
fn registry_should_activate_default_strategy() {
    let registry = SelectorRegistry::new(&pool(&["db0", "db1"])).unwrap();
    assert_eq!(registry.active().name(), "first-cluster-random-db");
}

#[test]
fn registry_should_list_strategies_sorted_by_name() {
    let registry = SelectorRegistry::new(&pool(&["db0", "db1"])).unwrap();

    let strategies = registry.list();

    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[0].name, "first-cluster-random-db");
    assert_eq!(strategies[1].name, "round-robin-cluster");
    assert!(!strategies[0].description.is_empty());
}

#[test]
fn set_active_should_return_false_for_unknown_name() {
    let registry = SelectorRegistry::new(&pool(&["db0", "db1"])).unwrap();

    assert!(!registry.set_active("no-such-strategy").unwrap());
    assert_eq!(registry.active().name(), "first-cluster-random-db");
}

#[test]
fn set_active_should_swap_to_known_strategy() {
    let registry = SelectorRegistry::new(&pool(&["db0", "db1"])).unwrap();

    assert!(registry.set_active("round-robin-cluster").unwrap());
    assert_eq!(registry.active().name(), "round-robin-cluster");
}

#[test]
fn reactivating_random_strategy_should_start_a_fresh_activation_epoch() {
    let registry = SelectorRegistry::new(&pool(&["db0", "db1"])).unwrap();
    let before = registry.active();
    let frozen = before.next_test_config().unwrap();
    assert_eq!(before.next_test_config().unwrap(), frozen);

    assert!(registry.set_active("first-cluster-random-db").unwrap());
    let after = registry.active();

    // a fresh instance serves the new epoch; the old one stays frozen
    assert!(!std::ptr::eq(
        Arc::as_ptr(&before) as *const (),
        Arc::as_ptr(&after) as *const ()
    ));
    assert_eq!(before.next_test_config().unwrap(), frozen);
}
