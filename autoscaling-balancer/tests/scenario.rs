//! End-to-end balancer scenario: one connection, manual growth, bulk load.

use autoscaling_balancer::{
    Balancer, BalancerConfig, BalancerError, ConnectionId, LoadConfig, RandomPlacement,
    UniformLoad,
};

const EPSILON: f64 = 1e-9;

fn balancer(seed: u64) -> Balancer {
    Balancer::with_policy(
        RandomPlacement::seeded(seed),
        UniformLoad::seeded(LoadConfig::default(), seed),
        &BalancerConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_demo_scenario() {
    let mut lb = balancer(42);
    assert_eq!(lb.avg_load().unwrap(), 0.0);

    let admission = lb.add_connection("fdca:83d2::f20d").unwrap();
    assert!((1.0..=10.0).contains(&admission.load));
    assert!((lb.avg_load().unwrap() - admission.load).abs() < EPSILON);

    lb.add_server();
    assert_eq!(lb.server_count(), 2);
    assert!((lb.avg_load().unwrap() - admission.load / 2.0).abs() < EPSILON);

    lb.close_connection("fdca:83d2::f20d").unwrap();
    assert_eq!(lb.avg_load().unwrap(), 0.0);

    let mut scale_ups = 0;
    for connection in 0..100u32 {
        let servers = lb.server_count();
        let admission = lb.add_connection(connection).unwrap();
        if admission.scaled {
            scale_ups += 1;
            assert_eq!(lb.server_count(), servers + 1);
        } else {
            assert_eq!(lb.server_count(), servers);
            assert!(lb.avg_load().unwrap() <= 50.0);
        }
        assert_eq!(
            lb.connection_count(),
            lb.servers().iter().map(|s| s.connection_count()).sum::<usize>()
        );
    }

    assert!(scale_ups >= 1);
    assert_eq!(lb.server_count(), 2 + scale_ups);
    assert_eq!(lb.connection_count(), 100);
    assert!(lb.is_consistent());
}

#[test]
fn test_pool_never_shrinks() {
    let mut lb = balancer(3);
    let mut servers = lb.server_count();

    for connection in 0..200u32 {
        lb.add_connection(connection).unwrap();
        assert!(lb.server_count() >= servers);
        servers = lb.server_count();
    }
    for connection in 0..200u32 {
        lb.close_connection(connection).unwrap();
        assert_eq!(lb.server_count(), servers);
    }

    assert_eq!(lb.connection_count(), 0);
    assert_eq!(lb.avg_load().unwrap(), 0.0);
}

#[test]
fn test_errors_leave_state_unchanged() {
    let mut lb = balancer(11);
    for connection in 0..30u32 {
        lb.add_connection(connection).unwrap();
    }
    let snapshot = lb.to_string();
    let servers = lb.server_count();

    assert!(matches!(
        lb.add_connection(12u32),
        Err(BalancerError::Duplicate(_))
    ));
    assert!(matches!(
        lb.close_connection("missing"),
        Err(BalancerError::NotFound(_))
    ));

    assert_eq!(lb.to_string(), snapshot);
    assert_eq!(lb.server_count(), servers);
    assert_eq!(lb.connection_count(), 30);
    assert_eq!(lb.server_of(&ConnectionId::from(12u32)), lb.locate_by_scan(&ConnectionId::from(12u32)));
}

#[test]
fn test_config_file_drives_balancer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balancer.toml");
    std::fs::write(&path, "scale_threshold = 10.0\ninitial_servers = 2\n").unwrap();

    let config = BalancerConfig::from_file(&path).unwrap();
    let mut lb = Balancer::from_config(&config).unwrap();
    assert_eq!(lb.server_count(), 2);
    assert_eq!(lb.scale_threshold(), 10.0);

    for connection in 0..50u32 {
        let admission = lb.add_connection(connection).unwrap();
        assert!(admission.scaled || lb.avg_load().unwrap() <= 10.0);
    }
    assert!(lb.server_count() > 2);
}
