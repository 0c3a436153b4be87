use crate::core::config::{DespawnStrategy, PoolConfig};
use crate::pooling::{HeadlessHost, InstanceHandle, Pool, Prototype};
use std::collections::HashSet;

fn new_pool(host: &mut HeadlessHost, config: PoolConfig) -> Pool {
    Pool::new(Prototype::new(1, "Projectile"), config, host).unwrap()
}

fn assert_partitioned(pool: &Pool) {
    let available: HashSet<InstanceHandle> = pool.available().collect();
    let in_use: HashSet<InstanceHandle> = pool.in_use().collect();

    assert_eq!(available.len(), pool.available_count(), "available holds duplicates");
    assert!(available.is_disjoint(&in_use));
}

#[test]
fn test_fixed_pool_hands_out_exactly_capacity() {
    for capacity in [0, 1, 2, 7] {
        let mut host = HeadlessHost::new();
        let mut pool = new_pool(&mut host, PoolConfig::new(capacity));
        pool.preallocate(&mut host).unwrap();
        assert_eq!(pool.available_count() + pool.in_use_count(), capacity);

        let handed_out: Vec<_> = (0..capacity)
            .map(|_| pool.acquire(&mut host).unwrap())
            .collect();
        assert!(handed_out.iter().all(Option::is_some));
        assert_eq!(pool.acquire(&mut host).unwrap(), None);
        assert_eq!(host.created_count(), capacity);
    }
}

#[test]
fn test_partition_holds_across_mixed_operations() {
    let mut host = HeadlessHost::new();
    let mut pool = new_pool(&mut host, PoolConfig::new(4).with_growth(true));
    pool.preallocate(&mut host).unwrap();

    let mut outstanding: Vec<InstanceHandle> = Vec::new();
    // 1 = acquire, 0 = release oldest outstanding
    let script = [1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1, 0, 0, 0];

    for step in script {
        if step == 1 {
            outstanding.push(pool.acquire(&mut host).unwrap().unwrap());
        } else if !outstanding.is_empty() {
            let handle = outstanding.remove(0);
            pool.release(&mut host, handle).unwrap();
        }
        assert_partitioned(&pool);
        assert_eq!(pool.in_use_count(), outstanding.len());
    }
}

#[test]
fn test_acquire_release_restores_pool() {
    for strategy in [DespawnStrategy::Deactivate, DespawnStrategy::Relocate] {
        let mut host = HeadlessHost::new();
        let mut pool = new_pool(&mut host, PoolConfig::new(3).with_strategy(strategy));
        pool.preallocate(&mut host).unwrap();

        let before: HashSet<InstanceHandle> = pool.available().collect();
        let handle = pool.acquire(&mut host).unwrap().unwrap();
        pool.release(&mut host, handle).unwrap();
        let after: HashSet<InstanceHandle> = pool.available().collect();

        assert_eq!(before, after);
        assert_eq!(pool.available_count(), 3);
        assert_eq!(pool.in_use_count(), 0);
        assert_eq!(host.instance(handle).unwrap().parent, Some(pool.container()));
    }
}

#[test]
fn test_clear_twice_destroys_once() {
    let mut host = HeadlessHost::new();
    let mut pool = new_pool(&mut host, PoolConfig::new(3));
    pool.preallocate(&mut host).unwrap();

    assert_eq!(pool.clear_and_destroy(&mut host).unwrap(), 3);
    assert_eq!(pool.available_count(), 0);
    assert_eq!(pool.clear_and_destroy(&mut host).unwrap(), 0);
    assert_eq!(pool.available_count(), 0);
    assert_eq!(host.destroyed_count(), 3);
}

#[test]
fn test_clear_leaves_in_use_instances_alone() {
    let mut host = HeadlessHost::new();
    let mut pool = new_pool(&mut host, PoolConfig::new(3));
    pool.preallocate(&mut host).unwrap();
    let held = pool.acquire(&mut host).unwrap().unwrap();

    assert_eq!(pool.clear_and_destroy(&mut host).unwrap(), 2);
    assert!(host.is_alive(held));
    assert!(pool.is_in_use(held));

    // Still releasable; it becomes the only resting instance
    pool.release(&mut host, held).unwrap();
    assert_eq!(pool.available().collect::<Vec<_>>(), vec![held]);
}

#[test]
fn test_growth_tracks_outstanding_acquires() {
    let mut host = HeadlessHost::new();
    let mut pool = new_pool(&mut host, PoolConfig::on_demand());

    let mut outstanding = Vec::new();
    for round in 1..=5 {
        outstanding.push(pool.acquire(&mut host).unwrap().unwrap());
        assert_eq!(pool.in_use_count(), round);
        assert_eq!(pool.available_count(), 0);
    }
    assert_eq!(pool.capacity(), 5);

    let returned = outstanding.pop().unwrap();
    pool.release(&mut host, returned).unwrap();
    assert_eq!(pool.in_use_count(), outstanding.len());

    // Reuse before growth
    assert_eq!(pool.acquire(&mut host).unwrap(), Some(returned));
    assert_eq!(host.created_count(), 5);
}

#[test]
fn test_available_queue_is_fifo() {
    let mut host = HeadlessHost::new();
    let mut pool = new_pool(&mut host, PoolConfig::new(2));
    pool.preallocate(&mut host).unwrap();
    let order: Vec<_> = pool.available().collect();

    let first = pool.acquire(&mut host).unwrap().unwrap();
    assert_eq!(first, order[0]);

    pool.release(&mut host, first).unwrap();
    assert_eq!(pool.available().collect::<Vec<_>>(), vec![order[1], first]);
}
