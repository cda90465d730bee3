//! Exercises generation-indexed handle reuse across a release/allocate
//! cycle: the freed slot index is reused but the generation advances, so a
//! stale handle into that slot is never mistaken for the new occupant.

use forgelight_core::pool::ResourcePool;

#[test]
fn released_slot_is_reused_with_an_advanced_generation() {
    let mut pool: ResourcePool<&'static str> = ResourcePool::new();

    let h1 = pool.allocate("first");
    pool.release(h1);
    let h2 = pool.allocate("second");

    assert_eq!(h2.index(), h1.index());
    assert_eq!(h2.generation(), h1.generation() + 1);

    assert!(!pool.is_valid(h1));
    assert!(pool.is_valid(h2));
    assert_eq!(pool.get(h2), Some(&"second"));
}

#[test]
fn stale_handle_lookup_after_reuse_returns_none() {
    let mut pool: ResourcePool<u32> = ResourcePool::new();

    let h1 = pool.allocate(10);
    pool.release(h1);
    let h2 = pool.allocate(20);

    assert_eq!(pool.get(h1), None);
    assert_eq!(pool.get_mut(h1), None);
    assert_eq!(pool.get(h2), Some(&20));
}
