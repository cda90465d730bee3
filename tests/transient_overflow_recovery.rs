//! Exercises `TransientBufferPool` overflow-and-recovery across frame
//! boundaries: an over-capacity allocation returns an invalid sentinel and
//! leaves usage untouched, and the next `begin_frame` resets the ring so
//! the same allocation succeeds.

mod support;

use forgelight_core::transient::TransientBufferPool;
use support::{FakeDevice, NullQueue};

#[test]
fn overflowing_allocation_is_invalid_and_does_not_move_the_cursor() {
    let device = FakeDevice::new();
    let queue = NullQueue;
    let capacity = 256u64;
    let mut transient = TransientBufferPool::new(&device, capacity, capacity, capacity);
    transient.begin_frame(0, &device);

    let oversized = vec![0u8; capacity as usize + 1];
    let allocation = transient.allocate_vertices::<u8>(&queue, &oversized);
    assert!(!allocation.is_valid());
    assert_eq!(transient.stats().vertex.bytes_used, 0);

    transient.begin_frame(1, &device);
    assert_eq!(transient.stats().vertex.bytes_used, 0);

    let fits = vec![0u8; capacity as usize];
    let allocation = transient.allocate_vertices::<u8>(&queue, &fits);
    assert!(allocation.is_valid());
    assert_eq!(transient.stats().vertex.bytes_used, capacity);
}

#[test]
fn each_ring_overflows_independently() {
    let device = FakeDevice::new();
    let queue = NullQueue;
    let mut transient = TransientBufferPool::new(&device, 64, 64, 64);
    transient.begin_frame(0, &device);

    let over = vec![0u8; 65];
    assert!(!transient.allocate_indices::<u8>(&queue, &over).is_valid());
    let under = vec![0u8; 32];
    assert!(transient.allocate_vertices::<u8>(&queue, &under).is_valid());
    assert_eq!(transient.stats().index.bytes_used, 0);
    assert_eq!(transient.stats().vertex.bytes_used, 32);
}
