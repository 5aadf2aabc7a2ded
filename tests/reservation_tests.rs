//! Tests for intersection reservations

use traffic_sim::simulation::{CarId, LightId, ReservationRegistry};

#[test]
fn test_acquire_free_light() {
    let mut registry = ReservationRegistry::new();
    assert!(registry.is_empty());

    assert!(registry.acquire(LightId(1), CarId(0)));
    assert_eq!(registry.owner(LightId(1)), Some(CarId(0)));
    assert!(registry.is_held_by(LightId(1), CarId(0)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_acquire_is_idempotent_for_owner() {
    let mut registry = ReservationRegistry::new();
    assert!(registry.acquire(LightId(1), CarId(0)));
    assert!(registry.acquire(LightId(1), CarId(0)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_acquire_never_preempts() {
    let mut registry = ReservationRegistry::new();
    assert!(registry.acquire(LightId(1), CarId(0)));
    assert!(!registry.acquire(LightId(1), CarId(1)));

    assert_eq!(registry.owner(LightId(1)), Some(CarId(0)));
    assert!(registry.is_reserved_by_other(LightId(1), CarId(1)));
    assert!(!registry.is_reserved_by_other(LightId(1), CarId(0)));
}

#[test]
fn test_release_by_non_owner_is_ignored() {
    let mut registry = ReservationRegistry::new();
    registry.acquire(LightId(1), CarId(0));

    registry.release(LightId(1), CarId(1));
    assert_eq!(registry.owner(LightId(1)), Some(CarId(0)));

    registry.release(LightId(1), CarId(0));
    assert_eq!(registry.owner(LightId(1)), None);
    assert!(registry.is_empty());

    // Now free for someone else
    assert!(registry.acquire(LightId(1), CarId(1)));
}

#[test]
fn test_release_all_only_touches_one_car() {
    let mut registry = ReservationRegistry::new();
    registry.acquire(LightId(1), CarId(0));
    registry.acquire(LightId(2), CarId(0));
    registry.acquire(LightId(3), CarId(1));

    registry.release_all(CarId(0));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.owner(LightId(3)), Some(CarId(1)));
}
