//! Concurrent registrations racing for the last seats.

#![allow(clippy::unwrap_used)]

use atelier_core::BookingError;
use atelier_testing::fixtures;
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_registrations_never_oversell() {
    let (service, store) = fixtures::service();
    let id = service
        .create_workshop(fixtures::published_draft(7))
        .await
        .unwrap()
        .id;

    let attempts = (0..24).map(|n| {
        let service = service.clone();
        tokio::spawn(async move {
            let seats = if n % 3 == 0 { 2 } else { 1 };
            service
                .register(id, fixtures::registration(&format!("racer{n}@example.com"), seats))
                .await
                .map(|c| c.number_of_seats.get())
        })
    });

    let mut reserved = 0;
    for outcome in join_all(attempts).await {
        match outcome.unwrap() {
            Ok(seats) => reserved += seats,
            Err(BookingError::FullyBooked { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let workshop = store.workshop(id).unwrap();
    assert!(reserved <= 7);
    assert_eq!(workshop.current_participants, reserved);
    assert_eq!(store.active_seats(id), reserved);
    // Single seats keep coming until the workshop is full.
    assert_eq!(reserved, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_cancellations_release_seats_once() {
    let (service, store) = fixtures::service();
    let id = service
        .create_workshop(fixtures::published_draft(10))
        .await
        .unwrap()
        .id;
    let booking = service
        .register(id, fixtures::registration("ada@example.com", 4))
        .await
        .unwrap();

    let attempts = (0..8).map(|_| {
        let service = service.clone();
        let number = booking.registration_number.clone();
        tokio::spawn(async move {
            service
                .cancel_registration(number, &fixtures::email("ada@example.com"), None)
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, BookingError::AlreadyCancelled))
    );
    assert_eq!(store.workshop(id).unwrap().current_participants, 0);
}
