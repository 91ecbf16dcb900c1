//! Property tests: random register/cancel sequences never break seat accounting.

#![allow(clippy::unwrap_used)]

use atelier_core::{BookingError, BookingStatus};
use atelier_testing::fixtures;
use futures::executor::block_on;
use proptest::prelude::*;
use proptest::test_runner::Config;

#[derive(Clone, Debug)]
enum Op {
    Register { participant: u8, seats: u32 },
    Cancel { participant: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0_u8..8, 1_u32..=5).prop_map(|(participant, seats)| Op::Register { participant, seats }),
        2 => (0_u8..8).prop_map(|participant| Op::Cancel { participant }),
    ]
}

fn address(participant: u8) -> String {
    format!("guest{participant}@example.com")
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn seat_counter_tracks_active_bookings(
        capacity in 1_u32..=12,
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let (service, store) = fixtures::service();
        let id = block_on(service.create_workshop(fixtures::published_draft(capacity))).unwrap().id;

        for op in ops {
            let before = store.workshop(id).unwrap();
            let bookings_before = store.bookings_for(id);

            let result = match &op {
                Op::Register { participant, seats } => block_on(
                    service.register(id, fixtures::registration(&address(*participant), *seats)),
                )
                .map(|_| ()),
                Op::Cancel { participant } => {
                    let email = fixtures::email(&address(*participant));
                    let target = bookings_before
                        .iter()
                        .rev()
                        .find(|b| b.participant.email == email)
                        .map(|b| b.registration_number.clone());
                    match target {
                        Some(number) => block_on(service.cancel_registration(number, &email, None)).map(|_| ()),
                        None => Ok(()),
                    }
                }
            };

            let after = store.workshop(id).unwrap();
            prop_assert!(after.current_participants <= after.max_participants);
            prop_assert_eq!(after.current_participants, store.active_seats(id));

            match result {
                Ok(()) => {}
                Err(
                    BookingError::FullyBooked { .. }
                    | BookingError::AlreadyRegistered
                    | BookingError::AlreadyCancelled,
                ) => {
                    // Rejections leave no trace.
                    prop_assert_eq!(&after, &before);
                    prop_assert_eq!(store.bookings_for(id), bookings_before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        let confirmed_seats: u32 = store
            .bookings_for(id)
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .map(|b| b.number_of_seats.get())
            .sum();
        prop_assert_eq!(store.workshop(id).unwrap().current_participants, confirmed_seats);
    }
}
