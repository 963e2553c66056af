#[cfg(test)]
mod tests {
    use crate::logic::{book_class, validate_booking, BookClassRequest};
    use crate::timezone::{convert_naive, format_12h};
    use chrono::{Duration, NaiveDate};
    use chrono_tz::Tz;
    use fitbook_common::models::{NewClass, DATETIME_FORMAT};
    use fitbook_common::FitbookError;
    use fitbook_db::{
        init_schema, ClassRepository, DbClient, SqlBookingRepository, SqlClassRepository,
    };
    use proptest::prelude::*;
    use serde_json::json;

    // Zones without daylight saving, so conversions are exact inverses
    const FIXED_ZONES: [Tz; 4] = [Tz::UTC, Tz::Asia__Kolkata, Tz::Asia__Tokyo, Tz::Asia__Kathmandu];

    // Helper function to build a stored datetime string from an offset in minutes
    fn stored_datetime(minutes_from_epoch: i64) -> String {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (start + Duration::minutes(minutes_from_epoch))
            .format(DATETIME_FORMAT)
            .to_string()
    }

    proptest! {
        #[test]
        fn test_rebase_round_trip_between_fixed_zones(
            minutes in 0..5_000_000i64,
            from_idx in 0..4usize,
            to_idx in 0..4usize,
        ) {
            let stored = stored_datetime(minutes);
            let from = FIXED_ZONES[from_idx];
            let to = FIXED_ZONES[to_idx];

            let there = convert_naive(&stored, from, to).unwrap();
            let back = convert_naive(&there, to, from).unwrap();
            prop_assert_eq!(back, stored);
        }

        #[test]
        fn test_format_12h_never_fails(input in ".{0,30}") {
            let rendered = format_12h(&input);
            prop_assert!(!rendered.is_empty() || input.is_empty());
        }

        #[test]
        fn test_blank_names_are_rejected(blank in "[ \t\n]{0,5}") {
            let err = validate_booking(&BookClassRequest {
                class_id: Some(json!(1)),
                client_name: Some(blank.clone()),
                client_email: Some(blank),
            })
            .unwrap_err();
            match err {
                FitbookError::ValidationError(messages) => {
                    prop_assert!(messages.contains(&"client_name is required".to_string()));
                    prop_assert!(messages.contains(&"client_email is required".to_string()));
                }
                other => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_slots_never_go_negative(slots in 0..5i64, attempts in 0..10usize) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (successes, conflicts, remaining) = rt.block_on(async {
                let db = DbClient::in_memory().await.unwrap();
                init_schema(&db).await.unwrap();
                let classes = SqlClassRepository::new(db.clone());
                let bookings = SqlBookingRepository::new(db);
                let class = classes
                    .insert(NewClass {
                        name: "Spin".to_string(),
                        datetime: "2025-06-10 07:00:00".to_string(),
                        instructor: "Dana".to_string(),
                        available_slots: slots,
                    })
                    .await
                    .unwrap();

                let mut successes = 0i64;
                let mut conflicts = 0i64;
                for i in 0..attempts {
                    let request = BookClassRequest {
                        class_id: Some(json!(class.id)),
                        client_name: Some(format!("Client {}", i)),
                        client_email: Some(format!("c{}@example.com", i)),
                    };
                    match book_class(&bookings, Tz::UTC, &request).await {
                        Ok(_) => successes += 1,
                        Err(FitbookError::ConflictError(_)) => conflicts += 1,
                        Err(other) => panic!("unexpected error {:?}", other),
                    }
                }
                let remaining = classes
                    .find_by_id(class.id)
                    .await
                    .unwrap()
                    .unwrap()
                    .available_slots;
                (successes, conflicts, remaining)
            });

            prop_assert_eq!(successes, slots.min(attempts as i64));
            prop_assert_eq!(successes + conflicts, attempts as i64);
            prop_assert_eq!(remaining, slots - successes);
            prop_assert!(remaining >= 0);
        }
    }
}
