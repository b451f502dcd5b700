//! Golden tests for appointment enrichment.
//!
//! Each case pins the derived consultation facts for a fixed "today".

use cabinet_core::models::{Appointment, AppointmentStatus};
use cabinet_core::roster::enrich;
use cabinet_core::{timeutil, Patient};

/// One appointment in the book: (time, status, by_foreign_key).
/// Name-matched entries carry the patient's name instead of their id.
struct BookEntry {
    time: &'static str,
    status: AppointmentStatus,
    by_foreign_key: bool,
}

struct GoldenCase {
    id: &'static str,
    today: &'static str,
    book: Vec<BookEntry>,
    expected_count: usize,
    expected_last: Option<&'static str>,
    expected_next: Option<&'static str>,
    expected_new: bool,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "one-past-one-upcoming",
            today: "2024-03-15T11:00:00Z",
            book: vec![
                BookEntry {
                    time: "2024-03-10T09:00:00Z",
                    status: AppointmentStatus::Validated,
                    by_foreign_key: true,
                },
                BookEntry {
                    time: "2024-03-20T09:00:00Z",
                    status: AppointmentStatus::Pending,
                    by_foreign_key: true,
                },
            ],
            expected_count: 1,
            expected_last: Some("2024-03-10T09:00:00Z"),
            expected_next: Some("2024-03-20T09:00:00Z"),
            expected_new: true,
        },
        GoldenCase {
            // A consultation earlier the same day is not a "last
            // consultation", but is the next appointment.
            id: "same-day-excluded-from-last",
            today: "2024-03-15T14:00:00Z",
            book: vec![BookEntry {
                time: "2024-03-15T09:00:00Z",
                status: AppointmentStatus::Validated,
                by_foreign_key: true,
            }],
            expected_count: 1,
            expected_last: None,
            expected_next: Some("2024-03-15T09:00:00Z"),
            expected_new: true,
        },
        GoldenCase {
            id: "latest-past-consultation-wins",
            today: "2024-03-15T11:00:00Z",
            book: vec![
                BookEntry {
                    time: "2024-01-05T09:00:00Z",
                    status: AppointmentStatus::Validated,
                    by_foreign_key: true,
                },
                BookEntry {
                    time: "2024-02-20T09:00:00Z",
                    status: AppointmentStatus::Validated,
                    by_foreign_key: true,
                },
            ],
            expected_count: 2,
            expected_last: Some("2024-02-20T09:00:00Z"),
            expected_next: None,
            expected_new: false,
        },
        GoldenCase {
            id: "earliest-upcoming-wins-any-status",
            today: "2024-03-15T11:00:00Z",
            book: vec![
                BookEntry {
                    time: "2024-03-25T09:00:00Z",
                    status: AppointmentStatus::Pending,
                    by_foreign_key: true,
                },
                BookEntry {
                    time: "2024-03-18T09:00:00Z",
                    status: AppointmentStatus::Canceled,
                    by_foreign_key: true,
                },
            ],
            expected_count: 0,
            expected_last: None,
            expected_next: Some("2024-03-18T09:00:00Z"),
            expected_new: true,
        },
        GoldenCase {
            // Walk-in bookings match on normalized name.
            id: "name-fallback-matching",
            today: "2024-03-15T11:00:00Z",
            book: vec![BookEntry {
                time: "2024-03-01T09:00:00Z",
                status: AppointmentStatus::Validated,
                by_foreign_key: false,
            }],
            expected_count: 1,
            expected_last: Some("2024-03-01T09:00:00Z"),
            expected_next: None,
            expected_new: true,
        },
        GoldenCase {
            // A pending past appointment is not a consultation.
            id: "pending-past-not-a-consultation",
            today: "2024-03-15T11:00:00Z",
            book: vec![BookEntry {
                time: "2024-03-01T09:00:00Z",
                status: AppointmentStatus::Pending,
                by_foreign_key: true,
            }],
            expected_count: 0,
            expected_last: None,
            expected_next: None,
            expected_new: true,
        },
    ]
}

fn build_book(patient: &Patient, entries: &[BookEntry]) -> Vec<Appointment> {
    entries
        .iter()
        .map(|entry| {
            let mut apt = Appointment::new(entry.time.into(), entry.status);
            if entry.by_foreign_key {
                apt.patient_id = Some(patient.id.clone());
            } else {
                apt.last_name = Some(patient.last_name.to_uppercase());
                apt.first_name = Some(patient.first_name.to_lowercase());
            }
            apt
        })
        .collect()
}

#[test]
fn golden_enrichment_cases() {
    for case in get_golden_cases() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let book = build_book(&patient, &case.book);
        let today = timeutil::parse_instant(case.today).unwrap();

        let view = enrich(&patient, &book, today);

        assert_eq!(
            view.validated_consultation_count, case.expected_count,
            "case {}: consultation count",
            case.id
        );
        assert_eq!(
            view.last_consultation,
            case.expected_last.map(|t| timeutil::parse_instant(t).unwrap()),
            "case {}: last consultation",
            case.id
        );
        assert_eq!(
            view.next_appointment,
            case.expected_next.map(|t| timeutil::parse_instant(t).unwrap()),
            "case {}: next appointment",
            case.id
        );
        assert_eq!(
            view.is_new_patient(),
            case.expected_new,
            "case {}: new-patient flag",
            case.id
        );
    }
}

#[test]
fn appointment_exactly_at_midnight_today() {
    let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
    let mut apt = Appointment::new("2024-03-15T00:00:00Z".into(), AppointmentStatus::Validated);
    apt.patient_id = Some(patient.id.clone());

    let today = timeutil::parse_instant("2024-03-15T23:00:00Z").unwrap();
    let view = enrich(&patient, &[apt], today);

    // On the boundary: not a past consultation, still the next appointment.
    assert!(view.last_consultation.is_none());
    assert_eq!(
        view.next_appointment,
        timeutil::parse_instant("2024-03-15T00:00:00Z")
    );
}
