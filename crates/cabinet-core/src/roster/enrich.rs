//! Per-patient consultation facts derived from the appointment book.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Appointment, AppointmentStatus, Patient};
use crate::timeutil;

/// Read-only projection of a patient plus derived consultation facts.
/// Recomputed on demand, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedPatient {
    pub patient: Patient,
    /// Matched appointments whose consultation actually took place
    pub validated_consultation_count: usize,
    /// Latest validated consultation strictly before today
    pub last_consultation: Option<DateTime<Utc>>,
    /// Earliest appointment (any status) today or later
    pub next_appointment: Option<DateTime<Utc>>,
}

impl EnrichedPatient {
    /// A patient with at most one validated consultation counts as new.
    pub fn is_new_patient(&self) -> bool {
        self.validated_consultation_count <= 1
    }
}

/// Derive consultation facts for one patient against the full
/// appointment book, relative to the injected `today` instant.
///
/// An appointment matches on foreign key or, as a fallback, on
/// normalized name. Same-calendar-day consultations are excluded from
/// `last_consultation` even when chronologically earlier in the day,
/// and count as candidates for `next_appointment`. Appointments with
/// malformed timestamps are skipped, never an error: the roster must
/// always render.
pub fn enrich(
    patient: &Patient,
    appointments: &[Appointment],
    today: DateTime<Utc>,
) -> EnrichedPatient {
    let day_start = timeutil::start_of_day(today);

    let matched: Vec<&Appointment> = appointments
        .iter()
        .filter(|apt| apt.belongs_to(patient))
        .collect();

    let validated_consultation_count = matched
        .iter()
        .filter(|apt| apt.status == AppointmentStatus::Validated)
        .count();

    // Identical timestamps: the earlier entry in the book wins; the
    // strict comparisons below keep the first occurrence.
    let mut last_consultation: Option<DateTime<Utc>> = None;
    let mut next_appointment: Option<DateTime<Utc>> = None;
    for apt in &matched {
        let Some(instant) = apt.instant() else { continue };

        if apt.status == AppointmentStatus::Validated
            && instant < day_start
            && last_consultation.is_none_or(|best| instant > best)
        {
            last_consultation = Some(instant);
        }
        if instant >= day_start && next_appointment.is_none_or(|best| instant < best) {
            next_appointment = Some(instant);
        }
    }

    EnrichedPatient {
        patient: patient.clone(),
        validated_consultation_count,
        last_consultation,
        next_appointment,
    }
}

/// Like [`enrich`] with `today` taken from the wall clock.
pub fn enrich_now(patient: &Patient, appointments: &[Appointment]) -> EnrichedPatient {
    enrich(patient, appointments, Utc::now())
}

/// All validated consultations for the patient, newest first. Entries
/// with malformed timestamps sort last.
pub fn validated_consultations<'a>(
    patient: &Patient,
    appointments: &'a [Appointment],
) -> Vec<&'a Appointment> {
    let mut consultations: Vec<&Appointment> = appointments
        .iter()
        .filter(|apt| apt.belongs_to(patient) && apt.status == AppointmentStatus::Validated)
        .collect();
    consultations.sort_by(|a, b| b.instant().cmp(&a.instant()));
    consultations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apt_for(patient: &Patient, time: &str, status: AppointmentStatus) -> Appointment {
        let mut apt = Appointment::new(time.into(), status);
        apt.patient_id = Some(patient.id.clone());
        apt
    }

    fn today() -> DateTime<Utc> {
        timeutil::parse_instant("2024-03-15T11:00:00Z").unwrap()
    }

    #[test]
    fn test_no_appointments() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let view = enrich(&patient, &[], today());
        assert_eq!(view.validated_consultation_count, 0);
        assert!(view.last_consultation.is_none());
        assert!(view.next_appointment.is_none());
        assert!(view.is_new_patient());
    }

    #[test]
    fn test_other_patients_ignored() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let other = Patient::new("P0002".into(), "Martin".into(), "Paul".into());
        let book = vec![apt_for(&other, "2024-03-10T09:00:00Z", AppointmentStatus::Validated)];
        let view = enrich(&patient, &book, today());
        assert_eq!(view.validated_consultation_count, 0);
        assert!(view.last_consultation.is_none());
    }

    #[test]
    fn test_canceled_not_counted_but_still_next() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let book = vec![apt_for(&patient, "2024-03-20T09:00:00Z", AppointmentStatus::Canceled)];
        let view = enrich(&patient, &book, today());
        assert_eq!(view.validated_consultation_count, 0);
        // Any status is a candidate for the next appointment.
        assert_eq!(
            view.next_appointment,
            timeutil::parse_instant("2024-03-20T09:00:00Z")
        );
    }

    #[test]
    fn test_malformed_time_skipped() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let mut apt = apt_for(&patient, "yesterday-ish", AppointmentStatus::Validated);
        apt.reason = Some("imported from the old system".into());
        let view = enrich(&patient, &[apt], today());
        // Still counted, but produces no dates.
        assert_eq!(view.validated_consultation_count, 1);
        assert!(view.last_consultation.is_none());
        assert!(view.next_appointment.is_none());
    }

    #[test]
    fn test_validated_consultations_newest_first() {
        let patient = Patient::new("P0001".into(), "Durand".into(), "Marie".into());
        let book = vec![
            apt_for(&patient, "2024-01-05T09:00:00Z", AppointmentStatus::Validated),
            apt_for(&patient, "2024-03-10T09:00:00Z", AppointmentStatus::Validated),
            apt_for(&patient, "2024-02-01T09:00:00Z", AppointmentStatus::Canceled),
        ];
        let consultations = validated_consultations(&patient, &book);
        assert_eq!(consultations.len(), 2);
        assert_eq!(consultations[0].time, "2024-03-10T09:00:00Z");
        assert_eq!(consultations[1].time, "2024-01-05T09:00:00Z");
    }
}
