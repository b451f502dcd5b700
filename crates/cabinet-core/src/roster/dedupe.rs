//! Duplicate-patient collapsing.
//!
//! Double data entry leaves several records for one person (same name,
//! different numbers). The roster keeps one canonical record per
//! identity: the member of each duplicate group whose number parses to
//! the lowest value.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::Patient;
use crate::numbering::NumberFormat;

/// One canonical record per normalized (last name, first name)
/// identity.
///
/// Selection is order-independent: for any permutation of `patients`,
/// the survivor of a duplicate group is the record with the lowest
/// numeric number, ties on equal numbers broken by record id. Records
/// are only selected, never mutated. The output is sorted by numeric
/// value (then id) so it is a deterministic sequence.
pub fn consolidate(patients: &[Patient], format: &NumberFormat) -> Vec<Patient> {
    let mut by_identity: HashMap<String, &Patient> = HashMap::new();

    for patient in patients {
        match by_identity.entry(patient.identity_key()) {
            Entry::Vacant(slot) => {
                slot.insert(patient);
            }
            Entry::Occupied(mut slot) => {
                let incumbent = *slot.get();
                let challenger = (numeric(patient, format), patient.id.as_str());
                if challenger < (numeric(incumbent, format), incumbent.id.as_str()) {
                    slot.insert(patient);
                }
            }
        }
    }

    let mut canonical: Vec<Patient> = by_identity.into_values().cloned().collect();
    canonical.sort_by(|a, b| {
        numeric(a, format)
            .cmp(&numeric(b, format))
            .then_with(|| a.id.cmp(&b.id))
    });
    canonical
}

// Unparseable numbers sort last; the record still survives if it is the
// only one for its identity.
fn numeric(patient: &Patient, format: &NumberFormat) -> u32 {
    format.parse(&patient.number).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(number: &str, last: &str, first: &str) -> Patient {
        Patient::new(number.into(), last.into(), first.into())
    }

    #[test]
    fn test_no_duplicates_passes_through() {
        let format = NumberFormat::default();
        let patients = vec![
            patient("P0002", "Martin", "Paul"),
            patient("P0001", "Durand", "Marie"),
        ];
        let canonical = consolidate(&patients, &format);
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical[0].number, "P0001");
        assert_eq!(canonical[1].number, "P0002");
    }

    #[test]
    fn test_lowest_number_wins() {
        let format = NumberFormat::default();
        let patients = vec![
            patient("P0007", "Durand", "Marie"),
            patient("P0003", "DURAND", "marie"),
            patient("P0005", "Durand", "Marie"),
        ];
        let canonical = consolidate(&patients, &format);
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].number, "P0003");
    }

    #[test]
    fn test_lowest_wins_regardless_of_position() {
        let format = NumberFormat::default();
        let first_order = vec![
            patient("P0001", "Durand", "Marie"),
            patient("P0009", "Durand", "Marie"),
        ];
        let last_order: Vec<Patient> = first_order.iter().rev().cloned().collect();

        let a = consolidate(&first_order, &format);
        let b = consolidate(&last_order, &format);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].number, "P0001");
        assert_eq!(b[0].number, "P0001");
    }

    #[test]
    fn test_equal_numbers_tie_break_on_id() {
        let format = NumberFormat::default();
        // Two records left behind by a double import: same person, same
        // number, distinct record ids.
        let mut a = patient("P0005", "Durand", "Marie");
        let mut b = patient("P0005", "Durand", "Marie");
        a.id = "rec-a".into();
        b.id = "rec-b".into();

        let forward = consolidate(&[a.clone(), b.clone()], &format);
        let backward = consolidate(&[b, a], &format);
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].id, "rec-a");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unparseable_number_survives_alone() {
        let format = NumberFormat::default();
        let patients = vec![patient("??", "Durand", "Marie")];
        let canonical = consolidate(&patients, &format);
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[0].number, "??");
    }
}
