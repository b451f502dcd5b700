//! Patient roster views: duplicate collapsing and consultation facts.
//!
//! Everything here is pure and read-only over its inputs; callers may
//! invoke these functions concurrently without coordination.

mod dedupe;
mod enrich;

pub use dedupe::consolidate;
pub use enrich::{enrich, enrich_now, validated_consultations, EnrichedPatient};
