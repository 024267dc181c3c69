//! Data-selection negotiation
//!
//! After each fully parsed datagram the fields seen are compared against
//! the fields required. Missing fields are requested; surplus fields are
//! asked off exactly once, so a user re-enabling an output by hand is
//! never fought.

use bytes::Bytes;
use tracing::info;

use xplink_wire::{
    encode_selection, FieldMask, SelectionKind, MAX_SELECTION_CODES, REQUIRED_FIELDS,
};

/// Selection negotiator with lifetime deselection suppression
#[derive(Debug, Default)]
pub struct Negotiator {
    /// Codes already asked off once; only ever grows
    suppressed: FieldMask,
}

impl Negotiator {
    pub fn new() -> Self {
        Negotiator::default()
    }

    /// Compare the fields seen this cycle against the required set and
    /// encode any selection requests.
    ///
    /// A non-empty result means the simulator's output is still being
    /// reshaped and this cycle's packet must not be consumed.
    pub fn reconcile(&mut self, seen: FieldMask) -> Vec<Bytes> {
        let missing = REQUIRED_FIELDS.difference(seen);
        let surplus = seen
            .difference(REQUIRED_FIELDS)
            .difference(self.suppressed);

        let mut requests = Vec::new();

        if let Some(datagram) = encode_selection(SelectionKind::Enable, missing) {
            info!(
                codes = ?missing.codes().collect::<Vec<_>>(),
                "selecting telemetry fields"
            );
            requests.push(datagram);
        }

        if let Some(datagram) = encode_selection(SelectionKind::Disable, surplus) {
            // suppress only what this datagram actually carries; any
            // remainder is retried next cycle
            let mut sent = FieldMask::EMPTY;
            for code in surplus.codes().take(MAX_SELECTION_CODES) {
                sent.insert(code);
            }
            self.suppressed = self.suppressed.union(sent);

            info!(
                codes = ?sent.codes().collect::<Vec<_>>(),
                "deselecting telemetry fields"
            );
            requests.push(datagram);
        }

        requests
    }

    /// Codes asked off so far
    pub fn suppressed(&self) -> FieldMask {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplink_wire::{FieldCode, DESELECT_TAG, SELECT_TAG};

    #[test]
    fn test_complete_mask_needs_nothing() {
        let mut negotiator = Negotiator::new();
        assert!(negotiator.reconcile(REQUIRED_FIELDS).is_empty());
    }

    #[test]
    fn test_missing_fields_requested() {
        let mut negotiator = Negotiator::new();
        let seen = REQUIRED_FIELDS
            .difference(FieldMask::EMPTY.with(FieldCode::Speed).with(FieldCode::Mixture));

        let requests = negotiator.reconcile(seen);
        assert_eq!(requests.len(), 1);
        assert_eq!(&requests[0][0..5], SELECT_TAG);

        let first = u32::from_le_bytes(requests[0][5..9].try_into().unwrap());
        let second = u32::from_le_bytes(requests[0][9..13].try_into().unwrap());
        assert_eq!(first, FieldCode::Speed.code() as u32);
        assert_eq!(second, FieldCode::Mixture.code() as u32);
    }

    #[test]
    fn test_surplus_deselected_once() {
        let mut negotiator = Negotiator::new();
        let seen = REQUIRED_FIELDS.union(FieldMask::EMPTY.with(FieldCode::AoA));

        let requests = negotiator.reconcile(seen);
        assert_eq!(requests.len(), 1);
        assert_eq!(&requests[0][0..5], DESELECT_TAG);
        assert!(negotiator.suppressed().contains(FieldCode::AoA));

        // the user may have turned it back on; do not fight them
        let requests = negotiator.reconcile(seen);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_missing_and_surplus_both_requested() {
        let mut negotiator = Negotiator::new();
        let seen = REQUIRED_FIELDS
            .difference(FieldMask::EMPTY.with(FieldCode::Gload))
            .union(FieldMask::EMPTY.with(FieldCode::MagCompass));

        let requests = negotiator.reconcile(seen);
        assert_eq!(requests.len(), 2);
        assert_eq!(&requests[0][0..5], SELECT_TAG);
        assert_eq!(&requests[1][0..5], DESELECT_TAG);
    }

    #[test]
    fn test_wide_surplus_retried_across_cycles() {
        let mut negotiator = Negotiator::new();

        // ten surplus codes: deselection is capped at eight per cycle
        let mut surplus = FieldMask::EMPTY;
        for code in [0u8, 2, 5, 6, 7, 9, 10, 11, 12, 14] {
            surplus.insert(code);
        }
        let seen = REQUIRED_FIELDS.union(surplus);

        let first = negotiator.reconcile(seen);
        assert_eq!(first.len(), 1);
        assert_eq!(negotiator.suppressed().len(), 8);

        let second = negotiator.reconcile(seen);
        assert_eq!(second.len(), 1);
        assert_eq!(negotiator.suppressed().len(), 10);

        assert!(negotiator.reconcile(seen).is_empty());
    }
}
