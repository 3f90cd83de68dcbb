//! Content fingerprint of a canonical event table.
//!
//! BLAKE3 over every field of every row, in table order. Two loads of the
//! same input produce the same hash; any changed value changes it.

use crate::domain::{Event, Operation};

pub fn event_table_hash(events: &[Event]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(events.len() as u64).to_le_bytes());

    for e in events {
        hasher.update(&e.time.and_utc().timestamp_millis().to_le_bytes());
        hasher.update(&(e.wallet.len() as u64).to_le_bytes());
        hasher.update(e.wallet.as_bytes());
        hasher.update(&[match e.operation {
            None => 0u8,
            Some(Operation::Buy) => 1,
            Some(Operation::Sell) => 2,
        }]);
        for value in [e.pct, e.volume, e.balance, e.price] {
            match value {
                Some(v) => {
                    hasher.update(&[1]);
                    hasher.update(&v.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
    }

    hasher.finalize().to_hex().to_string()
}
