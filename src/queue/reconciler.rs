//! Position Reconciler
//!
//! Restores the dense 1..N position invariant for a service point's active
//! set after entries leave it otherwise than by being appended. Compaction
//! only closes gaps: the remaining entries keep their relative order, and
//! running the pass over an already-dense set changes nothing, so a repeated
//! pass is harmless.
//!
//! The store runs this synchronously inside the departing operation, under
//! the service point's exclusion scope. It is pure arithmetic so the state
//! machine's position contract is testable without any store at all.

/// Compact the given position values into a dense 1..N sequence
///
/// `positions` holds the current (possibly gapped) positions of the remaining
/// active entries, in any order; the returned vector gives the new value for
/// each input slot. Relative order is preserved: the entry with the smallest
/// current position gets 1, the next gets 2, and so on.
pub fn compact(positions: &[u32]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by_key(|&i| positions[i]);

    let mut compacted = vec![0u32; positions.len()];
    for (rank, &slot) in order.iter().enumerate() {
        compacted[slot] = rank as u32 + 1;
    }
    compacted
}

/// Whether `positions` forms a dense 1..N sequence with no gaps or duplicates
pub fn is_dense(positions: &[u32]) -> bool {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &p)| p == i as u32 + 1)
}
