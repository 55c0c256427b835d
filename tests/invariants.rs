//! Property-based tests over the testable invariants: monotonic offsets,
//! a final mandatory break, byte-for-byte round trip, and str/bytes parity
//! (and, for random byte soup, that malformed UTF-8 recovers gracefully
//! rather than stalling or underflowing).

use proptest::prelude::*;
use uax14_linebreak::{next_break, next_break_str, BreakKind};

fn collect_breaks(s: &[u8]) -> Vec<(usize, BreakKind)> {
    let mut remaining = s;
    let mut offset = 0usize;
    let mut out = Vec::new();
    let mut guard = 0usize;
    while !remaining.is_empty() {
        let (advance, kind) = next_break(remaining);
        offset += advance;
        out.push((offset, kind));
        remaining = &remaining[advance..];
        guard += 1;
        assert!(guard <= s.len() + 1, "next_break failed to make progress");
    }
    out
}

proptest! {
    #[test]
    fn offsets_are_strictly_increasing_and_end_at_len(s in "\\PC*") {
        let breaks = collect_breaks(s.as_bytes());
        let mut prev = 0usize;
        for &(off, _) in &breaks {
            prop_assert!(off > prev);
            prev = off;
        }
        if !s.is_empty() {
            prop_assert_eq!(prev, s.len());
        }
    }

    #[test]
    fn final_kind_is_mandatory(s in "\\PC*") {
        let breaks = collect_breaks(s.as_bytes());
        if let Some(&(_, kind)) = breaks.last() {
            prop_assert_eq!(kind, BreakKind::Mandatory);
        }
    }

    #[test]
    fn tokens_reconstruct_the_input(s in "\\PC*") {
        let mut remaining: &[u8] = s.as_bytes();
        let mut rebuilt = Vec::new();
        while !remaining.is_empty() {
            let (advance, _) = next_break(remaining);
            rebuilt.extend_from_slice(&remaining[..advance]);
            remaining = &remaining[advance..];
        }
        prop_assert_eq!(rebuilt, s.into_bytes());
    }

    #[test]
    fn bytes_and_str_entry_points_agree(s in "\\PC*") {
        let mut remaining = s.as_str();
        let mut remaining_bytes: &[u8] = s.as_bytes();
        while !remaining.is_empty() {
            let (adv_str, kind_str) = next_break_str(remaining);
            let (adv_bytes, kind_bytes) = next_break(remaining_bytes);
            prop_assert_eq!(adv_str, adv_bytes);
            prop_assert_eq!(kind_str, kind_bytes);
            remaining = &remaining[adv_str..];
            remaining_bytes = &remaining_bytes[adv_bytes..];
        }
    }

    #[test]
    fn arbitrary_byte_soup_never_stalls_or_overruns(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let breaks = collect_breaks(&bytes);
        let mut prev = 0usize;
        for &(off, _) in &breaks {
            prop_assert!(off > prev);
            prop_assert!(off <= bytes.len());
            prev = off;
        }
        if !bytes.is_empty() {
            prop_assert_eq!(prev, bytes.len());
            prop_assert_eq!(breaks.last().map(|&(_, k)| k), Some(BreakKind::Mandatory));
        }
    }

    #[test]
    fn single_scalar_breaks_at_its_own_width(c in any::<char>()) {
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        prop_assert_eq!(next_break(s.as_bytes()), (s.len(), BreakKind::Mandatory));
    }
}

/// Invariant 6: a run of `N` regional indicators followed by non-RI text
/// breaks between every second RI and never inside a pair.
#[test]
fn regional_indicator_runs_pair_up_before_breaking() {
    const RI: char = '\u{1F1E6}';
    for n in 1..=7usize {
        let mut s = String::new();
        for _ in 0..n {
            s.push(RI);
        }
        s.push('x');

        let breaks = collect_breaks(s.as_bytes());
        let ri_byte_len = RI.len_utf8();
        let run_end = n * ri_byte_len;

        // No break strictly inside the run falls at an odd RI boundary (a
        // break there would split a flag pair).
        for &(off, _) in &breaks {
            if off < run_end {
                assert_eq!(off % (2 * ri_byte_len), 0, "break fell inside an RI pair, n = {n}");
            }
        }

        // Total breaks at or before the run's end: one per completed pair,
        // plus one more for a trailing unpaired RI (ceil(N/2)).
        let breaks_up_to_run_end = breaks.iter().filter(|&&(off, _)| off <= run_end).count();
        assert_eq!(breaks_up_to_run_end, n.div_ceil(2), "n = {n}");
    }
}
