//! A buffered-reader-friendly adapter over [`crate::next_break`].

use crate::scanner::next_break;

/// Reports the next line-break token in `data`, in the style of a
/// `bufio.SplitFunc`: callers that only hold a prefix of a larger stream
/// pass `at_eof = false` so a boundary that might still change once more
/// bytes arrive is deferred instead of reported early.
///
/// Returns `(advance, token)`:
/// - `(0, None)` means "need more data": `data` ends mid-scalar (or, when
///   `at_eof` is false, on a class that a break rule's lookahead could still
///   revise) and more bytes should be appended before calling again.
/// - Otherwise `token` is `Some(&data[..advance])`, the next complete token,
///   and `advance` is strictly positive.
///
/// The underlying scanner never fails, so unlike a general `bufio.SplitFunc`
/// this never reports an error; the `Option` return stands in for that
/// unused slot, left for a host integration that owns retry/EOF policy.
pub fn split(data: &[u8], at_eof: bool) -> (usize, Option<&[u8]>) {
    if data.is_empty() {
        return (0, None);
    }

    let (advance, _) = next_break(data);
    if !at_eof && advance == data.len() {
        // The boundary found is only a MANDATORY-at-buffer-end artifact of
        // LB3 ("always break at the end of the scanned slice"); with more
        // data available the real boundary could lie further on.
        return (0, None);
    }
    (advance, Some(&data[..advance]))
}
