//! Implementation of the Line Breaking Algorithm described in [Unicode Standard Annex #14][UAX14].
//!
//! Given UTF-8 text, locates line-break boundaries and classifies each as a
//! MANDATORY break (the layout engine must end the line there) or an
//! OPPORTUNITY (it may). The crate is split into two collaborating pieces:
//! a [`property`] trie mapping code points to line-break classes, and a
//! [`scanner`] that walks the input applying the UAX #14 rule ladder
//! (LB1 through LB31) against that trie.
//!
//! # Example
//!
//! ```
//! use uax14_linebreak::{next_break, BreakKind::{Mandatory, Opportunity}};
//!
//! let text = "a b \nc";
//! let mut remaining = text;
//! let mut offset = 0;
//! let mut breaks = Vec::new();
//! while !remaining.is_empty() {
//!     let (advance, kind) = next_break(remaining.as_bytes());
//!     offset += advance;
//!     breaks.push((offset, kind));
//!     remaining = &remaining[advance..];
//! }
//! assert_eq!(breaks, vec![
//!     (2, Opportunity), // May break after first space
//!     (5, Mandatory),   // Must break after line feed
//!     (6, Mandatory),   // Must break at end of text
//! ]);
//! ```
//!
//! [UAX14]: https://www.unicode.org/reports/tr14/

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs, missing_debug_implementations)]

mod property;
mod scanner;
mod split;

pub use property::{classify, lookup, lookup_property, PropertyBits, UNICODE_VERSION};
pub use scanner::{next_break, next_break_str, BreakKind};
pub use split::split;
