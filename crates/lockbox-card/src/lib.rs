//! lockbox-card: card brand detection, checksum, and display masking.
//!
//! Leaf crate of the lockbox workspace. Pure string-in/string-out card
//! number handling: an ordered brand table with first-match-wins prefix
//! classification, the Luhn checksum, and the bin/masked-middle/last-
//! digits display transformation.

pub mod brand;
pub mod luhn;
pub mod mask;

pub use brand::{classify, digits_of, BrandSpec, CardBrand};
pub use luhn::luhn_valid;
