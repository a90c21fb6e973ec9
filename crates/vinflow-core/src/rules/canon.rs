//! Row identifier canonicalization
//!
//! VINs arrive as free text. They are canonicalized exactly once, when a row
//! or an inventory entry is ingested, and the canonical form is the row key.

/// Canonical form of a VIN: trimmed, uppercased, all whitespace removed
///
/// # Example
///
/// ```
/// use vinflow_core::rules::canonical_vin;
///
/// assert_eq!(canonical_vin("  1hg cm8 2633a\t004352 "), "1HGCM82633A004352");
/// ```
pub fn canonical_vin(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
