pub mod canon;
pub mod invariants;

pub use canon::canonical_vin;
