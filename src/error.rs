//! Typed lookup failures.
//!
//! Every variant means the caller asked for a key the catalog does not hold.
//! Callers are expected to validate identifiers up front, so these surface as
//! configuration bugs rather than transient conditions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown dataset family '{0}' (expected DHS or LSMS)")]
    UnknownFamily(String),
    #[error("unknown split scheme '{0}' (expected 3country, DHS_OOC_A, DHS_OOC_B or DHS_OOC_C)")]
    UnknownScheme(String),
    #[error("unknown dataset variant '{0}' (expected DHS or DHSNL)")]
    UnknownVariant(String),
    #[error("unknown band '{0}'")]
    UnknownBand(String),
    #[error("unknown split '{0}' (expected train, val, test or all)")]
    UnknownSplit(String),
}
