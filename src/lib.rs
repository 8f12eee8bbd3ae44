//! Static configuration for a satellite-imagery survey dataset pipeline.
//!
//! The crate exposes the country lists, train/val/test split schemes used for
//! out-of-country cross-validation, and per-band normalization statistics that
//! a dataset loader depends on. Data is immutable once installed; the three
//! string-keyed lookups below are the contract for callers driven by runtime
//! configuration, while the typed accessors on `Catalog` cover everything
//! known at compile time.

pub mod catalog;
pub mod config;
pub mod error;
mod schema_loader;

pub use catalog::{
    Band, BandStatistics, Catalog, CatalogIndex, CatalogKey, DatasetFamily, DatasetVariant,
    SchemeId, SplitAssignment, SplitName, SplitScheme, country_of, load_catalog_from_path,
    validate_catalog,
};
pub use config::{CatalogSource, catalog, init_from_env, install_catalog};
pub use error::CatalogError;

/// Country list for `DHS` or `LSMS`.
pub fn get_country_list(family: &str) -> Result<&'static [String], CatalogError> {
    catalog().catalog().country_list(family)
}

/// Split assignment for `3country`, `DHS_OOC_A`, `DHS_OOC_B` or `DHS_OOC_C`.
pub fn get_split_scheme(scheme: &str) -> Result<&'static SplitAssignment, CatalogError> {
    catalog().catalog().split_scheme(scheme)
}

/// Paired means and standard deviations for `DHS` or `DHSNL`.
pub fn get_band_statistics(variant: &str) -> Result<&'static BandStatistics, CatalogError> {
    catalog().catalog().band_statistics(variant)
}
