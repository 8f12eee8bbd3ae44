//! Survey catalog wiring.
//!
//! Country lists, split schemes and band statistics live in `Catalog`; the
//! compiled-in values come from `builtin`. Types here mirror the JSON schema
//! under `schema/`; callers use `CatalogIndex` for validated access and split
//! routing.

pub mod builtin;
pub mod identity;
pub mod index;
pub mod model;

pub use builtin::{BUILTIN_CATALOG_KEY, CATALOG_SCHEMA_VERSION};
pub use identity::{Band, CatalogKey, DatasetFamily, DatasetVariant, SchemeId, SplitName};
pub use index::{CatalogIndex, validate_catalog};
pub use model::{
    BandMoments, BandStatistic, BandStatistics, Catalog, CountryLists, RetiredEntries,
    SchemeTable, SizeRow, SizeTable, SizeTables, SplitAssignment, SplitScheme, StatisticsTable,
    country_of,
};

pub use model::load_catalog_from_path;
