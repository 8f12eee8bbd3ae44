//! Deserializable representation of a survey catalog.
//!
//! Each active table is a struct with one field per key enum variant, so the
//! typed accessors (`countries`, `scheme`, `statistics`) are exhaustive matches
//! and cannot miss. String-keyed accessors parse first and only fail on the
//! parse. Use `CatalogIndex` when the invariants must be checked or when split
//! membership has to be resolved for a survey record.

use crate::catalog::identity::{
    Band, CatalogKey, DatasetFamily, DatasetVariant, SchemeId, SplitName,
};
use crate::error::CatalogError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Split name to the ordered identifiers assigned to it.
pub type SplitAssignment = BTreeMap<SplitName, Vec<String>>;

/// Band name to a scalar statistic.
pub type BandStatistic = BTreeMap<Band, f64>;

/// Record counts keyed by split name (or survey name for per-survey rows).
pub type SizeRow = BTreeMap<String, u64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Full catalog as stored on disk or compiled in.
pub struct Catalog {
    pub schema_version: String,
    pub key: CatalogKey,
    pub countries: CountryLists,
    pub schemes: SchemeTable,
    pub statistics: StatisticsTable,
    #[serde(default)]
    pub retired: RetiredEntries,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryLists {
    #[serde(rename = "DHS")]
    pub dhs: Vec<String>,
    #[serde(rename = "LSMS")]
    pub lsms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One fold definition: which identifiers train, validate and test.
pub struct SplitScheme {
    /// Family whose country list the identifiers are drawn from.
    pub family: DatasetFamily,
    pub splits: SplitAssignment,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemeTable {
    #[serde(rename = "3country")]
    pub three_country: SplitScheme,
    #[serde(rename = "DHS_OOC_A")]
    pub dhs_ooc_a: SplitScheme,
    #[serde(rename = "DHS_OOC_B")]
    pub dhs_ooc_b: SplitScheme,
    #[serde(rename = "DHS_OOC_C")]
    pub dhs_ooc_c: SplitScheme,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Paired per-band means and standard deviations for one dataset variant.
pub struct BandStatistics {
    pub means: BandStatistic,
    pub std_devs: BandStatistic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticsTable {
    #[serde(rename = "DHS")]
    pub dhs: BandStatistics,
    #[serde(rename = "DHSNL")]
    pub dhsnl: BandStatistics,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Configuration kept for reference but excluded from every active lookup.
pub struct RetiredEntries {
    #[serde(default)]
    pub lsms_survey_names: Vec<String>,
    #[serde(default)]
    pub lsms_statistics: Option<BandStatistics>,
    /// Overall nightlights moments, superseded by the per-band DMSP/VIIRS values.
    #[serde(default)]
    pub nightlights_overall: Option<BandMoments>,
    #[serde(default)]
    pub sizes: SizeTables,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandMoments {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Record counts per dataset or scheme key, overall and by urban/rural stratum.
pub struct SizeTables {
    #[serde(default)]
    pub all: BTreeMap<String, SizeRow>,
    #[serde(default)]
    pub urban: BTreeMap<String, SizeRow>,
    #[serde(default)]
    pub rural: BTreeMap<String, SizeRow>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SizeTable {
    All,
    Urban,
    Rural,
}

impl Catalog {
    /// Country list for a family.
    pub fn countries(&self, family: DatasetFamily) -> &[String] {
        match family {
            DatasetFamily::Dhs => &self.countries.dhs,
            DatasetFamily::Lsms => &self.countries.lsms,
        }
    }

    pub fn scheme(&self, id: SchemeId) -> &SplitScheme {
        match id {
            SchemeId::ThreeCountry => &self.schemes.three_country,
            SchemeId::DhsOocA => &self.schemes.dhs_ooc_a,
            SchemeId::DhsOocB => &self.schemes.dhs_ooc_b,
            SchemeId::DhsOocC => &self.schemes.dhs_ooc_c,
        }
    }

    pub fn statistics(&self, variant: DatasetVariant) -> &BandStatistics {
        match variant {
            DatasetVariant::Dhs => &self.statistics.dhs,
            DatasetVariant::DhsNl => &self.statistics.dhsnl,
        }
    }

    /// Iterates schemes in `SchemeId::ALL` order.
    pub fn schemes(&self) -> impl Iterator<Item = (SchemeId, &SplitScheme)> + '_ {
        SchemeId::ALL.into_iter().map(move |id| (id, self.scheme(id)))
    }

    pub fn retired(&self) -> &RetiredEntries {
        &self.retired
    }

    /// String-keyed country list lookup; fails with `UnknownFamily`.
    pub fn country_list(&self, family: &str) -> Result<&[String], CatalogError> {
        Ok(self.countries(family.parse()?))
    }

    /// String-keyed split lookup; fails with `UnknownScheme`.
    pub fn split_scheme(&self, scheme: &str) -> Result<&SplitAssignment, CatalogError> {
        Ok(&self.scheme(scheme.parse()?).splits)
    }

    /// String-keyed statistics lookup; fails with `UnknownVariant`, including
    /// for retired variants such as `LSMS`.
    pub fn band_statistics(&self, variant: &str) -> Result<&BandStatistics, CatalogError> {
        Ok(self.statistics(variant.parse()?))
    }
}

impl SplitScheme {
    /// Identifiers in `split`, empty when the scheme does not define it.
    pub fn split(&self, name: SplitName) -> &[String] {
        self.splits.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every (split, identifier) pair in split order.
    pub fn assignments(&self) -> impl Iterator<Item = (SplitName, &str)> + '_ {
        self.splits
            .iter()
            .flat_map(|(split, ids)| ids.iter().map(move |id| (*split, id.as_str())))
    }
}

impl BandStatistics {
    /// `(mean, std_dev)` for a band present in both mappings.
    pub fn get(&self, band: Band) -> Option<(f64, f64)> {
        Some((*self.means.get(&band)?, *self.std_devs.get(&band)?))
    }

    /// False when the band is missing or both statistics are exactly zero.
    ///
    /// A zero pair marks a band that is not populated for the variant;
    /// normalizing consumers skip it instead of dividing by zero.
    pub fn is_populated(&self, band: Band) -> bool {
        matches!(self.get(band), Some((mean, std_dev)) if mean != 0.0 || std_dev != 0.0)
    }

    pub fn populated_bands(&self) -> impl Iterator<Item = Band> + '_ {
        self.means
            .keys()
            .copied()
            .filter(move |band| self.is_populated(*band))
    }

    pub fn mean_bands(&self) -> BTreeSet<Band> {
        self.means.keys().copied().collect()
    }

    pub fn std_dev_bands(&self) -> BTreeSet<Band> {
        self.std_devs.keys().copied().collect()
    }
}

impl SizeTables {
    pub fn table(&self, table: SizeTable) -> &BTreeMap<String, SizeRow> {
        match table {
            SizeTable::All => &self.all,
            SizeTable::Urban => &self.urban,
            SizeTable::Rural => &self.rural,
        }
    }

    /// Record count for `key` (e.g. `DHS_OOC_D`) and `entry` (a split or survey name).
    pub fn count(&self, table: SizeTable, key: &str, entry: &str) -> Option<u64> {
        self.table(table).get(key)?.get(entry).copied()
    }
}

/// Country part of an identifier: `malawi_2015` -> `malawi`, `malawi` -> `malawi`.
///
/// Only a trailing `_<digits>` suffix is stripped so country names containing
/// underscores stay intact.
pub fn country_of(identifier: &str) -> &str {
    match identifier.rsplit_once('_') {
        Some((country, year))
            if !country.is_empty()
                && !year.is_empty()
                && year.chars().all(|c| c.is_ascii_digit()) =>
        {
            country
        }
        _ => identifier,
    }
}

/// Read and parse a catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    log::debug!("loaded catalog '{}' from {}", catalog.key.0, path.display());
    Ok(catalog)
}
