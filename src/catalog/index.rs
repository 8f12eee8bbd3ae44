//! Validated view of a catalog instance.
//!
//! The index checks the scheme invariants (identifiers drawn from the family's
//! country list, mutually exclusive splits, full test rotation), band key
//! parity between means and standard deviations, and arithmetic consistency of
//! the retired size tables. It also precomputes identifier-to-split maps so a
//! record's survey name can be routed to its partition.

use crate::catalog::identity::{
    Band, CatalogKey, DatasetFamily, DatasetVariant, SchemeId, SplitName,
};
use crate::catalog::model::{
    BandStatistics, Catalog, SizeRow, SizeTables, country_of, load_catalog_from_path,
};
use crate::schema_loader::{allowed_schema_versions, is_valid_version_token, load_catalog_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug)]
/// Catalog plus per-scheme lookup of identifier to split.
pub struct CatalogIndex {
    catalog: Catalog,
    by_identifier: BTreeMap<SchemeId, BTreeMap<String, SplitName>>,
}

impl CatalogIndex {
    /// Validate `catalog` and build the index.
    ///
    /// Every issue is logged and the error carries all of them, so a broken
    /// file is fixed in one pass.
    pub fn new(catalog: Catalog) -> Result<Self> {
        let issues = validate_catalog(&catalog);
        if !issues.is_empty() {
            for issue in &issues {
                log::warn!("catalog '{}': {issue}", catalog.key.0);
            }
            bail!(
                "catalog '{}' failed validation:\n{}",
                catalog.key.0,
                issues.join("\n")
            );
        }
        Ok(Self::build(catalog))
    }

    /// Index over the compiled-in catalog.
    ///
    /// The built-in tables are covered by the crate's tests, so construction
    /// skips revalidation.
    pub fn builtin() -> Self {
        Self::build(Catalog::builtin())
    }

    /// Load a catalog file: JSON Schema check, schema version check, then the
    /// semantic invariants.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let catalog =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        validate_schema_version(&catalog.schema_version)?;
        Self::new(catalog)
    }

    pub fn key(&self) -> &CatalogKey {
        &self.catalog.key
    }

    /// Access the underlying catalog tables.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Split that `identifier` belongs to under `scheme`.
    ///
    /// Exact matches win; otherwise a survey name such as `malawi_2015`
    /// resolves through its country for country-keyed schemes.
    pub fn split_of(&self, scheme: SchemeId, identifier: &str) -> Option<SplitName> {
        let assigned = self.by_identifier.get(&scheme)?;
        assigned
            .get(identifier)
            .or_else(|| assigned.get(country_of(identifier)))
            .copied()
    }

    fn build(catalog: Catalog) -> Self {
        let by_identifier = catalog
            .schemes()
            .map(|(id, scheme)| {
                let assigned: BTreeMap<String, SplitName> = scheme
                    .assignments()
                    .map(|(split, identifier)| (identifier.to_string(), split))
                    .collect();
                (id, assigned)
            })
            .collect();
        Self {
            catalog,
            by_identifier,
        }
    }
}

/// Collect every invariant violation in `catalog`.
///
/// Returns a list rather than short-circuiting so callers can surface all
/// problems at once.
pub fn validate_catalog(catalog: &Catalog) -> Vec<String> {
    let mut issues = Vec::new();
    for family in DatasetFamily::ALL {
        check_country_list(family, catalog.countries(family), &mut issues);
    }
    check_schemes(catalog, &mut issues);
    check_ooc_rotation(catalog, &mut issues);
    check_statistics(catalog, &mut issues);
    check_sizes(&catalog.retired().sizes, &mut issues);
    issues
}

fn check_country_list(family: DatasetFamily, countries: &[String], issues: &mut Vec<String>) {
    if countries.is_empty() {
        issues.push(format!("{family} country list is empty"));
    }
    let mut seen = BTreeSet::new();
    for country in countries {
        if country.trim().is_empty() {
            issues.push(format!("{family} country list contains an empty entry"));
            continue;
        }
        if country.to_lowercase() != *country {
            issues.push(format!("{family} country '{country}' must be lowercase"));
        }
        if !seen.insert(country.as_str()) {
            issues.push(format!("{family} country '{country}' is listed twice"));
        }
    }
}

fn check_schemes(catalog: &Catalog, issues: &mut Vec<String>) {
    for (id, scheme) in catalog.schemes() {
        let countries: BTreeSet<&str> = catalog
            .countries(scheme.family)
            .iter()
            .map(String::as_str)
            .collect();

        let mut placed: BTreeMap<&str, SplitName> = BTreeMap::new();
        for (split, identifier) in scheme.assignments() {
            if !countries.contains(country_of(identifier)) {
                issues.push(format!(
                    "{id} {split} references '{identifier}', which is not a {} country",
                    scheme.family
                ));
            }
            if let Some(previous) = placed.insert(identifier, split) {
                if previous == split {
                    issues.push(format!("{id} lists '{identifier}' twice in {split}"));
                } else {
                    issues.push(format!(
                        "{id} assigns '{identifier}' to both {previous} and {split}"
                    ));
                }
            }
        }
    }
}

fn check_ooc_rotation(catalog: &Catalog, issues: &mut Vec<String>) {
    for country in catalog.countries(DatasetFamily::Dhs) {
        let held_out = SchemeId::OOC_ROTATION
            .into_iter()
            .filter(|id| {
                catalog
                    .scheme(*id)
                    .split(SplitName::Test)
                    .iter()
                    .any(|identifier| country_of(identifier) == country.as_str())
            })
            .count();
        if held_out != 1 {
            issues.push(format!(
                "out-of-country rotation tests '{country}' {held_out} times, expected once"
            ));
        }
    }
}

fn check_statistics(catalog: &Catalog, issues: &mut Vec<String>) {
    let mut shared_bands: Option<(DatasetVariant, BTreeSet<Band>)> = None;
    for variant in DatasetVariant::ALL {
        let stats = catalog.statistics(variant);
        check_band_statistics(variant.as_str(), stats, issues);

        let bands = stats.mean_bands();
        if let Some((first, expected)) = &shared_bands {
            if *expected != bands {
                issues.push(format!(
                    "{variant} bands {} differ from {first} bands {}",
                    band_list(&bands),
                    band_list(expected)
                ));
            }
        } else {
            shared_bands = Some((variant, bands));
        }
    }

    if let Some(lsms) = &catalog.retired().lsms_statistics {
        check_band_statistics("retired LSMS", lsms, issues);
    }
    if let Some(nightlights) = &catalog.retired().nightlights_overall {
        if nightlights.std_dev.is_nan() || nightlights.std_dev < 0.0 {
            issues.push("retired nightlights std_dev must be non-negative".to_string());
        }
    }
}

fn check_band_statistics(label: &str, stats: &BandStatistics, issues: &mut Vec<String>) {
    let means = stats.mean_bands();
    let std_devs = stats.std_dev_bands();
    if means != std_devs {
        let missing_std: BTreeSet<_> = means.difference(&std_devs).copied().collect();
        let missing_mean: BTreeSet<_> = std_devs.difference(&means).copied().collect();
        if !missing_std.is_empty() {
            issues.push(format!(
                "{label} has means without std_devs for {}",
                band_list(&missing_std)
            ));
        }
        if !missing_mean.is_empty() {
            issues.push(format!(
                "{label} has std_devs without means for {}",
                band_list(&missing_mean)
            ));
        }
    }
    for (band, value) in stats.means.iter().chain(stats.std_devs.iter()) {
        if !value.is_finite() {
            issues.push(format!("{label} {band} statistic is not finite"));
        }
    }
    for (band, value) in &stats.std_devs {
        if *value < 0.0 {
            issues.push(format!("{label} {band} std_dev {value} is negative"));
        }
    }
}

fn check_sizes(sizes: &SizeTables, issues: &mut Vec<String>) {
    for (label, table) in [
        ("all", &sizes.all),
        ("urban", &sizes.urban),
        ("rural", &sizes.rural),
    ] {
        for (key, row) in table {
            match split_total(row) {
                Some(SplitTotal::Sum(parts, total)) if parts != total => issues.push(format!(
                    "{label} sizes for {key}: train + val + test = {parts}, all = {total}"
                )),
                Some(SplitTotal::Overflow) => issues.push(format!(
                    "{label} sizes for {key}: train + val + test overflows"
                )),
                _ => {}
            }
        }
    }

    for (key, urban) in &sizes.urban {
        let (Some(rural), Some(all)) = (sizes.rural.get(key), sizes.all.get(key)) else {
            continue;
        };
        for (entry, urban_count) in urban {
            let (Some(rural_count), Some(all_count)) = (rural.get(entry), all.get(entry)) else {
                continue;
            };
            match urban_count.checked_add(*rural_count) {
                Some(sum) if sum == *all_count => {}
                Some(_) => issues.push(format!(
                    "{key} {entry}: urban {urban_count} + rural {rural_count} != all {all_count}"
                )),
                None => issues.push(format!(
                    "{key} {entry}: urban {urban_count} + rural {rural_count} overflows"
                )),
            }
        }
    }
}

enum SplitTotal {
    Sum(u64, u64),
    Overflow,
}

// (train + val + test, all) when the row carries all four splits.
fn split_total(row: &SizeRow) -> Option<SplitTotal> {
    let get = |split: SplitName| row.get(split.as_str()).copied();
    let (train, val, test, all) = (
        get(SplitName::Train)?,
        get(SplitName::Val)?,
        get(SplitName::Test)?,
        get(SplitName::All)?,
    );
    Some(
        train
            .checked_add(val)
            .and_then(|sum| sum.checked_add(test))
            .map_or(SplitTotal::Overflow, |parts| SplitTotal::Sum(parts, all)),
    )
}

fn band_list<T: std::fmt::Display>(bands: &BTreeSet<T>) -> String {
    bands
        .iter()
        .map(|band| band.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if !is_valid_version_token(schema_version) {
        bail!(
            "schema_version must match ^[A-Za-z0-9_.-]+$, got '{}'",
            schema_version
        );
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let schema = load_catalog_schema()?;
    schema.validate(
        &format!("survey catalog {}", catalog_path.display()),
        &catalog_value,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let issues = validate_catalog(&Catalog::builtin());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        assert!(CatalogIndex::new(Catalog::builtin()).is_ok());
    }

    #[test]
    fn overlapping_splits_are_reported() {
        let mut catalog = Catalog::builtin();
        catalog
            .schemes
            .dhs_ooc_a
            .splits
            .get_mut(&SplitName::Val)
            .unwrap()
            .push("malawi".to_string());
        let issues = validate_catalog(&catalog);
        assert!(
            issues
                .iter()
                .any(|i| i == "DHS_OOC_A assigns 'malawi' to both train and val"),
            "{issues:?}"
        );
    }

    #[test]
    fn foreign_identifiers_are_reported() {
        let mut catalog = Catalog::builtin();
        catalog
            .schemes
            .three_country
            .splits
            .insert(SplitName::Test, vec!["tanzania_2012".to_string()]);
        let issues = validate_catalog(&catalog);
        assert_eq!(
            issues,
            vec!["3country test references 'tanzania_2012', which is not a DHS country"]
        );
    }

    #[test]
    fn broken_rotation_is_reported() {
        let mut catalog = Catalog::builtin();
        catalog
            .schemes
            .dhs_ooc_c
            .splits
            .insert(SplitName::Test, vec!["nigeria".to_string()]);
        catalog
            .schemes
            .dhs_ooc_c
            .splits
            .insert(SplitName::Val, vec!["malawi".to_string()]);
        let issues = validate_catalog(&catalog);
        assert!(issues.iter().any(|i| i.contains("tests 'malawi' 0 times")));
        assert!(issues.iter().any(|i| i.contains("tests 'nigeria' 2 times")));
    }

    #[test]
    fn band_parity_is_enforced() {
        let mut catalog = Catalog::builtin();
        catalog.statistics.dhsnl.std_devs.remove(&Band::Viirs);
        let issues = validate_catalog(&catalog);
        assert_eq!(issues, vec!["DHSNL has means without std_devs for VIIRS"]);

        let mut catalog = Catalog::builtin();
        catalog.statistics.dhsnl.means.remove(&Band::Dmsp);
        catalog.statistics.dhsnl.std_devs.remove(&Band::Dmsp);
        let issues = validate_catalog(&catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("DHSNL bands"));
    }

    #[test]
    fn negative_std_dev_is_reported() {
        let mut catalog = Catalog::builtin();
        catalog.statistics.dhs.std_devs.insert(Band::Red, -0.1);
        let issues = validate_catalog(&catalog);
        assert_eq!(issues, vec!["DHS RED std_dev -0.1 is negative"]);
    }

    #[test]
    fn size_arithmetic_is_checked() {
        let mut catalog = Catalog::builtin();
        catalog
            .retired
            .sizes
            .urban
            .get_mut("DHS_OOC_D")
            .unwrap()
            .insert("train".to_string(), 3893);
        let issues = validate_catalog(&catalog);
        assert_eq!(issues.len(), 2, "{issues:?}");
        assert!(issues.iter().any(|i| i.starts_with("urban sizes for DHS_OOC_D")));
        assert!(issues.iter().any(|i| i.starts_with("DHS_OOC_D train: urban 3893")));
    }

    #[test]
    fn oversized_counts_are_reported_not_summed() {
        let mut catalog = Catalog::builtin();
        catalog.retired.sizes.all.insert(
            "DHS_OOC_F".to_string(),
            SizeRow::from([
                ("train".to_string(), u64::MAX),
                ("val".to_string(), 1),
                ("test".to_string(), 0),
                ("all".to_string(), 0),
            ]),
        );
        let issues = validate_catalog(&catalog);
        assert_eq!(
            issues,
            vec!["all sizes for DHS_OOC_F: train + val + test overflows"]
        );

        let mut catalog = Catalog::builtin();
        let rural = catalog.retired.sizes.rural.get_mut("DHS").unwrap();
        rural.insert("all".to_string(), u64::MAX);
        let issues = validate_catalog(&catalog);
        assert!(
            issues
                .iter()
                .any(|i| i == &format!("DHS all: urban 6801 + rural {} overflows", u64::MAX)),
            "{issues:?}"
        );
    }

    #[test]
    fn duplicate_countries_are_reported() {
        let mut catalog = Catalog::builtin();
        catalog.countries.lsms.push("Malawi".to_string());
        catalog.countries.lsms.push("uganda".to_string());
        let issues = validate_catalog(&catalog);
        assert_eq!(
            issues,
            vec![
                "LSMS country 'Malawi' must be lowercase",
                "LSMS country 'uganda' is listed twice",
            ]
        );
    }

    #[test]
    fn split_of_resolves_surveys_through_country() {
        let index = CatalogIndex::builtin();
        assert_eq!(index.split_of(SchemeId::DhsOocA, "malawi"), Some(SplitName::Train));
        assert_eq!(
            index.split_of(SchemeId::DhsOocA, "nigeria_2015"),
            Some(SplitName::Test)
        );
        assert_eq!(
            index.split_of(SchemeId::ThreeCountry, "malawi_2015"),
            Some(SplitName::Val)
        );
        // 3country is keyed by survey, so other years of the same country are unassigned.
        assert_eq!(index.split_of(SchemeId::ThreeCountry, "malawi_2010"), None);
        assert_eq!(index.split_of(SchemeId::DhsOocB, "tanzania"), None);
    }

    #[test]
    fn new_rejects_invalid_catalogs() {
        let mut catalog = Catalog::builtin();
        catalog.countries.dhs.clear();
        let err = CatalogIndex::new(catalog).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("catalog 'builtin_v1' failed validation"));
        assert!(message.contains("DHS country list is empty"));
    }

    #[test]
    fn schema_version_must_be_allowed() {
        assert!(validate_schema_version("survey_catalog_v1").is_ok());
        assert!(validate_schema_version("survey_catalog_v2").is_err());
        assert!(validate_schema_version("bad version").is_err());
    }
}
