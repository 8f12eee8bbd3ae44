//! Catalog selection and the process-wide instance.
//!
//! The catalog is installed once, before concurrent readers start, and is only
//! read afterwards. `catalog()` falls back to the compiled-in tables when no
//! catalog was installed explicitly.

use crate::catalog::CatalogIndex;
use anyhow::{Result, anyhow};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Points at a JSON catalog file that replaces the compiled-in tables.
pub const CATALOG_PATH_ENV: &str = "SURVEY_CATALOG_PATH";

static CATALOG: OnceLock<CatalogIndex> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

impl CatalogSource {
    /// Select the source from `SURVEY_CATALOG_PATH`.
    pub fn from_env() -> Self {
        Self::from_env_value(env::var_os(CATALOG_PATH_ENV))
    }

    /// Empty or whitespace-only values select the built-in catalog.
    pub fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(raw) if !raw.to_string_lossy().trim().is_empty() => {
                CatalogSource::File(PathBuf::from(raw))
            }
            _ => CatalogSource::Builtin,
        }
    }

    pub fn load(&self) -> Result<CatalogIndex> {
        match self {
            CatalogSource::Builtin => Ok(CatalogIndex::builtin()),
            CatalogSource::File(path) => CatalogIndex::load(path),
        }
    }
}

/// The process-wide catalog, installing the built-in one on first use.
pub fn catalog() -> &'static CatalogIndex {
    CATALOG.get_or_init(|| {
        log::debug!("no catalog installed; using built-in tables");
        CatalogIndex::builtin()
    })
}

/// Install `index` as the process-wide catalog.
///
/// Fails when a catalog is already in place, including the built-in fallback
/// installed by an earlier `catalog()` call.
pub fn install_catalog(index: CatalogIndex) -> Result<&'static CatalogIndex> {
    let key = index.key().0.clone();
    CATALOG
        .set(index)
        .map_err(|_| anyhow!("a catalog is already installed; refusing to replace it with '{key}'"))?;
    log::debug!("installed catalog '{key}'");
    Ok(catalog())
}

/// Load the catalog selected by the environment and install it.
pub fn init_from_env() -> Result<&'static CatalogIndex> {
    let source = CatalogSource::from_env();
    log::debug!("loading catalog from {source:?}");
    install_catalog(source.load()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn env_value_selects_source() {
        assert_eq!(CatalogSource::from_env_value(None), CatalogSource::Builtin);
        assert_eq!(
            CatalogSource::from_env_value(Some(OsString::from("  "))),
            CatalogSource::Builtin
        );
        assert_eq!(
            CatalogSource::from_env_value(Some(OsString::from("/etc/catalog.json"))),
            CatalogSource::File(PathBuf::from("/etc/catalog.json"))
        );
    }

    #[test]
    fn builtin_source_loads_builtin_key() {
        let index = CatalogSource::Builtin.load().unwrap();
        assert_eq!(index.key().0, crate::catalog::BUILTIN_CATALOG_KEY);
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = CatalogSource::File(Path::new("/nonexistent/catalog.json").to_path_buf());
        let err = source.load().unwrap_err();
        assert!(format!("{err:#}").contains("opening catalog"));
    }
}
