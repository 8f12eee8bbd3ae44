// Installing a catalog mutates process-wide state, so this lives in its own
// test binary with a single test.
mod support;

use anyhow::Result;
use serde_json::json;
use support::{builtin_json, write_catalog};
use survey_catalog::{
    Band, CatalogIndex, catalog, get_band_statistics, get_country_list, install_catalog,
};

#[test]
fn installed_catalog_serves_every_lookup() -> Result<()> {
    let mut value = builtin_json();
    value["key"] = json!("reprocessed_2024");
    value["statistics"]["DHSNL"]["means"]["DMSP"] = json!(4.25);
    value["statistics"]["DHSNL"]["std_devs"]["DMSP"] = json!(20.5);
    let file = write_catalog(&value)?;

    let installed = install_catalog(CatalogIndex::load(file.path())?)?;
    assert_eq!(installed.key().0, "reprocessed_2024");
    assert!(std::ptr::eq(installed, catalog()));

    let dhsnl = get_band_statistics("DHSNL")?;
    assert_eq!(dhsnl.get(Band::Dmsp), Some((4.25, 20.5)));
    assert!(dhsnl.is_populated(Band::Dmsp));
    assert!(!get_band_statistics("DHS")?.is_populated(Band::Dmsp));
    assert_eq!(get_country_list("LSMS")?, ["malawi", "nigeria", "uganda"]);

    let err = install_catalog(CatalogIndex::builtin()).unwrap_err();
    assert!(err.to_string().contains("already installed"));
    assert_eq!(catalog().key().0, "reprocessed_2024");
    Ok(())
}
