//! Compiled-in catalog values.
//!
//! Band statistics were computed over the entire dataset (train + val + test)
//! with negative values set to 0, ignoring any pixel that is 0 across all bands.

use crate::catalog::identity::{Band, CatalogKey, DatasetFamily, SplitName};
use crate::catalog::model::{
    BandMoments, BandStatistic, BandStatistics, Catalog, CountryLists, RetiredEntries,
    SchemeTable, SizeRow, SizeTables, SplitScheme, StatisticsTable,
};
use std::collections::BTreeMap;

pub const BUILTIN_CATALOG_KEY: &str = "builtin_v1";
pub const CATALOG_SCHEMA_VERSION: &str = "survey_catalog_v1";

const DHS_COUNTRIES: &[&str] = &["malawi", "nigeria", "uganda"];
const LSMS_COUNTRIES: &[&str] = &["malawi", "nigeria", "uganda"];

const MEANS_DHS: [(Band, f64); 9] = [
    (Band::Blue, 0.051247),
    (Band::Green, 0.081732),
    (Band::Red, 0.095362),
    (Band::Swir1, 0.0),
    (Band::Swir2, 0.0),
    (Band::Temp1, 0.0),
    (Band::Nir, 0.0),
    (Band::Dmsp, 0.0),
    (Band::Viirs, 0.794076),
];

const STD_DEVS_DHS: [(Band, f64); 9] = [
    (Band::Blue, 0.018856),
    (Band::Green, 0.026702),
    (Band::Red, 0.043868),
    (Band::Swir1, 0.0),
    (Band::Swir2, 0.0),
    (Band::Temp1, 0.0),
    (Band::Nir, 0.0),
    (Band::Dmsp, 0.0),
    (Band::Viirs, 6.060732),
];

// The nightlights-augmented variant currently shares the DHS values.
const MEANS_DHSNL: [(Band, f64); 9] = MEANS_DHS;
const STD_DEVS_DHSNL: [(Band, f64); 9] = STD_DEVS_DHS;

const MEANS_LSMS: [(Band, f64); 9] = [
    (Band::Blue, 0.062551),
    (Band::Green, 0.090696),
    (Band::Red, 0.105640),
    (Band::Swir1, 0.242577),
    (Band::Swir2, 0.165792),
    (Band::Temp1, 299.495280),
    (Band::Nir, 0.256701),
    (Band::Dmsp, 5.105815),
    (Band::Viirs, 0.557793),
];

const STD_DEVS_LSMS: [(Band, f64); 9] = [
    (Band::Blue, 0.023979),
    (Band::Green, 0.032121),
    (Band::Red, 0.051943),
    (Band::Swir1, 0.088163),
    (Band::Swir2, 0.083826),
    (Band::Temp1, 4.678959),
    (Band::Nir, 0.059025),
    (Band::Dmsp, 31.688320),
    (Band::Viirs, 6.421816),
];

const LSMS_SURVEY_NAMES: &[&str] = &[
    "ethiopia_2011",
    "ethiopia_2015",
    "malawi_2010",
    "malawi_2016",
    "nigeria_2010",
    "nigeria_2015",
    "tanzania_2008",
    "tanzania_2012",
    "uganda_2005",
    "uganda_2009",
    "uganda_2013",
];

type SizeRows = &'static [(&'static str, &'static [(&'static str, u64)])];

const SIZES: SizeRows = &[
    ("DHS", &[("train", 12319), ("val", 3257), ("test", 4093), ("all", 19669)]),
    ("DHSNL", &[("all", 260415)]),
    ("DHS_OOC_A", &[("train", 11797), ("val", 3909), ("test", 3963), ("all", 19669)]),
    ("DHS_OOC_B", &[("train", 11820), ("val", 3940), ("test", 3909), ("all", 19669)]),
    ("DHS_OOC_C", &[("train", 11800), ("val", 3929), ("test", 3940), ("all", 19669)]),
    ("DHS_OOC_D", &[("train", 11812), ("val", 3928), ("test", 3929), ("all", 19669)]),
    ("DHS_OOC_E", &[("train", 11778), ("val", 3963), ("test", 3928), ("all", 19669)]),
    ("DHS_incountry_A", &[("train", 11801), ("val", 3934), ("test", 3934), ("all", 19669)]),
    ("DHS_incountry_B", &[("train", 11801), ("val", 3934), ("test", 3934), ("all", 19669)]),
    ("DHS_incountry_C", &[("train", 11801), ("val", 3934), ("test", 3934), ("all", 19669)]),
    ("DHS_incountry_D", &[("train", 11802), ("val", 3933), ("test", 3934), ("all", 19669)]),
    ("DHS_incountry_E", &[("train", 11802), ("val", 3934), ("test", 3933), ("all", 19669)]),
    ("LSMSincountry", &[("train", 1812), ("val", 604), ("test", 604), ("all", 3020)]),
    (
        "LSMS",
        &[
            ("ethiopia_2011", 327),
            ("ethiopia_2015", 327),
            ("malawi_2010", 102),
            ("malawi_2016", 102),
            ("nigeria_2010", 480),
            ("nigeria_2015", 480),
            ("tanzania_2008", 300),
            ("tanzania_2012", 300),
            ("uganda_2005", 165),
            ("uganda_2009", 165),
            ("uganda_2013", 165),
        ],
    ),
];

const URBAN_SIZES: SizeRows = &[
    ("DHS", &[("train", 3954), ("val", 1212), ("test", 1635), ("all", 6801)]),
    ("DHS_OOC_A", &[("train", 4264), ("val", 1221), ("test", 1316), ("all", 6801)]),
    ("DHS_OOC_B", &[("train", 4225), ("val", 1355), ("test", 1221), ("all", 6801)]),
    ("DHS_OOC_C", &[("train", 4010), ("val", 1436), ("test", 1355), ("all", 6801)]),
    ("DHS_OOC_D", &[("train", 3892), ("val", 1473), ("test", 1436), ("all", 6801)]),
    ("DHS_OOC_E", &[("train", 4012), ("val", 1316), ("test", 1473), ("all", 6801)]),
];

const RURAL_SIZES: SizeRows = &[
    ("DHS", &[("train", 8365), ("val", 2045), ("test", 2458), ("all", 12868)]),
    ("DHS_OOC_A", &[("train", 7533), ("val", 2688), ("test", 2647), ("all", 12868)]),
    ("DHS_OOC_B", &[("train", 7595), ("val", 2585), ("test", 2688), ("all", 12868)]),
    ("DHS_OOC_C", &[("train", 7790), ("val", 2493), ("test", 2585), ("all", 12868)]),
    ("DHS_OOC_D", &[("train", 7920), ("val", 2455), ("test", 2493), ("all", 12868)]),
    ("DHS_OOC_E", &[("train", 7766), ("val", 2647), ("test", 2455), ("all", 12868)]),
];

impl Catalog {
    /// The catalog compiled into this crate.
    pub fn builtin() -> Catalog {
        let catalog = Catalog {
            schema_version: CATALOG_SCHEMA_VERSION.to_string(),
            key: CatalogKey(BUILTIN_CATALOG_KEY.to_string()),
            countries: CountryLists {
                dhs: strings(DHS_COUNTRIES),
                lsms: strings(LSMS_COUNTRIES),
            },
            schemes: SchemeTable {
                three_country: scheme(&[
                    (SplitName::Train, &["uganda_2016", "nigeria_2015"]),
                    (SplitName::Val, &["malawi_2015"]),
                ]),
                dhs_ooc_a: scheme(&[
                    (SplitName::Train, &["malawi"]),
                    (SplitName::Val, &["uganda"]),
                    (SplitName::Test, &["nigeria"]),
                ]),
                dhs_ooc_b: scheme(&[
                    (SplitName::Train, &["nigeria"]),
                    (SplitName::Val, &["malawi"]),
                    (SplitName::Test, &["uganda"]),
                ]),
                dhs_ooc_c: scheme(&[
                    (SplitName::Train, &["uganda"]),
                    (SplitName::Val, &["nigeria"]),
                    (SplitName::Test, &["malawi"]),
                ]),
            },
            statistics: StatisticsTable {
                dhs: statistics(&MEANS_DHS, &STD_DEVS_DHS),
                dhsnl: statistics(&MEANS_DHSNL, &STD_DEVS_DHSNL),
            },
            retired: RetiredEntries {
                lsms_survey_names: strings(LSMS_SURVEY_NAMES),
                lsms_statistics: Some(statistics(&MEANS_LSMS, &STD_DEVS_LSMS)),
                nightlights_overall: Some(BandMoments {
                    mean: 5.101585,
                    std_dev: 23.342916,
                }),
                sizes: SizeTables {
                    all: size_rows(SIZES),
                    urban: size_rows(URBAN_SIZES),
                    rural: size_rows(RURAL_SIZES),
                },
            },
        };
        log::debug!("constructed built-in catalog '{}'", catalog.key.0);
        catalog
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// Every active scheme in this catalog draws from the DHS country list.
fn scheme(splits: &[(SplitName, &[&str])]) -> SplitScheme {
    SplitScheme {
        family: DatasetFamily::Dhs,
        splits: splits
            .iter()
            .map(|(name, ids)| (*name, strings(ids)))
            .collect(),
    }
}

fn band_map(values: &[(Band, f64)]) -> BandStatistic {
    values.iter().copied().collect()
}

fn statistics(means: &[(Band, f64)], std_devs: &[(Band, f64)]) -> BandStatistics {
    BandStatistics {
        means: band_map(means),
        std_devs: band_map(std_devs),
    }
}

fn size_rows(rows: SizeRows) -> BTreeMap<String, SizeRow> {
    rows.iter()
        .map(|(key, counts)| {
            let row = counts
                .iter()
                .map(|(entry, count)| (entry.to_string(), *count))
                .collect();
            (key.to_string(), row)
        })
        .collect()
}
