use crate::error::CatalogError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Versioned key for a catalog instance (e.g., `builtin_v1`).
///
/// Recorded next to experiment outputs so a run can be traced back to the
/// exact split and statistics tables it used.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Survey dataset family that owns a country list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DatasetFamily {
    Dhs,
    Lsms,
}

/// Named split scheme: one cross-validation fold definition.
///
/// Only active schemes are representable. Retired rotations (D and E) exist
/// as size rows in `RetiredEntries` and are addressed by plain strings there.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SchemeId {
    ThreeCountry,
    DhsOocA,
    DhsOocB,
    DhsOocC,
}

/// Partition name inside a split assignment. Ordering follows declaration
/// order so maps iterate train, val, test, all.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SplitName {
    Train,
    Val,
    Test,
    All,
}

/// Imagery dataset variant with its own band statistics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DatasetVariant {
    Dhs,
    DhsNl,
}

/// Spectral or auxiliary imagery channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Band {
    Blue,
    Green,
    Red,
    Swir1,
    Swir2,
    Temp1,
    Nir,
    Dmsp,
    Viirs,
}

impl DatasetFamily {
    pub const ALL: [DatasetFamily; 2] = [DatasetFamily::Dhs, DatasetFamily::Lsms];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetFamily::Dhs => "DHS",
            DatasetFamily::Lsms => "LSMS",
        }
    }
}

impl FromStr for DatasetFamily {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DHS" => Ok(DatasetFamily::Dhs),
            "LSMS" => Ok(DatasetFamily::Lsms),
            other => Err(CatalogError::UnknownFamily(other.to_string())),
        }
    }
}

impl SchemeId {
    pub const ALL: [SchemeId; 4] = [
        SchemeId::ThreeCountry,
        SchemeId::DhsOocA,
        SchemeId::DhsOocB,
        SchemeId::DhsOocC,
    ];

    /// The out-of-country rotation; every DHS country is held out for testing
    /// in exactly one of these.
    pub const OOC_ROTATION: [SchemeId; 3] =
        [SchemeId::DhsOocA, SchemeId::DhsOocB, SchemeId::DhsOocC];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemeId::ThreeCountry => "3country",
            SchemeId::DhsOocA => "DHS_OOC_A",
            SchemeId::DhsOocB => "DHS_OOC_B",
            SchemeId::DhsOocC => "DHS_OOC_C",
        }
    }
}

impl FromStr for SchemeId {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "3country" => Ok(SchemeId::ThreeCountry),
            "DHS_OOC_A" => Ok(SchemeId::DhsOocA),
            "DHS_OOC_B" => Ok(SchemeId::DhsOocB),
            "DHS_OOC_C" => Ok(SchemeId::DhsOocC),
            other => Err(CatalogError::UnknownScheme(other.to_string())),
        }
    }
}

impl SplitName {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Val => "val",
            SplitName::Test => "test",
            SplitName::All => "all",
        }
    }
}

impl FromStr for SplitName {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "train" => Ok(SplitName::Train),
            "val" => Ok(SplitName::Val),
            "test" => Ok(SplitName::Test),
            "all" => Ok(SplitName::All),
            other => Err(CatalogError::UnknownSplit(other.to_string())),
        }
    }
}

impl DatasetVariant {
    pub const ALL: [DatasetVariant; 2] = [DatasetVariant::Dhs, DatasetVariant::DhsNl];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetVariant::Dhs => "DHS",
            DatasetVariant::DhsNl => "DHSNL",
        }
    }
}

impl FromStr for DatasetVariant {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DHS" => Ok(DatasetVariant::Dhs),
            "DHSNL" => Ok(DatasetVariant::DhsNl),
            other => Err(CatalogError::UnknownVariant(other.to_string())),
        }
    }
}

impl Band {
    pub const ALL: [Band; 9] = [
        Band::Blue,
        Band::Green,
        Band::Red,
        Band::Swir1,
        Band::Swir2,
        Band::Temp1,
        Band::Nir,
        Band::Dmsp,
        Band::Viirs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Blue => "BLUE",
            Band::Green => "GREEN",
            Band::Red => "RED",
            Band::Swir1 => "SWIR1",
            Band::Swir2 => "SWIR2",
            Band::Temp1 => "TEMP1",
            Band::Nir => "NIR",
            Band::Dmsp => "DMSP",
            Band::Viirs => "VIIRS",
        }
    }
}

impl FromStr for Band {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Band::ALL
            .into_iter()
            .find(|band| band.as_str() == value)
            .ok_or_else(|| CatalogError::UnknownBand(value.to_string()))
    }
}

// All key enums travel as their canonical strings, both as JSON values and as
// JSON object keys.
macro_rules! string_keyed {
    ($($ty:ty),+ $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    )+};
}

string_keyed!(DatasetFamily, SchemeId, SplitName, DatasetVariant, Band);
