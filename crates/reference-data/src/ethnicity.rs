//! Ethnicity code set.

use crate::ReferenceCode;

/// Ethnic group of the customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ethnicity {
    EnglishWelshScottishNorthernIrishOrBritish,
    Irish,
    GypsyOrIrishTraveller,
    AnyOtherWhiteBackground,
    WhiteAndBlackCaribbean,
    WhiteAndBlackAfrican,
    WhiteAndAsian,
    AnyOtherMixedOrMultipleEthnicBackground,
    Indian,
    Pakistani,
    Bangladeshi,
    Chinese,
    AnyOtherAsianBackground,
    African,
    Caribbean,
    AnyOtherBlackAfricanOrCaribbeanBackground,
    Arab,
    AnyOtherEthnicGroup,
    NotProvided,
}

impl ReferenceCode for Ethnicity {
    const ALL: &'static [Self] = &[
        Self::EnglishWelshScottishNorthernIrishOrBritish,
        Self::Irish,
        Self::GypsyOrIrishTraveller,
        Self::AnyOtherWhiteBackground,
        Self::WhiteAndBlackCaribbean,
        Self::WhiteAndBlackAfrican,
        Self::WhiteAndAsian,
        Self::AnyOtherMixedOrMultipleEthnicBackground,
        Self::Indian,
        Self::Pakistani,
        Self::Bangladeshi,
        Self::Chinese,
        Self::AnyOtherAsianBackground,
        Self::African,
        Self::Caribbean,
        Self::AnyOtherBlackAfricanOrCaribbeanBackground,
        Self::Arab,
        Self::AnyOtherEthnicGroup,
        Self::NotProvided,
    ];

    const SET_NAME: &'static str = "Ethnicity";

    fn code(self) -> i64 {
        match self {
            Self::EnglishWelshScottishNorthernIrishOrBritish => 31,
            Self::Irish => 32,
            Self::GypsyOrIrishTraveller => 33,
            Self::AnyOtherWhiteBackground => 34,
            Self::WhiteAndBlackCaribbean => 35,
            Self::WhiteAndBlackAfrican => 36,
            Self::WhiteAndAsian => 37,
            Self::AnyOtherMixedOrMultipleEthnicBackground => 38,
            Self::Indian => 39,
            Self::Pakistani => 40,
            Self::Bangladeshi => 41,
            Self::Chinese => 42,
            Self::AnyOtherAsianBackground => 43,
            Self::African => 44,
            Self::Caribbean => 45,
            Self::AnyOtherBlackAfricanOrCaribbeanBackground => 46,
            Self::Arab => 47,
            Self::AnyOtherEthnicGroup => 98,
            Self::NotProvided => 99,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::EnglishWelshScottishNorthernIrishOrBritish => {
                "English / Welsh / Scottish / Northern Irish / British"
            }
            Self::Irish => "Irish",
            Self::GypsyOrIrishTraveller => "Gypsy or Irish Traveller",
            Self::AnyOtherWhiteBackground => "Any other White background",
            Self::WhiteAndBlackCaribbean => "White and Black Caribbean",
            Self::WhiteAndBlackAfrican => "White and Black African",
            Self::WhiteAndAsian => "White and Asian",
            Self::AnyOtherMixedOrMultipleEthnicBackground => {
                "Any other Mixed / multiple ethnic background"
            }
            Self::Indian => "Indian",
            Self::Pakistani => "Pakistani",
            Self::Bangladeshi => "Bangladeshi",
            Self::Chinese => "Chinese",
            Self::AnyOtherAsianBackground => "Any other Asian background",
            Self::African => "African",
            Self::Caribbean => "Caribbean",
            Self::AnyOtherBlackAfricanOrCaribbeanBackground => {
                "Any other Black / African / Caribbean background"
            }
            Self::Arab => "Arab",
            Self::AnyOtherEthnicGroup => "Any other ethnic group",
            Self::NotProvided => "Not provided",
        }
    }
}
