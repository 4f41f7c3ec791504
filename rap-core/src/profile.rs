//! Canonical routing profiles (transportation modes).
//!
//! Profiles use a dotted vocabulary: a base mode (`driving`, `walking`,
//! `cycling`) optionally followed by a sub-variant such as `cycling.mountain`.
//! Provider adapters translate these names into their own vocabulary and
//! reject profiles they cannot serve.
//!
//! # Examples
//! ```
//! use rap_core::RoutingProfile;
//!
//! let profile: RoutingProfile = "Cycling.Mountain".parse()?;
//! assert_eq!(profile, RoutingProfile::CyclingMountain);
//! assert_eq!(profile.to_string(), "cycling.mountain");
//! assert_eq!(profile.base(), RoutingProfile::Cycling);
//! # Ok::<(), rap_core::ParseProfileError>(())
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transportation mode requested from a routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoutingProfile {
    /// Any motor vehicle; providers pick their default car profile.
    Driving,
    /// Passenger car.
    DrivingCar,
    /// Heavy goods vehicle.
    DrivingHgv,
    /// Any pedestrian mode.
    Walking,
    /// Regular walking.
    WalkingNormal,
    /// Hiking trails allowed.
    WalkingHiking,
    /// Any bicycle mode.
    Cycling,
    /// Regular bicycle.
    CyclingNormal,
    /// Road bike.
    CyclingRoad,
    /// Safest cycling route.
    CyclingSafe,
    /// Mountain bike.
    CyclingMountain,
    /// Touring bike.
    CyclingTour,
    /// Electric bike.
    CyclingEbike,
}

/// Error returned when a string is not a canonical profile name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown routing profile '{0}'")]
pub struct ParseProfileError(pub String);

impl RoutingProfile {
    /// Every canonical profile, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Driving,
        Self::DrivingCar,
        Self::DrivingHgv,
        Self::Walking,
        Self::WalkingNormal,
        Self::WalkingHiking,
        Self::Cycling,
        Self::CyclingNormal,
        Self::CyclingRoad,
        Self::CyclingSafe,
        Self::CyclingMountain,
        Self::CyclingTour,
        Self::CyclingEbike,
    ];

    /// Return the canonical dotted name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::DrivingCar => "driving.car",
            Self::DrivingHgv => "driving.hgv",
            Self::Walking => "walking",
            Self::WalkingNormal => "walking.normal",
            Self::WalkingHiking => "walking.hiking",
            Self::Cycling => "cycling",
            Self::CyclingNormal => "cycling.normal",
            Self::CyclingRoad => "cycling.road",
            Self::CyclingSafe => "cycling.safe",
            Self::CyclingMountain => "cycling.mountain",
            Self::CyclingTour => "cycling.tour",
            Self::CyclingEbike => "cycling.ebike",
        }
    }

    /// Return the base mode a sub-variant belongs to.
    pub const fn base(&self) -> Self {
        match self {
            Self::Driving | Self::DrivingCar | Self::DrivingHgv => Self::Driving,
            Self::Walking | Self::WalkingNormal | Self::WalkingHiking => Self::Walking,
            Self::Cycling
            | Self::CyclingNormal
            | Self::CyclingRoad
            | Self::CyclingSafe
            | Self::CyclingMountain
            | Self::CyclingTour
            | Self::CyclingEbike => Self::Cycling,
        }
    }
}

impl std::fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoutingProfile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str() == wanted)
            .ok_or_else(|| ParseProfileError(s.to_owned()))
    }
}

impl TryFrom<String> for RoutingProfile {
    type Error = ParseProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoutingProfile> for String {
    fn from(profile: RoutingProfile) -> Self {
        profile.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    fn every_profile_round_trips_through_its_name() {
        for profile in RoutingProfile::ALL {
            assert_eq!(RoutingProfile::from_str(profile.as_str()), Ok(profile));
        }
    }

    #[rstest]
    #[case("WALKING", RoutingProfile::Walking)]
    #[case(" driving.hgv ", RoutingProfile::DrivingHgv)]
    fn parsing_is_case_and_whitespace_insensitive(
        #[case] raw: &str,
        #[case] expected: RoutingProfile,
    ) {
        assert_eq!(raw.parse::<RoutingProfile>(), Ok(expected));
    }

    #[rstest]
    fn parsing_rejects_unknown() {
        let err = RoutingProfile::from_str("teleport").expect_err("unknown profile");
        assert_eq!(err.to_string(), "unknown routing profile 'teleport'");
    }

    #[rstest]
    #[case(RoutingProfile::DrivingHgv, RoutingProfile::Driving)]
    #[case(RoutingProfile::WalkingHiking, RoutingProfile::Walking)]
    #[case(RoutingProfile::CyclingEbike, RoutingProfile::Cycling)]
    #[case(RoutingProfile::Cycling, RoutingProfile::Cycling)]
    fn sub_variants_report_their_base(#[case] profile: RoutingProfile, #[case] base: RoutingProfile) {
        assert_eq!(profile.base(), base);
    }
}
