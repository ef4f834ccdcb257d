//! The light model, trimmed to what the streaming core reads for
//! channel→light name and colorimetry resolution (§3 "Light"). Streaming
//! bypasses the per-light REST API entirely; full Light CRUD (gradient,
//! effects, powerup behavior, dynamics) is out of scope per SPEC_FULL.md
//! §1 Non-goals.

use crate::service::{ResourceIdentifier, ResourceType};
use serde::{Deserialize, Serialize};

/// A controllable bulb, strip, or other light device, as read (never
/// written) by this crate.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LightData {
    /// Unique identifier representing a specific resource instance.
    pub id: String,
    /// Clip v1 resource identifier.
    pub id_v1: Option<String>,
    /// Owner of the service, in case the owner service is deleted, the
    /// service also gets deleted.
    pub owner: ResourceIdentifier,
    pub metadata: LightMetadata,
    pub on: OnState,
    pub dimming: Option<DimmingState>,
    pub color: Option<ColorState>,
}

impl LightData {
    pub fn rid(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            rid: self.id.to_owned(),
            rtype: ResourceType::Light,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LightMetadata {
    /// Human readable name of a resource.
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OnState {
    /// On/Off state of the light. on=true, off=false.
    pub on: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DimmingState {
    /// Brightness percentage. Value cannot be `0`; writing `0` changes it
    /// to the lowest possible brightness.
    pub brightness: f32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ColorState {
    /// CIE XY gamut position of the light's current color.
    pub xy: CIEColor,
    pub gamut: Option<CIEGamut>,
    pub gamut_type: GamutType,
}

/// Color gamut of a color bulb. Some bulbs do not properly report gamut
/// information; in that case it is absent.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CIEGamut {
    pub red: CIEColor,
    pub green: CIEColor,
    pub blue: CIEColor,
}

/// A [CIE 1931 xy chromaticity](https://en.wikipedia.org/wiki/CIE_1931_color_space#CIE_xy_chromaticity_diagram_and_the_CIE_xyY_color_space)
/// coordinate, as reported by the bridge. This crate reads these values
/// only; converting arbitrary RGB/hex input into gamut space is color
/// science beyond this crate's scope (see [`crate::color`] for the two
/// conversions it does own).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CIEColor {
    pub x: f32,
    pub y: f32,
}

/// The gamut types supported by Hue.
///
/// - A: early Philips color-only products.
/// - B: limited gamut of first Hue color products.
/// - C: richer gamut of Hue white and color ambiance products.
/// - Other: non-Hue gamut or no gamut reported.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamutType {
    A,
    B,
    C,
    Other,
}
