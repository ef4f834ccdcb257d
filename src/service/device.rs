//! The device model, trimmed to what channel→light name resolution needs
//! (§4.3 step d, §3 "Light"). Full device CRUD (usertest mode, identify,
//! firmware status) is out of scope per SPEC_FULL.md §1 Non-goals.

use crate::service::{ResourceIdentifier, ResourceType};
use serde::{Deserialize, Serialize};

/// A physical product owning one or more services (here: at most one
/// [`crate::service::Light`]'s worth of data). Read-only: this crate never
/// issues device commands.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeviceData {
    /// Unique identifier representing a specific resource instance.
    pub id: String,
    /// Clip v1 resource identifier.
    pub id_v1: Option<String>,
    /// Additional metadata including a user given name.
    pub metadata: DeviceMetadata,
    /// References all services providing control and state of the device.
    pub services: Vec<ResourceIdentifier>,
}

impl DeviceData {
    pub fn rid(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            rid: self.id.to_owned(),
            rtype: ResourceType::Device,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeviceMetadata {
    /// Human readable name of a resource.
    pub name: String,
    /// Product archetype.
    pub archetype: ProductArchetype,
}

/// Metadata shared by resources that only carry a name.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BasicMetadata {
    pub name: Option<String>,
}

/// A simple active/inactive status, shared by
/// [`crate::service::EntertainmentConfigurationData`] and other resources
/// that report activity without richer state.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicStatus {
    Active,
    Inactive,
}

/// Known classes of compatible products. Informational only; this crate
/// makes no archetype-dependent decisions.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductArchetype {
    Bollard,
    BridgeV2,
    CandleBulb,
    CeilingHorizontal,
    CeilingRound,
    CeilingSquare,
    CeilingTube,
    ChristmasTree,
    ClassicBulb,
    DoubleSpot,
    EdisonBulb,
    EllipseBulb,
    FlexibleLamp,
    FloodBulb,
    FloorLantern,
    FloorShade,
    GroundSpot,
    HueBloom,
    HueCentris,
    HueGo,
    HueIris,
    HueLightstrip,
    HueLightstripPc,
    HueLightstripTv,
    HuePlay,
    HueSigne,
    HueTube,
    LargeGlobeBulb,
    LusterBulb,
    PendantLong,
    PendantRound,
    PendantSpot,
    Plug,
    RecessedCeiling,
    RecessedFloor,
    SingleSpot,
    SmallGlobeBulb,
    SpotBulb,
    StringLight,
    SultanBulb,
    TableShade,
    TableWash,
    TriangleBulb,
    UnknownArchetype,
    VintageBulb,
    VintageCandleBulb,
    WallLantern,
    WallShade,
    WallSpot,
    WallWasher,
}
