use serde::{Deserialize, Serialize};

/// A typed reference to another bridge resource, as embedded throughout the
/// v2 resource model (`owner`, `renderer_reference`, channel `members`,
/// etc).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ResourceIdentifier {
    /// The unique id of the referenced resource.
    pub rid: String,
    /// The type of the referenced resource.
    pub rtype: ResourceType,
}

/// The resource types this crate's data model actually names. The v2 API
/// has dozens more (scenes, rooms, zigbee connectivity, …); those are out
/// of scope here, but `#[serde(other)]` keeps deserialization of a
/// `ResourceIdentifier` embedded in an in-scope resource from failing when
/// it happens to point at one of them.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[serde(rename = "auth_v1")]
    AuthV1,
    Bridge,
    Device,
    Entertainment,
    EntertainmentConfiguration,
    Light,
    ZigbeeConnectivity,
    #[serde(other)]
    Unknown,
}
