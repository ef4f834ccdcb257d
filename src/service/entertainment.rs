//! The entertainment configuration data model (§3 "EntertainmentConfiguration",
//! "EntertainmentChannel") and the REST actions the streaming engine drives
//! against it (§4.5, §4.7.2). The bridge treats a configuration as mutable
//! shared state; this crate treats an [`EntertainmentConfigurationData`] as
//! a point-in-time snapshot, re-fetched by [`crate::service::Bridge`] rather
//! than kept live.

use crate::service::{BasicMetadata, BasicStatus, ResourceIdentifier, ResourceType};
use serde::{Deserialize, Serialize};

/// A named group of lights positioned in 3D space, addressable as a single
/// streaming target. The `action=start`/`action=stop` REST transitions
/// (§4.7.2) are driven by [`crate::streaming::StreamingSession`] against a
/// snapshot of this data, not by a method on this type.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntertainmentConfigurationData {
    /// Unique identifier representing a specific resource instance.
    pub id: String,
    /// Clip v1 resource identifier.
    pub id_v1: Option<String>,
    pub metadata: BasicMetadata,
    /// Defines which type of application this channel assignment was
    /// optimized for.
    pub configuration_type: EntertainmentConfigurationType,
    /// Read-only field reporting if the stream is active or not.
    pub status: BasicStatus,
    /// Set to the application id of the active streamer while `status` is
    /// [`BasicStatus::Active`].
    pub active_streamer: Option<ResourceIdentifier>,
    pub stream_proxy: StreamProxy,
    /// Holds the channels. Each channel groups segments of one or more
    /// lights; `channel_id` is the on-wire light identifier (§4.7.1).
    pub channels: Vec<EntertainmentChannel>,
    /// Entertainment services of the lights in this configuration, with
    /// their positions.
    pub locations: EntertainmentServiceLocations,
}

impl EntertainmentConfigurationData {
    pub fn rid(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            rid: self.id.to_owned(),
            rtype: ResourceType::EntertainmentConfiguration,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentConfigurationType {
    /// Channels are organized around content from a screen.
    Screen,
    /// Channels are organized around content from one or several monitors.
    Monitor,
    /// Channels are organized for music synchronization.
    Music,
    /// Channels are organized to provide 3D spatial effects.
    #[serde(rename = "3dspace")]
    Space3D,
    #[serde(other)]
    /// General use case.
    Other,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StreamProxy {
    pub mode: StreamProxyMode,
    /// Reference to the device relaying entertainment traffic: the bridge
    /// itself ([`StreamProxyMode::Auto`]) or a caller-chosen
    /// [`ResourceType::ZigbeeConnectivity`] node ([`StreamProxyMode::Manual`]).
    pub node: ResourceIdentifier,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamProxyMode {
    Auto,
    Manual,
}

/// One addressable slot within an [`EntertainmentConfiguration`]; the
/// `channel_id` is the 1-byte on-wire light identifier used in every
/// streaming datagram (§4.7.1).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntertainmentChannel {
    /// Assigned by the bridge on creation; 0-255, unique within a
    /// configuration.
    pub channel_id: u8,
    /// Average position of this channel's members, in `[-1.0, 1.0]` per
    /// axis.
    pub position: Position,
    /// Segments that are members of this channel.
    pub members: Vec<SegmentReference>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SegmentReference {
    pub service: ResourceIdentifier,
    pub index: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntertainmentServiceLocations {
    pub service_locations: Vec<EntertainmentServiceLocation>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntertainmentServiceLocation {
    pub service: ResourceIdentifier,
    /// Positions of the service; more than one when it spans multiple
    /// segments.
    pub positions: Vec<Position>,
    /// Relative equalization factor, compensating for brightness
    /// differences across the configuration. Cannot be `0`.
    pub equalization_factor: f32,
}

/// A device capable of participating in an entertainment stream, either as
/// a light renderer or as a proxy node (§4.3, §4.5's `list_entertainments`).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntertainmentData {
    /// Unique identifier representing a specific resource instance.
    pub id: String,
    /// Clip v1 resource identifier.
    pub id_v1: Option<String>,
    /// Owner of the service, in case the owner service is deleted, the
    /// service also gets deleted.
    pub owner: ResourceIdentifier,
    /// Indicates if a lamp can be used for entertainment streaming as a
    /// renderer.
    pub renderer: bool,
    /// Which light service is linked to this entertainment service, used
    /// to resolve a channel to a physical light (§3 "Light").
    pub renderer_reference: Option<ResourceIdentifier>,
    /// Indicates if a lamp can be used as a proxy node.
    pub proxy: bool,
    /// Indicates if a lamp can handle the equalization factor.
    pub equalizer: bool,
    /// Maximum number of parallel streaming sessions the bridge supports.
    pub max_streams: Option<usize>,
}

impl EntertainmentData {
    pub fn rid(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            rid: self.id.to_owned(),
            rtype: ResourceType::Entertainment,
        }
    }
}
