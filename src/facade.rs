//! The facade (C9): the top-level object a caller drives through
//! `discover → select bridge → select configuration → start → set colors →
//! stop` (§6's programmatic surface sketch). Owns every bridge, selection
//! and active session explicitly rather than relying on singletons (§9
//! REDESIGN FLAGS).

use crate::{
    config::StreamingConfig,
    error::{ConfigError, HueError},
    service::{Bridge, BridgeBuilder, EntertainmentConfigurationData, Position},
    streaming::{ChannelColor, ColorSpace, StreamingSession},
};
use std::collections::HashMap;

/// Manages discovery and zero-or-more concurrent streaming sessions across
/// however many bridges [`discover`](HueEntertainment::discover) finds.
pub struct HueEntertainment {
    builder: BridgeBuilder,
    bridges: HashMap<String, Bridge>,
    selections: HashMap<String, EntertainmentConfigurationData>,
    sessions: HashMap<String, StreamingSession>,
    streaming_config: StreamingConfig,
}

impl HueEntertainment {
    /// Validates `app_name` against the bridge's `devicetype` grammar; see
    /// [`BridgeBuilder::new`].
    pub fn new(app_name: impl Into<String>) -> Result<Self, HueError> {
        Ok(HueEntertainment {
            builder: BridgeBuilder::new(app_name)?,
            bridges: HashMap::new(),
            selections: HashMap::new(),
            sessions: HashMap::new(),
            streaming_config: StreamingConfig::default(),
        })
    }

    pub fn with_streaming_config(mut self, config: StreamingConfig) -> Self {
        self.streaming_config = config;
        self
    }

    /// Exposes the underlying builder for `auth_path`/`bridge_cache_path`/
    /// `manual_address` configuration before the first `discover()`.
    pub fn builder_mut(&mut self) -> &mut BridgeBuilder {
        &mut self.builder
    }

    pub async fn discover(&mut self) -> Result<(), HueError> {
        self.bridges = self.builder.discover().await?;
        Ok(())
    }

    pub fn list_bridges(&self) -> Vec<&str> {
        self.bridges.keys().map(String::as_str).collect()
    }

    fn bridge(&self, bridge_name: &str) -> Result<&Bridge, HueError> {
        self.bridges
            .get(bridge_name)
            .ok_or_else(|| HueError::InvalidConfig(ConfigError::UnknownBridge(bridge_name.to_string())))
    }

    pub async fn list_configurations(&self, bridge_name: &str) -> Result<Vec<String>, HueError> {
        let configs = self.bridge(bridge_name)?.list_entertainment_configurations().await?;
        Ok(configs
            .into_values()
            .map(|c| c.metadata.name.unwrap_or(c.id))
            .collect())
    }

    /// Resolves each channel in the currently selected configuration to its
    /// light name and default position, via the renderer reference chain
    /// `channel -> entertainment service -> light` (§4.3 step d, §6).
    pub async fn list_lights(
        &self,
        bridge_name: &str,
    ) -> Result<Vec<(u8, String, Position)>, HueError> {
        let bridge = self.bridge(bridge_name)?;
        let config = self
            .selections
            .get(bridge_name)
            .ok_or(HueError::InvalidConfig(ConfigError::NoActiveConfiguration))?;
        let entertainments = bridge.list_entertainments().await?;
        let lights = bridge.list_lights().await?;

        let mut resolved = Vec::new();
        for channel in &config.channels {
            let name = channel.members.iter().find_map(|member| {
                entertainments
                    .get(&member.service.rid)
                    .and_then(|e| e.renderer_reference.as_ref())
                    .and_then(|rid| lights.get(&rid.rid))
                    .map(|light| light.metadata.name.clone())
            });
            if let Some(name) = name {
                resolved.push((channel.channel_id, name, channel.position));
            }
        }
        Ok(resolved)
    }

    /// Fetches the bridge's Entertainment Configurations and selects the
    /// one named `config_name` (matched against its metadata name, falling
    /// back to its id) for subsequent `start`/`set_colors`/`stop` calls.
    pub async fn select(&mut self, bridge_name: &str, config_name: &str) -> Result<(), HueError> {
        let configs = self.bridge(bridge_name)?.list_entertainment_configurations().await?;
        let config = configs
            .into_values()
            .find(|c| c.metadata.name.as_deref() == Some(config_name) || c.id == config_name)
            .ok_or_else(|| HueError::InvalidConfig(ConfigError::UnknownConfig(config_name.to_string())))?;
        self.selections.insert(bridge_name.to_string(), config);
        Ok(())
    }

    pub fn set_color_space(&self, bridge_name: &str, space: ColorSpace) -> Result<(), HueError> {
        self.sessions
            .get(bridge_name)
            .ok_or(HueError::NotStreaming)
            .map(|session| session.set_color_space(space))
    }

    pub async fn start(&mut self, bridge_name: &str) -> Result<(), HueError> {
        if self.sessions.contains_key(bridge_name) {
            return Err(HueError::AlreadyStreaming);
        }
        let bridge = self.bridge(bridge_name)?;
        let config = self
            .selections
            .get(bridge_name)
            .cloned()
            .ok_or(HueError::InvalidConfig(ConfigError::NoActiveConfiguration))?;
        let mut session = StreamingSession::new(bridge, config, self.streaming_config.clone())?;
        session.start().await?;
        self.sessions.insert(bridge_name.to_string(), session);
        Ok(())
    }

    pub async fn start_all(&mut self) -> Result<(), HueError> {
        let names: Vec<String> = self
            .bridges
            .keys()
            .filter(|name| self.selections.contains_key(*name))
            .cloned()
            .collect();
        for name in names {
            self.start(&name).await?;
        }
        Ok(())
    }

    pub async fn set_colors(&self, bridge_name: &str, frame: &[ChannelColor]) -> Result<(), HueError> {
        self.sessions
            .get(bridge_name)
            .ok_or(HueError::NotStreaming)?
            .set_colors(frame)
            .await
    }

    pub async fn stop(&mut self, bridge_name: &str) -> Result<(), HueError> {
        let mut session = self.sessions.remove(bridge_name).ok_or(HueError::NotStreaming)?;
        session.stop().await
    }

    pub async fn stop_all(&mut self) -> Result<(), HueError> {
        let names: Vec<String> = self.sessions.keys().cloned().collect();
        for name in names {
            self.stop(&name).await?;
        }
        Ok(())
    }
}
