//! A Rust client for the Philips Hue Entertainment streaming API.
//!
//! Covers the full lifecycle needed to drive a Hue Entertainment
//! Configuration in real time: bridge discovery, onboarding, selecting and
//! starting an Entertainment Configuration, and streaming color updates to
//! it over a DTLS-secured UDP channel at up to 50 Hz.
//! It uses [reqwest](https://docs.rs/reqwest/0.11), the
//! [tokio](https://docs.rs/tokio/1) async runtime, and
//! [webrtc-dtls](https://docs.rs/webrtc-dtls/0.8) for the PSK handshake.
//!
//! This library is focused: it speaks the Entertainment API and nothing
//! else. It does not expose the general-purpose Hue resource CRUD (rooms,
//! scenes, schedules, rules) that the bridge's `/clip/v2` surface otherwise
//! offers.
//!
//! # Discovery and onboarding
//!
//! ```no_run
//! use hue_entertain::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), HueError> {
//! let bridges = BridgeBuilder::new("my_app#my_instance")?
//!     .discover()
//!     .await?;
//! let bridge = bridges.values().next().expect("at least one bridge");
//! println!("onboarded {}", bridge.name());
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming
//!
//! ```no_run
//! use hue_entertain::prelude::*;
//!
//! # async fn run(bridge: &Bridge, config: EntertainmentConfigurationData) -> Result<(), HueError> {
//! let mut session = StreamingSession::new(bridge, config, StreamingConfig::default())?;
//! session.start().await?;
//! session
//!     .set_colors(&[ChannelColor {
//!         channel_id: 0,
//!         color: LightColor::Rgb8(255, 0, 0),
//!     }])
//!     .await?;
//! session.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod facade;
pub mod persistence;
pub mod service;
pub mod streaming;
pub mod transport;

pub mod prelude {
    pub use crate::{
        color::LightColor,
        config::StreamingConfig,
        error::HueError,
        facade::HueEntertainment,
        service::{Bridge, BridgeBuilder, EntertainmentConfigurationData, Position},
        streaming::{ChannelColor, ColorSpace, StreamingSession},
    };
}
