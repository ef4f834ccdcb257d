//! Bridge identity (§3 "Bridge"), the discovery strategy (C3 mDNS browsing,
//! C4 cache/mDNS/cloud/manual fallback) and onboarding (C5). A [`Bridge`] is
//! immutable once built: every field is fixed at the moment discovery and
//! registration finished, matching the bridge's own read-only `/api/config`
//! view of itself.

use crate::{
    api::BridgeClient,
    config::{self, MIN_SWVERSION},
    error::{DiscoveryError, HueError, PersistenceError},
    persistence::{self, AuthRecord, BridgeRecord},
    service::entertainment::{EntertainmentConfigurationData, EntertainmentData},
    service::light::LightData,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

/// An onboarded Hue bridge.
#[derive(Debug)]
pub struct Bridge {
    data: BridgeData,
}

impl Bridge {
    pub fn new(data: BridgeData) -> Self {
        Bridge { data }
    }

    pub fn data(&self) -> &BridgeData {
        &self.data
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn ip_address(&self) -> Ipv4Addr {
        self.data.ip_address
    }

    pub fn swversion(&self) -> u64 {
        self.data.swversion
    }

    /// Whether this bridge's firmware is new enough to speak the
    /// Entertainment streaming protocol (§3, `MIN_SWVERSION`).
    pub fn supports_streaming(&self) -> bool {
        self.data.swversion >= MIN_SWVERSION
    }

    /// A [`BridgeClient`] authenticated as this bridge's registered
    /// application.
    pub fn client(&self) -> BridgeClient {
        BridgeClient::new(
            IpAddr::V4(self.data.ip_address),
            Some(self.data.username.clone()),
        )
    }

    /// The 16-byte PSK used to key the DTLS handshake, decoded from
    /// `client_key`.
    pub fn psk(&self) -> Result<Vec<u8>, HueError> {
        hex::decode(&self.data.client_key)
            .map_err(|e| HueError::DtlsHandshake(format!("invalid client_key: {e}")))
    }

    pub async fn list_entertainment_configurations(
        &self,
    ) -> Result<HashMap<String, EntertainmentConfigurationData>, HueError> {
        self.client().list_entertainment_configurations().await
    }

    pub async fn list_entertainments(&self) -> Result<HashMap<String, EntertainmentData>, HueError> {
        self.client().list_entertainments().await
    }

    pub async fn list_lights(&self) -> Result<HashMap<String, LightData>, HueError> {
        self.client().list_lights().await
    }

    fn to_record(&self) -> BridgeRecord {
        BridgeRecord {
            id: self.data.id.clone(),
            rid: self.data.rid.clone(),
            ip_address: self.data.ip_address.to_string(),
            swversion: self.data.swversion,
            username: self.data.username.clone(),
            hue_application_id: self.data.hue_application_id.clone(),
            client_key: self.data.client_key.clone(),
            name: self.data.name.clone(),
        }
    }

    fn from_record(record: BridgeRecord) -> Result<Self, HueError> {
        let ip_address: Ipv4Addr = record.ip_address.parse().map_err(|_| {
            HueError::Persistence(PersistenceError::Parse(format!(
                "invalid cached ip address: {}",
                record.ip_address
            )))
        })?;
        Ok(Bridge::new(BridgeData {
            id: record.id,
            rid: record.rid,
            ip_address,
            swversion: record.swversion,
            username: record.username,
            hue_application_id: record.hue_application_id,
            client_key: record.client_key,
            name: record.name,
        }))
    }
}

/// Internal representation of a [`Bridge`]. Unlike the other `*Data` structs
/// in this module this one is never fetched verbatim from `/clip/v2` — it is
/// assembled field-by-field during onboarding (§4.3) from several endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BridgeData {
    pub id: String,
    pub rid: String,
    pub ip_address: Ipv4Addr,
    pub swversion: u64,
    pub username: String,
    pub hue_application_id: String,
    pub client_key: String,
    pub name: String,
}

/// Validates a candidate address against a strict dotted-quad grammar:
/// exactly four `.`-separated octets, each `0`-`255`, no leading zeros. Used
/// to screen mDNS `A` records and manually supplied addresses before an
/// onboarding attempt is made against them (§4.3, §8).
pub fn is_valid_ipv4(addr: &str) -> bool {
    let octets: Vec<&str> = addr.split('.').collect();
    if octets.len() != 4 {
        return false;
    }
    octets.iter().all(|octet| {
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if octet.len() > 1 && octet.starts_with('0') {
            return false;
        }
        octet.parse::<u16>().map(|n| n <= 255).unwrap_or(false)
    })
}

/// Drives discovery (C3, C4) and onboarding (C5) to produce [`Bridge`]
/// instances. Configuration knobs default to the paths and timeouts named in
/// [`crate::config`].
#[derive(Clone, Debug)]
pub struct BridgeBuilder {
    app_name: String,
    auth_path: PathBuf,
    bridge_cache_path: PathBuf,
    mdns_timeout: Duration,
    manual_addr: Option<Ipv4Addr>,
}

impl BridgeBuilder {
    /// Validates `app_name` against the bridge's `devicetype` grammar
    /// (`<id1>#<id2>`) up front, so a malformed name fails before any
    /// network activity.
    pub fn new(app_name: impl Into<String>) -> Result<Self, HueError> {
        let app_name = app_name.into();
        if !config::app_name_pattern().is_match(&app_name) {
            return Err(HueError::HttpBadRequest(format!(
                "app_name '{app_name}' must match <id1>#<id2>"
            )));
        }
        Ok(BridgeBuilder {
            app_name,
            auth_path: PathBuf::from(config::DEFAULT_AUTH_PATH),
            bridge_cache_path: PathBuf::from(config::DEFAULT_BRIDGE_CACHE_PATH),
            mdns_timeout: config::MDNS_DISCOVERY_TIMEOUT,
            manual_addr: None,
        })
    }

    pub fn auth_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_path = path.into();
        self
    }

    pub fn bridge_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bridge_cache_path = path.into();
        self
    }

    pub fn mdns_timeout(mut self, timeout: Duration) -> Self {
        self.mdns_timeout = timeout;
        self
    }

    /// Supplies a fallback address for the manual discovery method (§4.3
    /// step e), tried only once every automatic method has come up empty.
    pub fn manual_address(mut self, addr: Ipv4Addr) -> Self {
        self.manual_addr = Some(addr);
        self
    }

    /// Runs the discovery strategy end to end: cached bridge, then mDNS,
    /// then `discovery.meethue.com`, then the manual address, in that
    /// order. The first method that yields at least one streaming-capable
    /// bridge short-circuits the rest (§4.3). Returns every bridge found by
    /// that method, keyed by name.
    pub async fn discover(&self) -> Result<HashMap<String, Bridge>, HueError> {
        if let Some(bridge) = self.discover_cached() {
            if bridge.supports_streaming() {
                log::info!("discovery: using cached bridge '{}'", bridge.name());
                let mut found = HashMap::new();
                found.insert(bridge.name().to_string(), bridge);
                return Ok(found);
            }
        }

        #[cfg(feature = "mdns")]
        {
            match self.discover_mdns().await {
                Ok(addrs) if !addrs.is_empty() => {
                    let found = self.onboard_all(addrs).await;
                    if !found.is_empty() {
                        return Ok(found);
                    }
                }
                Ok(_) => log::debug!("discovery: mdns browse returned no services"),
                Err(e) => log::warn!("discovery: mdns browse failed: {e}"),
            }
        }

        match self.discover_cloud().await {
            Ok(addrs) if !addrs.is_empty() => {
                let found = self.onboard_all(addrs).await;
                if !found.is_empty() {
                    return Ok(found);
                }
            }
            Ok(_) => log::debug!("discovery: cloud endpoint listed no bridges"),
            Err(e) => log::warn!("discovery: cloud discovery failed: {e}"),
        }

        if let Some(addr) = self.manual_addr {
            let found = self.onboard_all(vec![addr]).await;
            if !found.is_empty() {
                return Ok(found);
            }
        }

        Err(HueError::Discovery(DiscoveryError::NoBridgesFound))
    }

    fn discover_cached(&self) -> Option<Bridge> {
        let record = persistence::read_json::<BridgeRecord>(&self.bridge_cache_path).ok()?;
        Bridge::from_record(record).ok()
    }

    async fn onboard_all(&self, addrs: Vec<Ipv4Addr>) -> HashMap<String, Bridge> {
        let mut found = HashMap::new();
        for addr in addrs {
            match self.onboard(addr).await {
                Ok(bridge) if bridge.supports_streaming() => {
                    found.insert(bridge.name().to_string(), bridge);
                }
                Ok(bridge) => log::warn!(
                    "discovery: bridge '{}' at {} does not support streaming (swversion {})",
                    bridge.name(),
                    addr,
                    bridge.swversion()
                ),
                Err(e) => log::warn!("discovery: onboarding {addr} failed: {e}"),
            }
        }
        found
    }

    /// Browses `_hue._tcp.local` for up to `mdns_timeout`, stopping as soon
    /// as the first announcement carrying an `A` record arrives (§4.3 step
    /// c, C3).
    #[cfg(feature = "mdns")]
    async fn discover_mdns(&self) -> Result<Vec<Ipv4Addr>, HueError> {
        use futures_util::{pin_mut, StreamExt};

        const SERVICE_NAME: &str = "_hue._tcp.local";

        let stream = mdns::discover::all(SERVICE_NAME, self.mdns_timeout)
            .map_err(|e| HueError::Transport(format!("mdns: {e}")))?
            .listen();
        pin_mut!(stream);

        let mut addrs = Vec::new();
        let _ = tokio::time::timeout(self.mdns_timeout, async {
            while let Some(response) = stream.next().await {
                match response {
                    Ok(response) => {
                        for record in response.answers {
                            if let mdns::RecordKind::A(addr) = record.kind {
                                if is_valid_ipv4(&addr.to_string()) {
                                    addrs.push(addr);
                                }
                            }
                        }
                        if !addrs.is_empty() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("mdns: {e}"),
                }
            }
        })
        .await;
        Ok(addrs)
    }

    /// Queries `https://discovery.meethue.com/`, the N-UPnP fallback for
    /// networks that block mDNS (§4.3 step d, C4).
    async fn discover_cloud(&self) -> Result<Vec<Ipv4Addr>, HueError> {
        #[derive(Deserialize)]
        struct CloudEntry {
            internalipaddress: Ipv4Addr,
        }
        let http = reqwest::Client::builder()
            .timeout(config::HTTP_TIMEOUT)
            .build()?;
        let entries: Vec<CloudEntry> = http
            .get("https://discovery.meethue.com/")
            .send()
            .await?
            .json()
            .await?;
        Ok(entries.into_iter().map(|e| e.internalipaddress).collect())
    }

    /// Registers the application if no credentials are cached yet,
    /// returning the persisted credentials verbatim (without a network
    /// call) when they already are. Distinguishes `LinkButtonNotPressed` so
    /// callers can prompt and retry (§4.3 step b, §8 "Auth caching").
    pub async fn register_app(&self, client: &BridgeClient) -> Result<AuthRecord, HueError> {
        match persistence::read_json::<AuthRecord>(&self.auth_path) {
            Ok(auth) => Ok(auth),
            Err(HueError::Persistence(PersistenceError::NotFound(_))) => {
                log::info!("registering application '{}' with bridge", self.app_name);
                let auth = client.register(&self.app_name).await?;
                persistence::write_json(&self.auth_path, &auth)?;
                Ok(auth)
            }
            Err(e) => Err(e),
        }
    }

    /// Completes onboarding (§4.3 steps a-f) against a single candidate
    /// address: register (or reuse cached credentials), then fetch the
    /// bridge's identity, name, firmware version and application id, and
    /// cache the result.
    async fn onboard(&self, addr: Ipv4Addr) -> Result<Bridge, HueError> {
        let bootstrap = BridgeClient::new(IpAddr::V4(addr), None);
        let auth = self.register_app(&bootstrap).await?;

        let client = BridgeClient::new(IpAddr::V4(addr), Some(auth.username.clone()));
        let (id, rid) = client.bridge_identity().await?;
        let name = client.device_name(&rid).await?;
        let swversion = client.swversion().await?;
        let hue_application_id = client.application_id().await?;

        let bridge = Bridge::new(BridgeData {
            id,
            rid,
            ip_address: addr,
            swversion,
            username: auth.username,
            hue_application_id,
            client_key: auth.clientkey,
            name,
        });

        persistence::write_json(&self.bridge_cache_path, &bridge.to_record())?;
        Ok(bridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(!is_valid_ipv4("256.0.0.1"));
        assert!(!is_valid_ipv4("1.2.3.999"));
    }

    #[test]
    fn rejects_leading_zeros() {
        assert!(!is_valid_ipv4("01.0.0.1"));
        assert!(!is_valid_ipv4("192.168.001.1"));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(!is_valid_ipv4("1.2.3"));
        assert!(!is_valid_ipv4("1.2.3.4.5"));
        assert!(!is_valid_ipv4("a.b.c.d"));
        assert!(!is_valid_ipv4(""));
    }

    #[test]
    fn app_name_validation_rejects_missing_hash() {
        assert!(BridgeBuilder::new("no_hash_here").is_err());
    }

    #[test]
    fn app_name_validation_accepts_two_part_name() {
        assert!(BridgeBuilder::new("my_app#my_instance").is_ok());
    }
}
