//! The REST surface this crate actually needs: a thin HTTP client (C2) that
//! injects the bridge's self-signed-cert exception and the
//! `hue-application-key` header, plus the handful of `/clip/v2/resource/*`
//! and legacy `/api` operations the bootstrap and entertainment flows call
//! (C5, C6). Endpoints are an explicit enum rather than a decorator/string
//! template, so the URL-building surface is exhaustively matched (see
//! SPEC_FULL.md REDESIGN FLAGS).

pub mod v1;

use crate::error::{HueError, RegistrationError};
use crate::persistence::AuthRecord;
use crate::service::entertainment::{EntertainmentConfigurationData, EntertainmentData};
use crate::service::light::LightData;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// A `/clip/v2` response envelope: a list of non-fatal errors alongside the
/// actual payload.
#[derive(Debug, Deserialize)]
pub struct HueApiV2Response<D> {
    #[serde(default)]
    pub errors: Vec<HueApiV2Error>,
    #[serde(default)]
    pub data: D,
}

#[derive(Debug, Deserialize)]
pub struct HueApiV2Error {
    pub description: String,
}

enum Endpoint<'a> {
    Register,
    Config,
    AuthV1,
    Bridge,
    Device(&'a str),
    EntertainmentConfigurations,
    EntertainmentConfiguration(&'a str),
    Entertainments,
    Lights,
}

impl Endpoint<'_> {
    fn path(&self) -> String {
        match self {
            Endpoint::Register => "/api".to_string(),
            Endpoint::Config => "/api/config".to_string(),
            Endpoint::AuthV1 => "/auth/v1".to_string(),
            Endpoint::Bridge => "/clip/v2/resource/bridge".to_string(),
            Endpoint::Device(rid) => format!("/clip/v2/resource/device/{rid}"),
            Endpoint::EntertainmentConfigurations => {
                "/clip/v2/resource/entertainment_configuration".to_string()
            }
            Endpoint::EntertainmentConfiguration(id) => {
                format!("/clip/v2/resource/entertainment_configuration/{id}")
            }
            Endpoint::Entertainments => "/clip/v2/resource/entertainment".to_string(),
            Endpoint::Lights => "/clip/v2/resource/light".to_string(),
        }
    }
}

/// HTTP client bound to a single bridge. Cloning is cheap: the underlying
/// `reqwest::Client` is internally reference-counted.
#[derive(Clone, Debug)]
pub struct BridgeClient {
    http: reqwest::Client,
    addr: IpAddr,
    username: Option<String>,
}

impl BridgeClient {
    pub fn new(addr: impl Into<IpAddr>, username: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(crate::config::HTTP_TIMEOUT)
            .build()
            .expect("building reqwest client");
        BridgeClient {
            http,
            addr: addr.into(),
            username,
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    fn base_url(&self) -> String {
        format!("https://{}", self.addr)
    }

    fn request(&self, method: reqwest::Method, endpoint: Endpoint) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url(), endpoint.path());
        let mut req = self
            .http
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(username) = &self.username {
            req = req.header("hue-application-key", username);
        }
        req
    }

    async fn get_v2<D: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<D, HueError> {
        let resp = self.request(reqwest::Method::GET, endpoint).send().await?;
        Self::check_status(&resp)?;
        let body: HueApiV2Response<D> = resp.json().await?;
        Ok(body.data)
    }

    fn check_status(resp: &reqwest::Response) -> Result<(), HueError> {
        let status = resp.status();
        if status.as_u16() == 400 {
            return Err(HueError::HttpBadRequest(
                status.canonical_reason().unwrap_or("bad request").to_string(),
            ));
        }
        if !status.is_success() {
            return Err(HueError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }
        Ok(())
    }

    /// `POST /api` with `{devicetype, generateclientkey: true}`. Returns
    /// `Err(BridgeRegistration(LinkButtonNotPressed))` when the bridge's
    /// link button has not been pressed yet, so callers can prompt and
    /// retry (§4.3 step b).
    pub async fn register(&self, app_name: &str) -> Result<AuthRecord, HueError> {
        if !crate::config::app_name_pattern().is_match(app_name) {
            return Err(HueError::HttpBadRequest(format!(
                "app_name '{app_name}' must match <id1>#<id2>"
            )));
        }

        let body = serde_json::json!({
            "devicetype": app_name,
            "generateclientkey": true,
        });
        let resp = self
            .request(reqwest::Method::POST, Endpoint::Register)
            .json(&body)
            .send()
            .await?;
        Self::check_status(&resp)?;

        let results: Vec<v1::RegisterResponse> = resp.json().await?;
        match results.into_iter().next() {
            Some(v1::RegisterResponse::Success { success }) => Ok(AuthRecord {
                username: success.username,
                clientkey: success.clientkey,
            }),
            Some(v1::RegisterResponse::Error { error }) => {
                if error.description.to_lowercase().contains("link button not pressed") {
                    Err(HueError::BridgeRegistration(
                        RegistrationError::LinkButtonNotPressed,
                    ))
                } else {
                    Err(HueError::BridgeRegistration(RegistrationError::Other(
                        error.description,
                    )))
                }
            }
            None => Err(HueError::BridgeRegistration(RegistrationError::Other(
                "empty response from bridge".to_string(),
            ))),
        }
    }

    /// `GET /api/config` → `swversion`.
    pub async fn swversion(&self) -> Result<u64, HueError> {
        #[derive(Deserialize)]
        struct Config {
            swversion: u64,
        }
        let resp = self
            .request(reqwest::Method::GET, Endpoint::Config)
            .send()
            .await?;
        Self::check_status(&resp)?;
        let config: Config = resp.json().await?;
        Ok(config.swversion)
    }

    /// `GET /auth/v1` → the `hue-application-id` response header.
    pub async fn application_id(&self) -> Result<String, HueError> {
        let resp = self
            .request(reqwest::Method::GET, Endpoint::AuthV1)
            .send()
            .await?;
        Self::check_status(&resp)?;
        resp.headers()
            .get("hue-application-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| HueError::Http {
                status: 200,
                reason: "missing hue-application-id header".to_string(),
            })
    }

    /// `GET /clip/v2/resource/bridge` → `(id, owner rid)` of the first (and
    /// only) bridge resource.
    pub async fn bridge_identity(&self) -> Result<(String, String), HueError> {
        #[derive(Deserialize)]
        struct Owner {
            rid: String,
        }
        #[derive(Deserialize)]
        struct BridgeResource {
            id: String,
            owner: Owner,
        }
        let resources: Vec<BridgeResource> = self.get_v2(Endpoint::Bridge).await?;
        let first = resources
            .into_iter()
            .next()
            .ok_or_else(|| HueError::Http {
                status: 200,
                reason: "bridge resource list was empty".to_string(),
            })?;
        Ok((first.id, first.owner.rid))
    }

    /// `GET /clip/v2/resource/device/{rid}` → `metadata.name`.
    pub async fn device_name(&self, rid: &str) -> Result<String, HueError> {
        #[derive(Deserialize)]
        struct Metadata {
            name: String,
        }
        #[derive(Deserialize)]
        struct DeviceResource {
            metadata: Metadata,
        }
        let resources: Vec<DeviceResource> = self.get_v2(Endpoint::Device(rid)).await?;
        let first = resources
            .into_iter()
            .next()
            .ok_or_else(|| HueError::Http {
                status: 200,
                reason: format!("device {rid} not found"),
            })?;
        Ok(first.metadata.name)
    }

    pub async fn list_entertainment_configurations(
        &self,
    ) -> Result<HashMap<String, EntertainmentConfigurationData>, HueError> {
        let data: Vec<EntertainmentConfigurationData> =
            self.get_v2(Endpoint::EntertainmentConfigurations).await?;
        Ok(data.into_iter().map(|d| (d.id.clone(), d)).collect())
    }

    pub async fn list_entertainments(&self) -> Result<HashMap<String, EntertainmentData>, HueError> {
        let data: Vec<EntertainmentData> = self.get_v2(Endpoint::Entertainments).await?;
        Ok(data.into_iter().map(|d| (d.id.clone(), d)).collect())
    }

    pub async fn list_lights(&self) -> Result<HashMap<String, LightData>, HueError> {
        let data: Vec<LightData> = self.get_v2(Endpoint::Lights).await?;
        Ok(data.into_iter().map(|d| (d.id.clone(), d)).collect())
    }

    /// `PUT /clip/v2/resource/entertainment_configuration/{id}` with a body
    /// that MUST NOT contain `id` (the server rejects it).
    pub async fn put_entertainment_configuration<S: Serialize>(
        &self,
        id: &str,
        body: &S,
    ) -> Result<(), HueError> {
        let resp = self
            .request(
                reqwest::Method::PUT,
                Endpoint::EntertainmentConfiguration(id),
            )
            .json(body)
            .send()
            .await?;
        Self::check_status(&resp)?;
        Ok(())
    }
}

/// Convenience wrapper matching §4.7.2's `{"action": "start"|"stop"}`
/// transitions, used by the streaming engine.
pub async fn set_entertainment_action(
    client: &BridgeClient,
    config_id: &str,
    action: crate::command::EntertainmentAction,
) -> Result<(), HueError> {
    let commands = [crate::command::EntertainmentConfigurationCommand::Action(action)];
    let body = crate::command::merge_commands(&commands);
    client.put_entertainment_configuration(config_id, &body).await
}
