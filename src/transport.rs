//! The DTLS 1.2 PSK transport (C7) the streaming engine sends datagrams
//! over: a UDP socket bound to the bridge's Entertainment port, secured
//! with the one cipher suite current bridge firmware accepts.
//!
//! The wire connection and the "how do I get a connection" step are split
//! into two traits ([`StreamTransport`], [`Connector`]) so the streaming
//! engine's reconnect policy and state machine can be exercised in tests
//! against a fake transport rather than a live UDP socket (§4.11 "Test
//! support"). This mirrors the `Writeable`/`Closeable` trait split used
//! for the same reason in `examples/MarcelLieb-MusicSync`.

use crate::error::HueError;
use async_trait::async_trait;
use std::{net::IpAddr, sync::Arc, time::Duration};
use tokio::net::UdpSocket;
use webrtc_dtls::{
    cipher_suite::CipherSuiteId,
    config::{Config, ExtendedMasterSecretType},
    conn::DTLSConn,
};
use webrtc_util::conn::Conn;

/// An open datagram connection capable of sending HueStream frames and
/// closing itself. Implemented by [`DtlsTransport`] for production use and
/// by a fake in `streaming.rs`'s test module for deterministic reconnect
/// and state-machine tests.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    async fn send(&self, datagram: &[u8]) -> Result<(), HueError>;
    async fn close(&self) -> Result<(), HueError>;
}

/// Produces a new, already-handshaken [`StreamTransport`] on demand. The
/// streaming engine calls this once in `start()` and again on every
/// reconnect attempt; it never talks to `DtlsTransport::connect` directly,
/// so a test can substitute a [`Connector`] that fails on command instead
/// of a live bridge.
#[async_trait]
pub(crate) trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StreamTransport>, HueError>;
}

/// A DTLS-PSK connection to a bridge's Entertainment streaming port.
///
/// `webrtc-dtls` does not expose a per-flight retransmission hook, so the
/// retry policy described in §4.6/§9 is realized one level up: a failed or
/// timed-out handshake attempt is retried as a whole new handshake against
/// a fresh socket, each attempt racing `retransmit_timeout`.
pub struct DtlsTransport {
    conn: Arc<dyn Conn + Send + Sync>,
}

impl DtlsTransport {
    /// Connects to `(addr, port)` and completes a DTLS-PSK handshake, using
    /// `identity` (the bridge's `hue_application_id`) as the PSK identity
    /// hint and `psk` (the decoded `client_key`) as the shared key.
    pub async fn connect(
        addr: IpAddr,
        port: u16,
        identity: Vec<u8>,
        psk: Vec<u8>,
        retransmit_timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, HueError> {
        let mut last_err = None;
        for attempt in 1..=max_retries.max(1) {
            match tokio::time::timeout(
                retransmit_timeout,
                Self::handshake(addr, port, identity.clone(), psk.clone()),
            )
            .await
            {
                Ok(Ok(conn)) => return Ok(DtlsTransport { conn }),
                Ok(Err(e)) => {
                    log::warn!("dtls handshake attempt {attempt}/{max_retries} failed: {e}");
                    last_err = Some(e);
                }
                Err(_) => {
                    log::warn!(
                        "dtls handshake attempt {attempt}/{max_retries} timed out after {retransmit_timeout:?}"
                    );
                    last_err = Some(HueError::DtlsHandshake("handshake timed out".to_string()));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| HueError::DtlsHandshake("exhausted retries".to_string())))
    }

    async fn handshake(
        addr: IpAddr,
        port: u16,
        identity: Vec<u8>,
        psk: Vec<u8>,
    ) -> Result<Arc<dyn Conn + Send + Sync>, HueError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| HueError::Transport(e.to_string()))?;
        socket
            .connect((addr, port))
            .await
            .map_err(|e| HueError::Transport(e.to_string()))?;
        let socket = Arc::new(socket);

        let config = Config {
            psk: Some(Arc::new(move |_hint: &[u8]| Ok(psk.clone()))),
            psk_identity_hint: Some(identity),
            cipher_suites: vec![CipherSuiteId::Tls_Psk_With_Aes_128_Gcm_Sha256],
            extended_master_secret: ExtendedMasterSecretType::Require,
            ..Default::default()
        };

        let conn = DTLSConn::new(socket, config, true, None)
            .await
            .map_err(|e| HueError::DtlsHandshake(e.to_string()))?;
        Ok(Arc::new(conn))
    }
}

#[async_trait]
impl StreamTransport for DtlsTransport {
    /// Sends one datagram. Failures here are `Transport` errors, absorbed
    /// by the streaming engine's reconnect policy (§4.7.2, §7).
    async fn send(&self, datagram: &[u8]) -> Result<(), HueError> {
        self.conn
            .send(datagram)
            .await
            .map_err(|e| HueError::Transport(e.to_string()))?;
        Ok(())
    }

    /// Closes the underlying connection. Idempotent from the caller's
    /// perspective: `stop()` always calls this once and ignores a second
    /// close (§4.7.2).
    async fn close(&self) -> Result<(), HueError> {
        self.conn
            .close()
            .await
            .map_err(|e| HueError::Transport(e.to_string()))
    }
}

/// Production [`Connector`]: opens a fresh DTLS-PSK handshake against one
/// fixed bridge address every time it's asked.
pub(crate) struct DtlsConnector {
    pub addr: IpAddr,
    pub port: u16,
    pub identity: Vec<u8>,
    pub psk: Vec<u8>,
    pub retransmit_timeout: Duration,
    pub max_retries: u32,
}

#[async_trait]
impl Connector for DtlsConnector {
    async fn connect(&self) -> Result<Arc<dyn StreamTransport>, HueError> {
        let transport = DtlsTransport::connect(
            self.addr,
            self.port,
            self.identity.clone(),
            self.psk.clone(),
            self.retransmit_timeout,
            self.max_retries,
        )
        .await?;
        Ok(Arc::new(transport))
    }
}
