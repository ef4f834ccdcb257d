use std::time::Duration;

/// Minimum bridge software version (`api/config` `swversion`) that supports
/// Entertainment streaming.
pub const MIN_SWVERSION: u64 = 1_948_086_000;

/// UDP port the bridge listens on for the DTLS Entertainment stream.
pub const DTLS_PORT: u16 = 2100;

/// Cipher suite the bridge's Entertainment API accepts on current firmware.
/// Older documentation lists `AES-256-GCM-SHA384`, but modern bridges only
/// negotiate the 128-bit suite (see REDESIGN FLAGS open question 1).
pub const DTLS_CIPHER_SUITE_NAME: &str = "TLS_PSK_WITH_AES_128_GCM_SHA256";

/// Interval between keep-alive retransmissions of the last sent datagram.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_millis(9_500);

/// Timeout the input-drain worker blocks on before re-checking the shutdown
/// flag.
pub const INPUT_DRAIN_POLL: Duration = Duration::from_secs(1);

/// Timeout applied when joining a worker task during `stop()`.
pub const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to wait for handshake progress before retransmitting the
/// outbound flight.
pub const HANDSHAKE_RETRANSMIT_TIMEOUT: Duration = Duration::from_millis(300);

/// Maximum number of handshake retransmissions before giving up.
pub const HANDSHAKE_MAX_RETRIES: u32 = 3;

/// Maximum number of consecutive reconnect attempts before the session gives
/// up reconnecting (frames are subsequently dropped rather than retried).
pub const RECONNECT_MAX_ATTEMPTS: u32 = 3;

/// Default timeout for bridge HTTP requests.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for mDNS discovery.
pub const MDNS_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default on-disk locations for persisted auth/bridge records.
pub const DEFAULT_AUTH_PATH: &str = "./data/auth.json";
pub const DEFAULT_BRIDGE_CACHE_PATH: &str = "./data/bridge.json";

/// `devicetype` values sent to `POST /api` must look like `"<id1>#<id2>"`.
pub fn app_name_pattern() -> &'static regex::Regex {
    use std::sync::OnceLock;
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"^[^#]+#[^#]+$").unwrap())
}

/// Caller-overridable knobs for a streaming session, with defaults matching
/// the values named throughout this crate's design.
#[derive(Clone, Debug)]
pub struct StreamingConfig {
    pub keep_alive_interval: Duration,
    pub input_drain_poll: Duration,
    pub worker_join_timeout: Duration,
    pub handshake_retransmit_timeout: Duration,
    pub handshake_max_retries: u32,
    pub reconnect_max_attempts: u32,
    pub dtls_port: u16,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            keep_alive_interval: KEEP_ALIVE_INTERVAL,
            input_drain_poll: INPUT_DRAIN_POLL,
            worker_join_timeout: WORKER_JOIN_TIMEOUT,
            handshake_retransmit_timeout: HANDSHAKE_RETRANSMIT_TIMEOUT,
            handshake_max_retries: HANDSHAKE_MAX_RETRIES,
            reconnect_max_attempts: RECONNECT_MAX_ATTEMPTS,
            dtls_port: DTLS_PORT,
        }
    }
}
