use std::fmt;

/// Errors surfaced by every public operation in this crate.
///
/// Variants mirror the error kinds a caller needs to branch on: recoverable
/// registration states, transport failures that trigger reconnect, and state
/// violations that indicate a bug in the caller. Each carries enough context
/// to build a human-readable message without a caller needing to downcast.
#[derive(Debug)]
pub enum HueError {
    Persistence(PersistenceError),
    Http { status: u16, reason: String },
    HttpBadRequest(String),
    BridgeRegistration(RegistrationError),
    BridgeUnsupported { swversion: u64 },
    Discovery(DiscoveryError),
    InvalidConfig(ConfigError),
    InvalidColor(String),
    DtlsHandshake(String),
    Transport(String),
    AlreadyStreaming,
    NotStreaming,
}

#[derive(Debug)]
pub enum PersistenceError {
    NotFound(String),
    Parse(String),
    Io(String),
}

#[derive(Debug)]
pub enum RegistrationError {
    LinkButtonNotPressed,
    Other(String),
}

#[derive(Debug)]
pub enum DiscoveryError {
    NoBridgesFound,
}

#[derive(Debug)]
pub enum ConfigError {
    NoActiveConfiguration,
    UnknownBridge(String),
    UnknownConfig(String),
}

impl fmt::Display for HueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistence(PersistenceError::NotFound(path)) => {
                write!(f, "no persisted data at {path}")
            }
            Self::Persistence(PersistenceError::Parse(msg)) => {
                write!(f, "failed to parse persisted data: {msg}")
            }
            Self::Persistence(PersistenceError::Io(msg)) => {
                write!(f, "persistence I/O error: {msg}")
            }
            Self::Http { status, reason } => write!(f, "bridge returned {status}: {reason}"),
            Self::HttpBadRequest(reason) => write!(f, "bad request: {reason}"),
            Self::BridgeRegistration(RegistrationError::LinkButtonNotPressed) => {
                write!(f, "link button not pressed")
            }
            Self::BridgeRegistration(RegistrationError::Other(desc)) => {
                write!(f, "registration failed: {desc}")
            }
            Self::BridgeUnsupported { swversion } => {
                write!(f, "bridge software version {swversion} does not support streaming")
            }
            Self::Discovery(DiscoveryError::NoBridgesFound) => {
                write!(f, "no suitable bridges found")
            }
            Self::InvalidConfig(ConfigError::NoActiveConfiguration) => {
                write!(f, "no entertainment configuration is selected")
            }
            Self::InvalidConfig(ConfigError::UnknownBridge(name)) => {
                write!(f, "unknown bridge: {name}")
            }
            Self::InvalidConfig(ConfigError::UnknownConfig(name)) => {
                write!(f, "unknown entertainment configuration: {name}")
            }
            Self::InvalidColor(msg) => write!(f, "invalid color: {msg}"),
            Self::DtlsHandshake(cause) => write!(f, "DTLS handshake failed: {cause}"),
            Self::Transport(cause) => write!(f, "transport error: {cause}"),
            Self::AlreadyStreaming => write!(f, "streaming session is already active"),
            Self::NotStreaming => write!(f, "streaming session is not active"),
        }
    }
}

impl std::error::Error for HueError {}

impl From<std::io::Error> for HueError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            HueError::Persistence(PersistenceError::NotFound(e.to_string()))
        } else {
            HueError::Persistence(PersistenceError::Io(e.to_string()))
        }
    }
}

impl From<serde_json::Error> for HueError {
    fn from(e: serde_json::Error) -> Self {
        HueError::Persistence(PersistenceError::Parse(e.to_string()))
    }
}

impl From<reqwest::Error> for HueError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => HueError::Http {
                status: status.as_u16(),
                reason: e.to_string(),
            },
            None => HueError::Transport(e.to_string()),
        }
    }
}
