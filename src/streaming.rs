//! The streaming engine (C8): HueStream v2 wire framing, the session
//! lifecycle state machine, the keep-alive and input-drain workers, and the
//! reconnect policy that absorbs transport failures while a session is
//! active (§4.7).

use crate::{
    api,
    color::LightColor,
    command::EntertainmentAction,
    config::StreamingConfig,
    error::{ConfigError, HueError},
    service::{Bridge, EntertainmentConfigurationData},
    transport::{Connector, DtlsConnector, StreamTransport},
};
use std::{
    net::IpAddr,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex as StdMutex,
    },
    time::Duration,
};
use tokio::{
    sync::{mpsc, Mutex as AsyncMutex},
    task::JoinHandle,
};

/// Which of the two semantic color spaces the session is currently
/// encoding datagrams in. Read at send time (not latched into the frame
/// when it's enqueued), so a mid-stream switch takes effect on the very
/// next datagram — keep-alive or data (§8 scenario 6).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorSpace {
    Rgb,
    Xyb,
}

impl ColorSpace {
    fn byte(self) -> u8 {
        match self {
            ColorSpace::Rgb => 0x00,
            ColorSpace::Xyb => 0x01,
        }
    }
}

/// `Idle -> HandshakeInProgress -> Active -> Stopping -> Idle` (§4.7.2).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    HandshakeInProgress,
    Active,
    Stopping,
}

/// One `{channel_id, color}` entry in a frame submitted to [`StreamingSession::set_colors`].
#[derive(Clone, Copy, Debug)]
pub struct ChannelColor {
    pub channel_id: u8,
    pub color: LightColor,
}

/// Serializes a HueStream v2 datagram (§4.7.1): a fixed 52-byte header
/// naming `entertainment_id` and `color_space`, followed by one 7-byte
/// record per channel in `channels`, in submission order.
fn build_datagram(
    entertainment_id: &str,
    color_space: ColorSpace,
    channels: &[ChannelColor],
) -> Result<Vec<u8>, HueError> {
    if entertainment_id.len() != 36 {
        return Err(HueError::InvalidConfig(ConfigError::UnknownConfig(format!(
            "entertainment id '{entertainment_id}' is not a 36-byte UUID"
        ))));
    }

    let mut buf = Vec::with_capacity(52 + 7 * channels.len());
    buf.extend_from_slice(b"HueStream");
    buf.push(0x02); // version_major
    buf.push(0x00); // version_minor
    buf.push(0x07); // sequence_id; fixed, ignored by the bridge
    buf.extend_from_slice(&[0x00, 0x00]); // reserved
    buf.push(color_space.byte());
    buf.push(0x00); // reserved
    buf.extend_from_slice(entertainment_id.as_bytes());

    for channel in channels {
        let (v0, v1, v2) = channel.color.to_rgb16()?;
        buf.push(channel.channel_id);
        buf.extend_from_slice(&v0.to_be_bytes());
        buf.extend_from_slice(&v1.to_be_bytes());
        buf.extend_from_slice(&v2.to_be_bytes());
    }
    Ok(buf)
}

/// State shared between the session handle and its two spawned workers.
struct SharedState {
    transport: AsyncMutex<Option<Arc<dyn StreamTransport>>>,
    last_sent_datagram: StdMutex<Vec<u8>>,
    color_space: StdMutex<ColorSpace>,
    state: StdMutex<SessionState>,
    shutdown: AtomicBool,
    reconnect_attempts: AtomicU32,
    reconnect_exhausted: AtomicBool,
    reconnect_lock: AsyncMutex<()>,
    connector: Arc<dyn Connector>,
    entertainment_id: String,
    client: api::BridgeClient,
    keep_alive_interval: Duration,
    input_drain_poll: Duration,
    reconnect_max_attempts: u32,
}

/// Drives one Entertainment Configuration's streaming lifecycle against one
/// bridge: `start` → repeated `set_colors` → `stop` (§4.7.2).
pub struct StreamingSession {
    shared: Arc<SharedState>,
    input_tx: mpsc::UnboundedSender<Vec<ChannelColor>>,
    input_rx: Option<mpsc::UnboundedReceiver<Vec<ChannelColor>>>,
    keep_alive_handle: Option<JoinHandle<()>>,
    input_drain_handle: Option<JoinHandle<()>>,
    worker_join_timeout: Duration,
}

impl StreamingSession {
    pub fn new(
        bridge: &Bridge,
        config_data: EntertainmentConfigurationData,
        config: StreamingConfig,
    ) -> Result<Self, HueError> {
        let psk = bridge.psk()?;
        let (input_tx, input_rx) = mpsc::unbounded_channel();

        let connector = Arc::new(DtlsConnector {
            addr: IpAddr::V4(bridge.ip_address()),
            port: config.dtls_port,
            identity: bridge.data().hue_application_id.clone().into_bytes(),
            psk,
            retransmit_timeout: config.handshake_retransmit_timeout,
            max_retries: config.handshake_max_retries,
        });

        let shared = Arc::new(SharedState {
            transport: AsyncMutex::new(None),
            last_sent_datagram: StdMutex::new(Vec::new()),
            color_space: StdMutex::new(ColorSpace::Rgb),
            state: StdMutex::new(SessionState::Idle),
            shutdown: AtomicBool::new(false),
            reconnect_attempts: AtomicU32::new(0),
            reconnect_exhausted: AtomicBool::new(false),
            reconnect_lock: AsyncMutex::new(()),
            connector,
            entertainment_id: config_data.id,
            client: bridge.client(),
            keep_alive_interval: config.keep_alive_interval,
            input_drain_poll: config.input_drain_poll,
            reconnect_max_attempts: config.reconnect_max_attempts,
        });

        Ok(StreamingSession {
            shared,
            input_tx,
            input_rx: Some(input_rx),
            keep_alive_handle: None,
            input_drain_handle: None,
            worker_join_timeout: config.worker_join_timeout,
        })
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state.lock().unwrap()
    }

    pub fn is_streaming(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Whether the reconnect policy has exhausted its attempt cap. The
    /// session itself stays `Active` when this is true (see SPEC_FULL.md
    /// §9 Open Question 2); callers that want stricter behavior poll this
    /// latch and call `stop()` themselves.
    pub fn reconnect_exhausted(&self) -> bool {
        self.shared.reconnect_exhausted.load(Ordering::SeqCst)
    }

    pub fn set_color_space(&self, space: ColorSpace) {
        *self.shared.color_space.lock().unwrap() = space;
    }

    /// §4.7.2 `start()`: REST `action=start`, build and stash the zero
    /// datagram, run the DTLS handshake, then spawn the keep-alive and
    /// input-drain workers.
    pub async fn start(&mut self) -> Result<(), HueError> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if *state != SessionState::Idle {
                return Err(HueError::AlreadyStreaming);
            }
            *state = SessionState::HandshakeInProgress;
        }

        log::info!(
            "streaming: starting session for configuration {}",
            self.shared.entertainment_id
        );

        if let Err(e) = api::set_entertainment_action(
            &self.shared.client,
            &self.shared.entertainment_id,
            EntertainmentAction::Start,
        )
        .await
        {
            *self.shared.state.lock().unwrap() = SessionState::Idle;
            return Err(e);
        }

        let zero_channel = ChannelColor {
            channel_id: 0,
            color: LightColor::Rgb8(0, 0, 0),
        };
        let zero_datagram = build_datagram(
            &self.shared.entertainment_id,
            *self.shared.color_space.lock().unwrap(),
            std::slice::from_ref(&zero_channel),
        )?;
        *self.shared.last_sent_datagram.lock().unwrap() = zero_datagram;

        let transport = match self.shared.connector.connect().await {
            Ok(transport) => transport,
            Err(e) => {
                log::error!("streaming: handshake failed, stopping best-effort: {e}");
                let _ = api::set_entertainment_action(
                    &self.shared.client,
                    &self.shared.entertainment_id,
                    EntertainmentAction::Stop,
                )
                .await;
                *self.shared.state.lock().unwrap() = SessionState::Idle;
                return Err(e);
            }
        };
        *self.shared.transport.lock().await = Some(transport);

        self.shared.shutdown.store(false, Ordering::SeqCst);
        self.shared.reconnect_attempts.store(0, Ordering::SeqCst);
        self.shared.reconnect_exhausted.store(false, Ordering::SeqCst);
        *self.shared.state.lock().unwrap() = SessionState::Active;

        self.keep_alive_handle = Some(tokio::spawn(keep_alive_worker(self.shared.clone())));
        let rx = self
            .input_rx
            .take()
            .expect("input receiver consumed only once, by start()");
        self.input_drain_handle = Some(tokio::spawn(input_drain_worker(self.shared.clone(), rx)));

        log::info!("streaming: session active");
        Ok(())
    }

    /// §4.7.2 `set_colors()`: validates every color, then enqueues the
    /// whole frame as a single unit so the input-drain worker sends it in
    /// one datagram (§8 "Atomic frame delivery").
    pub async fn set_colors(&self, frame: &[ChannelColor]) -> Result<(), HueError> {
        if self.state() != SessionState::Active {
            return Err(HueError::NotStreaming);
        }
        if frame.is_empty() {
            return Err(HueError::InvalidColor(
                "a frame must contain at least one channel".to_string(),
            ));
        }
        for channel in frame {
            channel.color.to_rgb16()?;
        }
        self.input_tx
            .send(frame.to_vec())
            .map_err(|_| HueError::Transport("input-drain worker is gone".to_string()))
    }

    /// §4.7.2 `stop()`: join both workers, close the socket, THEN issue the
    /// REST stop best-effort — a join timeout does not skip it.
    pub async fn stop(&mut self) -> Result<(), HueError> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if *state != SessionState::Active {
                return Err(HueError::NotStreaming);
            }
            *state = SessionState::Stopping;
        }
        self.shared.shutdown.store(true, Ordering::SeqCst);

        if let Some(handle) = self.keep_alive_handle.take() {
            if tokio::time::timeout(self.worker_join_timeout, handle)
                .await
                .is_err()
            {
                log::warn!(
                    "streaming: keep-alive worker did not exit within {:?}",
                    self.worker_join_timeout
                );
            }
        }
        if let Some(handle) = self.input_drain_handle.take() {
            if tokio::time::timeout(self.worker_join_timeout, handle)
                .await
                .is_err()
            {
                log::warn!(
                    "streaming: input-drain worker did not exit within {:?}",
                    self.worker_join_timeout
                );
            }
        }

        if let Some(transport) = self.shared.transport.lock().await.take() {
            if let Err(e) = transport.close().await {
                log::warn!("streaming: error closing socket: {e}");
            }
        }

        if let Err(e) = api::set_entertainment_action(
            &self.shared.client,
            &self.shared.entertainment_id,
            EntertainmentAction::Stop,
        )
        .await
        {
            log::warn!("streaming: REST stop failed: {e}");
        }

        *self.shared.state.lock().unwrap() = SessionState::Idle;
        log::info!("streaming: session stopped");
        Ok(())
    }
}

async fn keep_alive_worker(shared: Arc<SharedState>) {
    let mut interval = tokio::time::interval(shared.keep_alive_interval);
    interval.tick().await; // first tick fires immediately
    loop {
        interval.tick().await;
        if shared.shutdown.load(Ordering::SeqCst) {
            break;
        }
        let datagram = shared.last_sent_datagram.lock().unwrap().clone();
        if let Err(e) = send_with_reconnect(&shared, &datagram).await {
            log::error!("streaming: keep-alive send failed: {e}");
        }
    }
    log::debug!("streaming: keep-alive worker exiting");
}

async fn input_drain_worker(
    shared: Arc<SharedState>,
    mut rx: mpsc::UnboundedReceiver<Vec<ChannelColor>>,
) {
    loop {
        match tokio::time::timeout(shared.input_drain_poll, rx.recv()).await {
            Ok(Some(frame)) => {
                let color_space = *shared.color_space.lock().unwrap();
                match build_datagram(&shared.entertainment_id, color_space, &frame) {
                    Ok(datagram) => {
                        if send_with_reconnect(&shared, &datagram).await.is_ok() {
                            *shared.last_sent_datagram.lock().unwrap() = datagram;
                        }
                    }
                    Err(e) => log::error!("streaming: failed to build datagram: {e}"),
                }
            }
            Ok(None) => break,
            Err(_) => {} // 1 s poll elapsed; recheck the shutdown flag
        }
        if shared.shutdown.load(Ordering::SeqCst) {
            break;
        }
    }
    log::debug!("streaming: input-drain worker exiting");
}

/// Sends one datagram over the shared DTLS socket, serialized with respect
/// to the other worker (§5). A failed send triggers the reconnect policy
/// (§4.7.3); the failed frame itself is not retried.
async fn send_with_reconnect(shared: &Arc<SharedState>, datagram: &[u8]) -> Result<(), HueError> {
    let result = {
        let guard = shared.transport.lock().await;
        match guard.as_ref() {
            Some(transport) => transport.send(datagram).await,
            None => Err(HueError::Transport("no active transport".to_string())),
        }
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            log::warn!("streaming: send failed, triggering reconnect: {e}");
            reconnect(shared).await?;
            Err(e)
        }
    }
}

async fn reconnect(shared: &Arc<SharedState>) -> Result<(), HueError> {
    let _guard = shared.reconnect_lock.lock().await;

    if shared.reconnect_exhausted.load(Ordering::SeqCst) {
        return Err(HueError::Transport(
            "reconnect attempts already exhausted".to_string(),
        ));
    }

    if let Some(transport) = shared.transport.lock().await.take() {
        let _ = transport.close().await;
    }

    match shared.connector.connect().await {
        Ok(transport) => {
            *shared.transport.lock().await = Some(transport);
            shared.reconnect_attempts.store(0, Ordering::SeqCst);
            log::info!("streaming: reconnect succeeded");
            Ok(())
        }
        Err(e) => {
            let attempts = shared.reconnect_attempts.fetch_add(1, Ordering::SeqCst) + 1;
            log::warn!(
                "streaming: reconnect attempt {attempts}/{} failed: {e}",
                shared.reconnect_max_attempts
            );
            if attempts >= shared.reconnect_max_attempts {
                shared.reconnect_exhausted.store(true, Ordering::SeqCst);
                log::error!(
                    "streaming: reconnect attempts exhausted, frames will be dropped until stop()"
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_ID: &str = "2022ffc4-1b73-4a43-b376-4c45369bf207";

    #[test]
    fn single_channel_xyb_frame_matches_wire_layout() {
        let datagram = build_datagram(
            CONFIG_ID,
            ColorSpace::Xyb,
            &[ChannelColor {
                channel_id: 0,
                color: LightColor::Xyb(0.0, 0.0, 0.0),
            }],
        )
        .unwrap();

        assert_eq!(datagram.len(), 59);
        assert_eq!(&datagram[0..9], b"HueStream");
        assert_eq!(datagram[9], 0x02);
        assert_eq!(datagram[14], 0x01);
        assert_eq!(&datagram[16..52], CONFIG_ID.as_bytes());
        assert_eq!(&datagram[52..59], &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn multi_channel_frame_preserves_submission_order() {
        let channels = [
            ChannelColor {
                channel_id: 2,
                color: LightColor::Rgb8(255, 0, 0),
            },
            ChannelColor {
                channel_id: 5,
                color: LightColor::Rgb8(0, 255, 0),
            },
            ChannelColor {
                channel_id: 1,
                color: LightColor::Rgb8(0, 0, 255),
            },
        ];
        let datagram = build_datagram(CONFIG_ID, ColorSpace::Rgb, &channels).unwrap();

        assert_eq!(datagram.len(), 52 + 7 * 3);
        assert_eq!(datagram[52], 2);
        assert_eq!(datagram[59], 5);
        assert_eq!(datagram[66], 1);
    }

    #[test]
    fn warm_start_single_channel_matches_scenario() {
        let datagram = build_datagram(
            CONFIG_ID,
            ColorSpace::Xyb,
            &[ChannelColor {
                channel_id: 1,
                color: LightColor::Xyb(0.63435, 0.0, 1.0),
            }],
        )
        .unwrap();

        assert_eq!(&datagram[52..59], &[0x01, 0xA2, 0x6B, 0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn rejects_malformed_entertainment_id() {
        let err = build_datagram(
            "not-a-uuid",
            ColorSpace::Rgb,
            &[ChannelColor {
                channel_id: 0,
                color: LightColor::Rgb8(0, 0, 0),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, HueError::InvalidConfig(ConfigError::UnknownConfig(_))));
    }

    /// A [`StreamTransport`] that records every datagram it's handed and
    /// can be told to fail its next N sends, standing in for a live DTLS
    /// socket (§4.11 "Test support").
    struct FakeTransport {
        sent: StdMutex<Vec<Vec<u8>>>,
        fail_next: AtomicU32,
    }

    impl FakeTransport {
        fn new() -> Arc<Self> {
            Arc::new(FakeTransport {
                sent: StdMutex::new(Vec::new()),
                fail_next: AtomicU32::new(0),
            })
        }

        fn fail_next_n(&self, n: u32) {
            self.fail_next.store(n, Ordering::SeqCst);
        }

        fn sent_datagrams(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl StreamTransport for FakeTransport {
        async fn send(&self, datagram: &[u8]) -> Result<(), HueError> {
            if self.fail_next.load(Ordering::SeqCst) > 0 {
                self.fail_next.fetch_sub(1, Ordering::SeqCst);
                return Err(HueError::Transport("fake send failure".to_string()));
            }
            self.sent.lock().unwrap().push(datagram.to_vec());
            Ok(())
        }

        async fn close(&self) -> Result<(), HueError> {
            Ok(())
        }
    }

    /// A [`Connector`] that either succeeds immediately or fails its first
    /// `N` calls before succeeding, standing in for a live DTLS handshake.
    struct FakeConnector {
        remaining_failures: AtomicU32,
        connects: AtomicU32,
    }

    impl FakeConnector {
        fn succeeds() -> Arc<Self> {
            Self::fails_n_times(0)
        }

        fn fails_n_times(n: u32) -> Arc<Self> {
            Arc::new(FakeConnector {
                remaining_failures: AtomicU32::new(n),
                connects: AtomicU32::new(0),
            })
        }

        fn connect_count(&self) -> u32 {
            self.connects.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self) -> Result<Arc<dyn StreamTransport>, HueError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.remaining_failures.load(Ordering::SeqCst) > 0 {
                self.remaining_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(HueError::DtlsHandshake("fake handshake failure".to_string()));
            }
            Ok(FakeTransport::new())
        }
    }

    /// Builds a [`StreamingSession`] wired to a fake connector instead of a
    /// live bridge, so the state machine and reconnect policy can be
    /// exercised without any network I/O. The guard clauses in `start()`,
    /// `stop()` and `set_colors()` all run before their respective REST
    /// calls, so tests that only exercise those guards never touch the
    /// dummy `BridgeClient` either.
    fn test_session(connector: Arc<dyn Connector>) -> StreamingSession {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SharedState {
            transport: AsyncMutex::new(None),
            last_sent_datagram: StdMutex::new(Vec::new()),
            color_space: StdMutex::new(ColorSpace::Rgb),
            state: StdMutex::new(SessionState::Idle),
            shutdown: AtomicBool::new(false),
            reconnect_attempts: AtomicU32::new(0),
            reconnect_exhausted: AtomicBool::new(false),
            reconnect_lock: AsyncMutex::new(()),
            connector,
            entertainment_id: CONFIG_ID.to_string(),
            client: crate::api::BridgeClient::new(
                "127.0.0.1".parse::<std::net::Ipv4Addr>().unwrap(),
                None,
            ),
            keep_alive_interval: Duration::from_millis(9_500),
            input_drain_poll: Duration::from_secs(1),
            reconnect_max_attempts: 3,
        });
        StreamingSession {
            shared,
            input_tx,
            input_rx: Some(input_rx),
            keep_alive_handle: None,
            input_drain_handle: None,
            worker_join_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn session_starts_idle() {
        let session = test_session(FakeConnector::succeeds());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_streaming());
    }

    #[tokio::test]
    async fn start_on_active_session_returns_already_streaming() {
        let mut session = test_session(FakeConnector::succeeds());
        *session.shared.state.lock().unwrap() = SessionState::Active;
        let err = session.start().await.unwrap_err();
        assert!(matches!(err, HueError::AlreadyStreaming));
    }

    #[tokio::test]
    async fn stop_on_idle_session_returns_not_streaming() {
        let mut session = test_session(FakeConnector::succeeds());
        let err = session.stop().await.unwrap_err();
        assert!(matches!(err, HueError::NotStreaming));
    }

    #[tokio::test]
    async fn set_colors_before_start_returns_not_streaming() {
        let session = test_session(FakeConnector::succeeds());
        let err = session
            .set_colors(&[ChannelColor {
                channel_id: 0,
                color: LightColor::Rgb8(0, 0, 0),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, HueError::NotStreaming));
    }

    #[tokio::test]
    async fn set_colors_rejects_empty_frame() {
        let session = test_session(FakeConnector::succeeds());
        *session.shared.state.lock().unwrap() = SessionState::Active;
        let err = session.set_colors(&[]).await.unwrap_err();
        assert!(matches!(err, HueError::InvalidColor(_)));
    }

    #[tokio::test]
    async fn set_colors_rejects_out_of_range_color_without_enqueueing() {
        let session = test_session(FakeConnector::succeeds());
        *session.shared.state.lock().unwrap() = SessionState::Active;
        let err = session
            .set_colors(&[ChannelColor {
                channel_id: 0,
                color: LightColor::Xyb(2.0, 0.0, 0.0),
            }])
            .await
            .unwrap_err();
        assert!(matches!(err, HueError::InvalidColor(_)));
    }

    #[tokio::test]
    async fn reconnect_success_resets_attempt_counter() {
        let session = test_session(FakeConnector::succeeds());
        session.shared.reconnect_attempts.store(2, Ordering::SeqCst);
        reconnect(&session.shared).await.unwrap();
        assert_eq!(session.shared.reconnect_attempts.load(Ordering::SeqCst), 0);
        assert!(!session.shared.reconnect_exhausted.load(Ordering::SeqCst));
        assert!(session.shared.transport.lock().await.is_some());
    }

    #[tokio::test]
    async fn reconnect_cap_stops_after_max_attempts() {
        let connector = FakeConnector::fails_n_times(10);
        let session = test_session(connector.clone());

        for _ in 0..3 {
            let _ = reconnect(&session.shared).await;
        }
        assert!(session.shared.reconnect_exhausted.load(Ordering::SeqCst));
        assert_eq!(session.shared.reconnect_attempts.load(Ordering::SeqCst), 3);

        // Further reconnects are refused outright and don't touch the connector again.
        let err = reconnect(&session.shared).await.unwrap_err();
        assert!(matches!(err, HueError::Transport(_)));
        assert_eq!(connector.connect_count(), 3);
    }

    #[tokio::test]
    async fn failed_send_triggers_reconnect_and_replaces_transport() {
        let session = test_session(FakeConnector::succeeds());
        let fake = FakeTransport::new();
        fake.fail_next_n(1);
        *session.shared.transport.lock().await = Some(fake.clone());

        let result = send_with_reconnect(&session.shared, b"datagram").await;
        assert!(result.is_err());
        assert_eq!(fake.sent_datagrams().len(), 0);
        assert!(session.shared.transport.lock().await.is_some());
        assert_eq!(session.shared.reconnect_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_send_records_datagram() {
        let session = test_session(FakeConnector::succeeds());
        let fake = FakeTransport::new();
        *session.shared.transport.lock().await = Some(fake.clone());

        send_with_reconnect(&session.shared, b"datagram").await.unwrap();
        assert_eq!(fake.sent_datagrams(), vec![b"datagram".to_vec()]);
    }
}
