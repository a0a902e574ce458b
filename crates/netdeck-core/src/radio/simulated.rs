// ── Scripted radio capability ──
//
// Answers device requests from a queue of scripted responses. An empty
// queue behaves like the user closing the chooser.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{DeviceRequest, RadioAdapter, RadioError, RadioLink};

/// What `connect()` does on a simulated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectBehavior {
    Succeed,
    Fail(String),
    /// The first attempt fails with the message, later ones succeed.
    FailOnce(String),
    /// The link has no connect operation.
    Unavailable,
}

/// A device the simulated chooser can hand out.
#[derive(Debug, Clone)]
pub struct Advertisement {
    pub id: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
    pub connect: ConnectBehavior,
    pub connect_delay: Duration,
}

impl Advertisement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            rssi: None,
            connect: ConnectBehavior::Succeed,
            connect_delay: Duration::ZERO,
        }
    }

    /// An advertisement with a random identifier.
    pub fn random() -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.connect = ConnectBehavior::Fail(message.into());
        self
    }

    pub fn failing_once(mut self, message: impl Into<String>) -> Self {
        self.connect = ConnectBehavior::FailOnce(message.into());
        self
    }

    pub fn without_connect(mut self) -> Self {
        self.connect = ConnectBehavior::Unavailable;
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }
}

#[derive(Debug)]
enum Response {
    Device(Advertisement),
    Cancel,
    Fail(String),
}

/// Radio capability driven by a script instead of hardware.
#[derive(Debug)]
pub struct SimulatedRadio {
    supported: bool,
    script: Mutex<VecDeque<Response>>,
    requests: AtomicUsize,
}

impl SimulatedRadio {
    pub fn new() -> Self {
        Self {
            supported: true,
            script: Mutex::new(VecDeque::new()),
            requests: AtomicUsize::new(0),
        }
    }

    /// A radio that reports no platform support.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub async fn push_device(&self, advertisement: Advertisement) {
        self.script
            .lock()
            .await
            .push_back(Response::Device(advertisement));
    }

    pub async fn push_cancel(&self) {
        self.script.lock().await.push_back(Response::Cancel);
    }

    pub async fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Response::Fail(message.into()));
    }

    /// Number of device requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RadioAdapter for SimulatedRadio {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn request_device(
        &self,
        request: &DeviceRequest,
    ) -> Result<Arc<dyn RadioLink>, RadioError> {
        if !self.supported {
            return Err(RadioError::Unsupported);
        }
        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!(
            accept_all = request.accept_all_devices,
            services = ?request.optional_services,
            "simulated device chooser opened"
        );

        match self.script.lock().await.pop_front() {
            Some(Response::Device(advertisement)) => Ok(Arc::new(SimulatedLink::new(advertisement))),
            Some(Response::Fail(message)) => Err(RadioError::Failed { message }),
            Some(Response::Cancel) | None => Err(RadioError::Cancelled),
        }
    }
}

/// Link handed out by [`SimulatedRadio`].
#[derive(Debug)]
pub struct SimulatedLink {
    advertisement: Advertisement,
    connected: AtomicBool,
    attempts: AtomicUsize,
    disconnects: AtomicUsize,
}

impl SimulatedLink {
    pub fn new(advertisement: Advertisement) -> Self {
        Self {
            advertisement,
            connected: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        }
    }

    /// How many times `disconnect()` closed an open session.
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RadioLink for SimulatedLink {
    fn id(&self) -> &str {
        &self.advertisement.id
    }

    fn name(&self) -> Option<&str> {
        self.advertisement.name.as_deref()
    }

    fn rssi(&self) -> Option<i16> {
        self.advertisement.rssi
    }

    fn can_connect(&self) -> bool {
        self.advertisement.connect != ConnectBehavior::Unavailable
    }

    async fn connect(&self) -> Result<(), RadioError> {
        if !self.advertisement.connect_delay.is_zero() {
            tokio::time::sleep(self.advertisement.connect_delay).await;
        }
        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel);
        match &self.advertisement.connect {
            ConnectBehavior::Fail(message) => Err(RadioError::failed(message.clone())),
            ConnectBehavior::FailOnce(message) if attempt == 0 => {
                Err(RadioError::failed(message.clone()))
            }
            ConnectBehavior::Succeed | ConnectBehavior::FailOnce(_) => {
                self.connected.store(true, Ordering::Release);
                Ok(())
            }
            ConnectBehavior::Unavailable => Err(RadioError::failed("GATT server unavailable")),
        }
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            self.disconnects.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}
