//! Synchronized state shared between the main loop, the serial receive
//! loop, and the debug HTTP server.

use parking_lot::Mutex;

use autoaim_core::spatial::OdometryState;
use autoaim_core::time::{Duration, Local, Timestamp, TimestampedHistoryBuffer};
use autoaim_uart::messages::{RobotColor, RobotType};

const ODOMETRY_BUFFER_CAPACITY: usize = 256;
const ODOMETRY_BUFFER_MAX_AGE: Duration = Duration::from_micros(2_000_000);

/// A force-reselect request, consumed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReselectRequest {
    pub request_id: u32,
}

/// State written by the serial receive loop and read by the main loop (and,
/// for identity, by the HTTP server too).
pub struct HostState {
    odometry_history: Mutex<TimestampedHistoryBuffer<Local, OdometryState>>,
    robot_identity: Mutex<Option<(RobotColor, RobotType)>>,
    pending_reselect: Mutex<Option<PendingReselectRequest>>,
    debug_stream: Mutex<Option<Vec<u8>>>,
}

impl HostState {
    pub fn new() -> Self {
        HostState {
            odometry_history: Mutex::new(TimestampedHistoryBuffer::new(
                ODOMETRY_BUFFER_CAPACITY,
                ODOMETRY_BUFFER_MAX_AGE,
            )),
            robot_identity: Mutex::new(None),
            pending_reselect: Mutex::new(None),
            debug_stream: Mutex::new(None),
        }
    }

    /// Inserted by the odometry handler, keyed by `receipt_local_time -
    /// odometry_local_offset`.
    pub fn record_odometry(&self, key: Timestamp<Local>, state: OdometryState) {
        let mut buffer = self.odometry_history.lock();
        if let Err(error) = buffer.add(key, state) {
            tracing::warn!(?error, "dropping out-of-order odometry sample");
        }
    }

    pub fn nearest_odometry(&self, t: Timestamp<Local>) -> Option<OdometryState> {
        self.odometry_history.lock().search(t).copied()
    }

    pub fn set_robot_identity(&self, color: RobotColor, robot_type: RobotType) {
        *self.robot_identity.lock() = Some((color, robot_type));
    }

    pub fn robot_identity(&self) -> Option<(RobotColor, RobotType)> {
        *self.robot_identity.lock()
    }

    pub fn request_reselect(&self, request_id: u32) {
        *self.pending_reselect.lock() = Some(PendingReselectRequest { request_id });
    }

    /// Consumes the pending request, if any.
    pub fn take_pending_reselect(&self) -> Option<PendingReselectRequest> {
        self.pending_reselect.lock().take()
    }

    /// Overwrites the latched debug-stream frame (an already-encoded image,
    /// e.g. JPEG). Readers always see the latest available frame.
    pub fn publish_debug_frame(&self, frame: Vec<u8>) {
        *self.debug_stream.lock() = Some(frame);
    }

    pub fn latest_debug_frame(&self) -> Option<Vec<u8>> {
        self.debug_stream.lock().clone()
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}
