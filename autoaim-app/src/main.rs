use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use autoaim_app::cli::Cli;
use autoaim_app::host_state::HostState;
use autoaim_app::main_loop::{FrameSource, MainLoop, RawFrame, VideoSink};
use autoaim_app::{config, http_debug, logging};

use autoaim_core::target_detector::TeamColor;
use autoaim_core::time::Duration as AutoaimDuration;
use autoaim_uart::handler::{HandlerRegistry, TypedHandler};
use autoaim_uart::messages::{
    OdometryMessage, RebootMessage, RefereeRobotIdMessage, SelectNewTargetMessage, ShutdownMessage,
};
use autoaim_uart::serial;
use autoaim_uart::PerseveringReceiver;

/// Yields no frames. Camera capture and the detection model it runs are
/// supplied by a caller of this binary's wiring, not by this crate.
struct NoFrames;

impl FrameSource for NoFrames {
    fn next_frame(&mut self) -> Option<RawFrame> {
        std::thread::sleep(std::time::Duration::from_millis(50));
        None
    }
}

struct NoVideoSink;

impl VideoSink for NoVideoSink {
    fn record(&mut self, _frame: &RawFrame) {}
}

fn session_dir(root_dir: &str, prefix: &str) -> std::io::Result<PathBuf> {
    let root = PathBuf::from(shellexpand::tilde(root_dir).into_owned());
    std::fs::create_dir_all(&root)?;
    let mut index = 0u32;
    loop {
        let candidate = root.join(format!("{prefix}_{index:04}"));
        if !candidate.exists() {
            std::fs::create_dir_all(&candidate)?;
            let latest = root.join("latest");
            let _ = std::fs::remove_file(&latest);
            #[cfg(unix)]
            std::os::unix::fs::symlink(&candidate, &latest).ok();
            return Ok(candidate);
        }
        index += 1;
    }
}

fn build_registry(
    host_state: Arc<HostState>,
    own_team_color: Arc<parking_lot::Mutex<Option<TeamColor>>>,
    odometry_local_offset: AutoaimDuration,
) -> Result<HandlerRegistry, autoaim_uart::UartError> {
    let odometry_state = host_state.clone();
    let odometry_handler = TypedHandler::new(move |message: OdometryMessage, receipt| {
        let Some(state) = message.odometry_state() else {
            return;
        };
        odometry_state.record_odometry(receipt.checked_sub(odometry_local_offset), state);
    });

    let identity_state = host_state.clone();
    let identity_handler = TypedHandler::new(move |message: RefereeRobotIdMessage, _t| {
        identity_state.set_robot_identity(message.color, message.robot_type);
        let mut color = own_team_color.lock();
        *color = Some(match message.color {
            autoaim_uart::messages::RobotColor::Red => TeamColor::Red,
            autoaim_uart::messages::RobotColor::Blue => TeamColor::Blue,
        });
    });

    let reselect_state = host_state.clone();
    let reselect_handler = TypedHandler::new(move |message: SelectNewTargetMessage, _t| {
        reselect_state.request_reselect(message.request_id);
    });

    let reboot_handler = TypedHandler::new(|_message: RebootMessage, _t| {
        warn!("reboot requested");
        if is_tegra() {
            let _ = std::process::Command::new("sudo").arg("reboot").status();
        }
    });

    let shutdown_handler = TypedHandler::new(|_message: ShutdownMessage, _t| {
        warn!("shutdown requested");
        if is_tegra() {
            let _ = std::process::Command::new("sudo").arg("shutdown").arg("now").status();
        }
    });

    HandlerRegistry::new(vec![
        Box::new(odometry_handler),
        Box::new(identity_handler),
        Box::new(reselect_handler),
        Box::new(reboot_handler),
        Box::new(shutdown_handler),
    ])
}

fn is_tegra() -> bool {
    std::fs::read_to_string("/proc/device-tree/model")
        .map(|model| model.contains("Tegra"))
        .unwrap_or(false)
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load(&cli.config_paths) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("fatal: failed to load configuration: {error}");
            std::process::exit(1);
        }
    };

    let session_dir = match session_dir(&config.session.root_dir, &config.session.prefix) {
        Ok(dir) => dir,
        Err(error) => {
            eprintln!("fatal: failed to create session directory: {error}");
            std::process::exit(1);
        }
    };

    if logging::init(&cli.verbosity, cli.silent, &session_dir.join("log.txt")).is_err() {
        eprintln!("fatal: failed to initialize logging");
        std::process::exit(1);
    }

    info!(session_dir = %session_dir.display(), "starting");

    let host_state = Arc::new(HostState::new());
    let own_team_color = Arc::new(parking_lot::Mutex::new(None));

    let registry = match build_registry(
        host_state.clone(),
        own_team_color.clone(),
        config.odometry_local_offset,
    ) {
        Ok(registry) => registry,
        Err(error) => {
            error!(%error, "duplicate handler registration, refusing to start");
            std::process::exit(1);
        }
    };

    let serial_config = config.serial.clone();
    std::thread::spawn(move || {
        let mut port = match serial::open(
            &serial_config.port,
            serial_config.baud_rate,
            std::time::Duration::from_millis(100),
        ) {
            Ok(port) => port,
            Err(error) => {
                error!(%error, "failed to open serial port, serial link disabled");
                return;
            }
        };
        let mut receiver = PerseveringReceiver::new(
            autoaim_uart::Transceiver::new(serial_config.discard_warning_threshold),
            serial_config.max_num_parse_errors,
        );
        let mut registry = registry;
        loop {
            let mut chunk = [0u8; 256];
            match port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    receiver.feed(&chunk[..n]);
                    let now = autoaim_core::time::Timestamp::from_micros(
                        chrono::Utc::now().timestamp_micros(),
                    );
                    if let Err(error) = receiver.poll(now, &mut registry) {
                        error!(%error, "serial link failed fatally");
                        break;
                    }
                }
                Err(error) => {
                    error!(%error, "serial read failed");
                    break;
                }
            }
        }
    });

    let http_state = host_state.clone();
    let bind_addr = config.http.bind_addr.clone();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(error) => {
                error!(%error, "failed to start debug HTTP runtime");
                return;
            }
        };
        if let Err(error) = runtime.block_on(http_debug::serve(&bind_addr, http_state)) {
            error!(%error, "debug HTTP server exited");
        }
    });

    let team_color = own_team_color.lock().unwrap_or(TeamColor::Red);
    let mut main_loop = MainLoop::new(config, host_state, team_color);
    let mut frame_source = NoFrames;
    let mut video_sink = NoVideoSink;

    loop {
        if main_loop.step(&mut frame_source, Some(&mut video_sink)).is_none() {
            continue;
        }
        // Sending the resulting AutoAimTargetUpdateMessage to the MCB is
        // wired once a writable handle to the serial port is shared with
        // the main loop (the port above is owned by the receive thread).
    }
}
