//! Tick driver — the fixed-rate loop that feeds the session.
//!
//! Runs the core at a nominal 60 Hz: poll input, pull at most one
//! landmark snapshot, advance the session, hand the snapshot to the
//! render sink, then sleep out the remainder of the tick.  Supports
//! graceful signal handling and an exit-after tick budget for CI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::bail;
use tracing::info;

use crate::render::RenderSink;
use crate::session::{Session, TickInput};
use crate::source::{InputSource, LandmarkSource};

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
pub fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

// ── Config ─────────────────────────────────────────────────

/// Driver loop configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Tick rate in Hz.
    pub tick_hz: u32,
    /// Stop after this many ticks (CI runs).
    pub exit_after_ticks: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            exit_after_ticks: None,
        }
    }
}

// ── Loop ───────────────────────────────────────────────────

/// Run the session until quit, shutdown signal, or the tick budget runs
/// out.  All core work happens synchronously inside the tick; the only
/// external calls are the non-blocking source polls.
pub fn run(
    session: &mut Session,
    landmarks: &mut dyn LandmarkSource,
    input: &mut dyn InputSource,
    sink: &mut dyn RenderSink,
    config: &DriverConfig,
) -> anyhow::Result<()> {
    if config.tick_hz == 0 {
        bail!("tick rate must be nonzero");
    }
    let period = Duration::from_secs_f64(1.0 / config.tick_hz as f64);
    let start = Instant::now();
    let mut next_tick = start;
    let mut ticks: u64 = 0;

    info!("driver loop entered at {} Hz", config.tick_hz);

    loop {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("shutdown signal received, exiting");
            break;
        }
        if let Some(budget) = config.exit_after_ticks {
            if ticks >= budget {
                info!("tick budget of {} exhausted, exiting", budget);
                break;
            }
        }

        let keys = input.poll();
        if keys.quit {
            info!("quit requested, exiting");
            break;
        }

        let tick_input = TickInput {
            keys,
            snapshot: landmarks.next_snapshot(),
            now_s: start.elapsed().as_secs_f64(),
        };
        let snapshot = session.tick(&tick_input);
        sink.present(&snapshot);
        ticks += 1;

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            // Fell behind; realign rather than sprinting to catch up.
            next_tick = now;
        }
    }

    info!(
        "driver loop exited after {} tick(s), session {}",
        ticks,
        session.phase.as_str()
    );
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::KeyboardInput;
    use crate::device::DeviceConfig;
    use crate::face::GestureConfig;
    use crate::render::RenderSnapshot;
    use crate::source::{NullInputSource, NullLandmarkSource, ScriptedLandmarkSource};
    use crate::world::{Arena, World};

    struct CountingSink {
        presented: u64,
    }

    impl RenderSink for CountingSink {
        fn present(&mut self, _snapshot: &RenderSnapshot) {
            self.presented += 1;
        }
    }

    struct QuitAfter {
        polls: u32,
        quit_on: u32,
    }

    impl InputSource for QuitAfter {
        fn poll(&mut self) -> KeyboardInput {
            self.polls += 1;
            KeyboardInput {
                quit: self.polls >= self.quit_on,
                ..Default::default()
            }
        }
    }

    fn new_session() -> Session {
        Session::new(
            World::standard(Arena::default()),
            DeviceConfig::default(),
            GestureConfig::default(),
            0.0,
        )
    }

    #[test]
    fn test_exit_after_budget() {
        let mut session = new_session();
        let mut sink = CountingSink { presented: 0 };
        let config = DriverConfig {
            tick_hz: 1000,
            exit_after_ticks: Some(5),
        };
        run(
            &mut session,
            &mut NullLandmarkSource,
            &mut NullInputSource,
            &mut sink,
            &config,
        )
        .expect("driver run");
        assert_eq!(sink.presented, 5);
    }

    #[test]
    fn test_quit_ends_loop_before_tick() {
        let mut session = new_session();
        let mut sink = CountingSink { presented: 0 };
        let mut input = QuitAfter {
            polls: 0,
            quit_on: 3,
        };
        let config = DriverConfig {
            tick_hz: 1000,
            exit_after_ticks: Some(100),
        };
        run(
            &mut session,
            &mut NullLandmarkSource,
            &mut input,
            &mut sink,
            &config,
        )
        .expect("driver run");
        // Two full ticks ran; the third poll carried quit and no tick
        // followed it.
        assert_eq!(sink.presented, 2);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut session = new_session();
        let mut sink = CountingSink { presented: 0 };
        let config = DriverConfig {
            tick_hz: 0,
            exit_after_ticks: Some(1),
        };
        let result = run(
            &mut session,
            &mut NullLandmarkSource,
            &mut NullInputSource,
            &mut sink,
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scripted_run_advances_session() {
        let mut session = new_session();
        let mut sink = CountingSink { presented: 0 };
        let mut landmarks =
            ScriptedLandmarkSource::parse("eyebrows:10,none:2").expect("valid script");
        let config = DriverConfig {
            tick_hz: 2000,
            exit_after_ticks: Some(12),
        };
        run(
            &mut session,
            &mut landmarks,
            &mut NullInputSource,
            &mut sink,
            &config,
        )
        .expect("driver run");
        // Ten eyebrow ticks drive the device forward (heading 0 → -y).
        assert!(session.device.y < 400.0, "device should have moved");
        assert_eq!(session.phase, crate::session::SessionPhase::Running);
    }
}
