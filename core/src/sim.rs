//! In-memory device implementing the native primitives
//!
//! Used by the desktop simulator and the integration tests. Tracks how many
//! audio resources are alive at once, records window requests, and queues the
//! PiP transitions a real OS would report asynchronously. Faults can be
//! injected per primitive.

use crate::error::HostError;
use crate::host::{AlertAudioHost, AlertPlayer, WindowHost};
use crate::pip::AspectRatio;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Faults the simulated device injects into its primitives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimFaults {
    pub fail_acquire: bool,
    pub fail_start: bool,
    /// Every teardown step (stop, reset, release) reports an error
    pub fail_teardown: bool,
    pub reject_pip: bool,
    pub fail_background: bool,
}

/// Observable state of the simulated device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub live_players: usize,
    pub peak_live_players: usize,
    pub players_acquired: usize,
    pub players_released: usize,
    pub playing: bool,
    pub in_pip: bool,
    pub enter_requests: Vec<AspectRatio>,
    pub auto_enter: Option<(bool, AspectRatio)>,
    pub background_requests: usize,
}

#[derive(Debug, Default)]
struct DeviceInner {
    stats: DeviceStats,
    faults: SimFaults,
    pending_transitions: VecDeque<bool>,
    next_player_id: u64,
}

impl DeviceInner {
    /// Queue a transition the OS will report later.
    fn transition(&mut self, in_pip: bool) {
        if self.stats.in_pip != in_pip {
            self.stats.in_pip = in_pip;
            self.pending_transitions.push_back(in_pip);
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    platform_level: u32,
    inner: Arc<Mutex<DeviceInner>>,
}

impl SimulatedDevice {
    pub fn new(platform_level: u32) -> Self {
        Self {
            platform_level,
            inner: Arc::new(Mutex::new(DeviceInner::default())),
        }
    }

    pub fn audio_host(&self) -> Box<dyn AlertAudioHost> {
        Box::new(SimAudioHost {
            inner: self.inner.clone(),
        })
    }

    pub fn window_host(&self) -> Box<dyn WindowHost> {
        Box::new(SimWindowHost {
            platform_level: self.platform_level,
            inner: self.inner.clone(),
        })
    }

    pub fn stats(&self) -> DeviceStats {
        self.inner.lock().stats.clone()
    }

    pub fn set_faults(&self, faults: SimFaults) {
        self.inner.lock().faults = faults;
    }

    /// The user dragged the floating window away or expanded it.
    pub fn user_leaves_pip(&self) {
        self.inner.lock().transition(false);
    }

    /// The OS auto-entered windowed mode (user left the app with auto-enter on).
    pub fn user_leaves_app(&self) {
        let mut inner = self.inner.lock();
        if matches!(inner.stats.auto_enter, Some((true, _))) {
            inner.transition(true);
        }
    }

    /// Drain transitions the OS has completed since the last call, oldest first.
    pub fn take_transitions(&self) -> Vec<bool> {
        self.inner.lock().pending_transitions.drain(..).collect()
    }
}

struct SimAudioHost {
    inner: Arc<Mutex<DeviceInner>>,
}

impl AlertAudioHost for SimAudioHost {
    fn acquire_default_alert(&mut self) -> Result<Box<dyn AlertPlayer>, HostError> {
        let mut inner = self.inner.lock();
        if inner.faults.fail_acquire {
            return Err(HostError::Unavailable(
                "default alert sound unavailable".to_string(),
            ));
        }
        inner.next_player_id += 1;
        let stats = &mut inner.stats;
        stats.players_acquired += 1;
        stats.live_players += 1;
        stats.peak_live_players = stats.peak_live_players.max(stats.live_players);
        Ok(Box::new(SimPlayer {
            id: inner.next_player_id,
            inner: self.inner.clone(),
            playing: false,
        }))
    }
}

struct SimPlayer {
    id: u64,
    inner: Arc<Mutex<DeviceInner>>,
    playing: bool,
}

impl SimPlayer {
    fn teardown_fault(&self, step: &str) -> Result<(), HostError> {
        if self.inner.lock().faults.fail_teardown {
            return Err(HostError::IllegalState(format!(
                "player {} refused {}",
                self.id, step
            )));
        }
        Ok(())
    }
}

impl AlertPlayer for SimPlayer {
    fn set_looping(&mut self, _looping: bool) -> Result<(), HostError> {
        Ok(())
    }

    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), HostError> {
        if !(0.0..=1.0).contains(&left) || !(0.0..=1.0).contains(&right) {
            return Err(HostError::Rejected(format!("volume {left}/{right}")));
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        if inner.faults.fail_start {
            return Err(HostError::IllegalState(format!(
                "player {} could not start",
                self.id
            )));
        }
        inner.stats.playing = true;
        self.playing = true;
        Ok(())
    }

    fn is_playing(&self) -> Result<bool, HostError> {
        Ok(self.playing)
    }

    fn stop(&mut self) -> Result<(), HostError> {
        // the device stops regardless; the fault only affects the report
        self.playing = false;
        self.inner.lock().stats.playing = false;
        self.teardown_fault("stop")
    }

    fn reset(&mut self) -> Result<(), HostError> {
        self.teardown_fault("reset")
    }

    fn release(&mut self) -> Result<(), HostError> {
        {
            let mut inner = self.inner.lock();
            inner.stats.live_players = inner.stats.live_players.saturating_sub(1);
            inner.stats.players_released += 1;
            if self.playing {
                inner.stats.playing = false;
            }
        }
        self.playing = false;
        self.teardown_fault("release")
    }
}

struct SimWindowHost {
    platform_level: u32,
    inner: Arc<Mutex<DeviceInner>>,
}

impl WindowHost for SimWindowHost {
    fn platform_level(&self) -> u32 {
        self.platform_level
    }

    fn request_enter_pip(&mut self, aspect: AspectRatio) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        if inner.faults.reject_pip {
            return Err(HostError::Rejected("activity is not visible".to_string()));
        }
        inner.stats.enter_requests.push(aspect);
        inner.transition(true);
        Ok(())
    }

    fn set_auto_enter(&mut self, enabled: bool, aspect: AspectRatio) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        if inner.faults.reject_pip {
            return Err(HostError::Rejected("params rejected".to_string()));
        }
        inner.stats.auto_enter = Some((enabled, aspect));
        Ok(())
    }

    fn move_to_back(&mut self) -> Result<(), HostError> {
        let mut inner = self.inner.lock();
        inner.stats.background_requests += 1;
        if inner.faults.fail_background {
            return Err(HostError::IllegalState("task is finishing".to_string()));
        }
        inner.transition(false);
        Ok(())
    }
}
