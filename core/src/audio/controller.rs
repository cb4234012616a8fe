//! Looping alert playback with at most one live session

use super::handle::ResourceHandle;
use crate::config::AudioConfig;
use crate::error::{BridgeError, HostError};
use crate::host::AlertAudioHost;

/// The one live playback session
#[derive(Debug)]
pub struct AudioSession {
    handle: ResourceHandle,
    pub looping: bool,
    pub volume: f32,
}

/// Owns the alert audio host and the current session, if any.
///
/// `Idle --play--> Playing`, `Playing --play--> Playing` (restart),
/// `Playing --stop--> Idle`, `Idle --stop--> Idle`.
pub struct AudioController {
    host: Box<dyn AlertAudioHost>,
    config: AudioConfig,
    session: Option<AudioSession>,
}

impl AudioController {
    pub fn new(host: Box<dyn AlertAudioHost>, config: AudioConfig) -> Self {
        Self {
            host,
            config,
            session: None,
        }
    }

    /// Restart playback of the default alert sound.
    ///
    /// Any existing session is torn down before the new resource is acquired.
    pub fn play(&mut self) -> Result<bool, BridgeError> {
        self.stop();

        let player = self
            .host
            .acquire_default_alert()
            .map_err(|e| BridgeError::Playback(e.to_string()))?;
        let mut handle = ResourceHandle::new(player);

        if let Err(e) = self.start(&mut handle) {
            handle.teardown();
            tracing::error!("Alert playback failed to start: {}", e);
            return Err(BridgeError::Playback(e.to_string()));
        }

        self.session = Some(AudioSession {
            handle,
            looping: self.config.looping,
            volume: self.config.volume,
        });
        tracing::info!(
            "Alert playback started (looping={}, volume={})",
            self.config.looping,
            self.config.volume
        );
        Ok(true)
    }

    fn start(&self, handle: &mut ResourceHandle) -> Result<(), HostError> {
        let player = handle
            .player_mut()
            .ok_or_else(|| HostError::IllegalState("resource already released".to_string()))?;
        player.set_looping(self.config.looping)?;
        player.set_volume(self.config.volume, self.config.volume)?;
        player.start()
    }

    /// Tear down the current session, if any. Never fails.
    pub fn stop(&mut self) -> bool {
        if let Some(mut session) = self.session.take() {
            session.handle.teardown();
            tracing::info!("Alert playback stopped");
        }
        true
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AudioSession> {
        self.session.as_ref()
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockAlertAudioHost, MockAlertPlayer};
    use mockall::predicate::eq;

    fn healthy_player() -> MockAlertPlayer {
        let mut player = MockAlertPlayer::new();
        player.expect_set_looping().with(eq(true)).returning(|_| Ok(()));
        player
            .expect_set_volume()
            .with(eq(1.0), eq(1.0))
            .returning(|_, _| Ok(()));
        player.expect_start().times(1).returning(|| Ok(()));
        player.expect_is_playing().returning(|| Ok(true));
        player.expect_stop().returning(|| Ok(()));
        player.expect_reset().returning(|| Ok(()));
        player.expect_release().times(1).returning(|| Ok(()));
        player
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let host = MockAlertAudioHost::new();
        let mut controller = AudioController::new(Box::new(host), AudioConfig::default());
        assert!(controller.stop());
        assert!(controller.stop());
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_play_then_stop() {
        let mut host = MockAlertAudioHost::new();
        host.expect_acquire_default_alert()
            .times(1)
            .returning(|| Ok(Box::new(healthy_player())));

        let mut controller = AudioController::new(Box::new(host), AudioConfig::default());
        assert_eq!(controller.play(), Ok(true));
        assert!(controller.is_playing());
        let session = controller.session().unwrap();
        assert!(session.looping);
        assert_eq!(session.volume, 1.0);

        assert!(controller.stop());
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_replay_restarts_with_fresh_resource() {
        let mut host = MockAlertAudioHost::new();
        host.expect_acquire_default_alert()
            .times(2)
            .returning(|| Ok(Box::new(healthy_player())));

        let mut controller = AudioController::new(Box::new(host), AudioConfig::default());
        assert_eq!(controller.play(), Ok(true));
        assert_eq!(controller.play(), Ok(true));
        assert!(controller.is_playing());
    }

    #[test]
    fn test_acquire_failure_is_playback_error() {
        let mut host = MockAlertAudioHost::new();
        host.expect_acquire_default_alert()
            .returning(|| Err(HostError::Unavailable("no ringtone".into())));

        let mut controller = AudioController::new(Box::new(host), AudioConfig::default());
        let err = controller.play().unwrap_err();
        assert_eq!(err.code(), "ERR_PLAY");
        assert!(err.to_string().contains("no ringtone"));
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_start_failure_releases_partial_resource() {
        let mut host = MockAlertAudioHost::new();
        host.expect_acquire_default_alert().times(1).returning(|| {
            let mut player = MockAlertPlayer::new();
            player.expect_set_looping().returning(|_| Ok(()));
            player.expect_set_volume().returning(|_, _| Ok(()));
            player
                .expect_start()
                .returning(|| Err(HostError::IllegalState("focus denied".into())));
            player.expect_is_playing().returning(|| Ok(false));
            player.expect_reset().times(1).returning(|| Ok(()));
            player.expect_release().times(1).returning(|| Ok(()));
            Ok(Box::new(player))
        });

        let mut controller = AudioController::new(Box::new(host), AudioConfig::default());
        assert!(matches!(controller.play(), Err(BridgeError::Playback(_))));
        assert!(!controller.is_playing());
    }

    #[test]
    fn test_configured_volume_is_applied() {
        let mut host = MockAlertAudioHost::new();
        host.expect_acquire_default_alert().returning(|| {
            let mut player = MockAlertPlayer::new();
            player.expect_set_looping().with(eq(false)).returning(|_| Ok(()));
            player
                .expect_set_volume()
                .with(eq(0.25), eq(0.25))
                .times(1)
                .returning(|_, _| Ok(()));
            player.expect_start().returning(|| Ok(()));
            player.expect_is_playing().returning(|| Ok(true));
            player.expect_stop().returning(|| Ok(()));
            player.expect_reset().returning(|| Ok(()));
            player.expect_release().returning(|| Ok(()));
            Ok(Box::new(player))
        });

        let config = AudioConfig {
            volume: 0.25,
            looping: false,
        };
        let mut controller = AudioController::new(Box::new(host), config);
        assert_eq!(controller.play(), Ok(true));
    }
}
