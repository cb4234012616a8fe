//! Owned-or-empty wrapper around one native audio resource

use crate::error::HostError;
use crate::host::AlertPlayer;

/// Exclusive owner of an acquired [`AlertPlayer`].
///
/// The underlying resource is released exactly once: either by
/// [`ResourceHandle::teardown`] or, failing that, when the handle is dropped.
pub struct ResourceHandle {
    player: Option<Box<dyn AlertPlayer>>,
}

impl ResourceHandle {
    pub fn new(player: Box<dyn AlertPlayer>) -> Self {
        Self {
            player: Some(player),
        }
    }

    /// Access the live resource. `None` only after teardown.
    pub fn player_mut(&mut self) -> Option<&mut (dyn AlertPlayer + 'static)> {
        self.player.as_deref_mut()
    }

    pub fn is_released(&self) -> bool {
        self.player.is_none()
    }

    /// Best-effort teardown: halt if playing, reset, release.
    ///
    /// Each step runs regardless of the previous one; failures are logged and
    /// swallowed. The resource is always gone afterwards.
    pub fn teardown(&mut self) {
        let Some(player) = self.player.as_deref_mut() else {
            return;
        };

        match player.is_playing() {
            Ok(true) => log_step("stop", player.stop()),
            Ok(false) => {}
            Err(e) => log_step("query playing state", Err(e)),
        }
        log_step("reset", player.reset());

        // Taken only now so a fault in an earlier step still leaves the
        // resource for `Drop` to release.
        if let Some(mut player) = self.player.take() {
            log_step("release", player.release());
        }
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        let Some(mut player) = self.player.take() else {
            return;
        };
        tracing::warn!("Audio resource dropped without teardown, releasing");
        let released = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| player.release()));
        match released {
            Ok(result) => log_step("release", result),
            Err(_) => tracing::error!("Audio resource release panicked during drop"),
        }
    }
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("released", &self.is_released())
            .finish()
    }
}

fn log_step(step: &str, result: Result<(), HostError>) {
    if let Err(e) = result {
        tracing::warn!("Audio teardown step `{}` failed (ignored): {}", step, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockAlertPlayer;
    use mockall::Sequence;

    #[test]
    fn test_teardown_runs_steps_in_order() {
        let mut seq = Sequence::new();
        let mut player = MockAlertPlayer::new();
        player
            .expect_is_playing()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(true));
        player.expect_stop().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        player.expect_reset().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        player.expect_release().times(1).in_sequence(&mut seq).returning(|| Ok(()));

        let mut handle = ResourceHandle::new(Box::new(player));
        handle.teardown();
        assert!(handle.is_released());
    }

    #[test]
    fn test_teardown_skips_stop_when_idle() {
        let mut player = MockAlertPlayer::new();
        player.expect_is_playing().returning(|| Ok(false));
        player.expect_stop().never();
        player.expect_reset().times(1).returning(|| Ok(()));
        player.expect_release().times(1).returning(|| Ok(()));

        ResourceHandle::new(Box::new(player)).teardown();
    }

    #[test]
    fn test_teardown_swallows_every_failure() {
        let mut player = MockAlertPlayer::new();
        player
            .expect_is_playing()
            .returning(|| Err(HostError::IllegalState("query".into())));
        player.expect_stop().never();
        player
            .expect_reset()
            .times(1)
            .returning(|| Err(HostError::IllegalState("reset".into())));
        player
            .expect_release()
            .times(1)
            .returning(|| Err(HostError::IllegalState("release".into())));

        let mut handle = ResourceHandle::new(Box::new(player));
        handle.teardown();
        assert!(handle.is_released());

        // second teardown is a no-op
        handle.teardown();
    }

    #[test]
    fn test_drop_releases_exactly_once() {
        let mut player = MockAlertPlayer::new();
        player.expect_release().times(1).returning(|| Ok(()));
        drop(ResourceHandle::new(Box::new(player)));
    }
}
