use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::{
    playback::{DenyReason, PlaybackPolicy, SkipDirection, TransportAction},
    plans::Entitlements,
};

/// Seconds the interstitial blocks before the advance may complete.
pub const AD_COUNTDOWN_TICKS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loaded { index: usize },
    Playing { index: usize },
    Paused { index: usize },
    /// Blocking interstitial; the advance to `pending` is deferred until the
    /// countdown elapses and the host confirms.
    AdShowing { from: usize, pending: usize, countdown: u8 },
    Closed,
}

/// Side effect the host must carry out after a transition (fire-and-forget).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// POST the skip-counter increment for this session's user.
    ReportSkip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Denial to surface as a non-blocking notice; the state is unchanged.
    pub notice: Option<DenyReason>,
    pub effect: Option<Effect>,
}

impl StepOutcome {
    fn allowed(effect: Option<Effect>) -> Self {
        Self {
            notice: None,
            effect,
        }
    }

    fn denied(reason: DenyReason) -> Self {
        Self {
            notice: Some(reason),
            effect: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("player session is closed")]
    Closed,
    #[error("no track loaded")]
    NothingLoaded,
    #[error("track index {0} out of bounds")]
    IndexOutOfBounds(usize),
    #[error("ad countdown has not elapsed")]
    AdNotElapsed,
    #[error("no ad is showing")]
    NoAdShowing,
}

struct ShuffleOrder {
    order: Vec<usize>,
    cursor: usize,
}

/// One playback session over a fixed queue of tracks, driven entirely by UI
/// events and a one-second timer tick while an ad is showing. Every gated
/// transition goes through `PlaybackPolicy::decide` with the entitlements and
/// skip count this session was opened with.
pub struct PlayerSession {
    queue: Vec<Uuid>,
    entitlements: Entitlements,
    skips_today: i32,
    state: PlayerState,
    shuffle: Option<ShuffleOrder>,
}

impl PlayerSession {
    pub fn new(queue: Vec<Uuid>, entitlements: Entitlements, skips_today: i32) -> Self {
        Self {
            queue,
            entitlements,
            skips_today,
            state: PlayerState::Idle,
            shuffle: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn skips_today(&self) -> i32 {
        self.skips_today
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle.is_some()
    }

    pub fn current_track(&self) -> Option<Uuid> {
        self.current_index().map(|index| self.queue[index])
    }

    fn current_index(&self) -> Option<usize> {
        match self.state {
            PlayerState::Loaded { index }
            | PlayerState::Playing { index }
            | PlayerState::Paused { index } => Some(index),
            PlayerState::AdShowing { from, .. } => Some(from),
            PlayerState::Idle | PlayerState::Closed => None,
        }
    }

    fn ensure_open(&self) -> Result<(), PlayerError> {
        if self.state == PlayerState::Closed {
            return Err(PlayerError::Closed);
        }
        Ok(())
    }

    pub fn load(&mut self, index: usize) -> Result<(), PlayerError> {
        self.ensure_open()?;
        if index >= self.queue.len() {
            return Err(PlayerError::IndexOutOfBounds(index));
        }

        self.state = PlayerState::Loaded { index };
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), PlayerError> {
        self.ensure_open()?;
        match self.state {
            PlayerState::Loaded { index } | PlayerState::Paused { index } => {
                self.state = PlayerState::Playing { index };
                Ok(())
            }
            PlayerState::Playing { .. } => Ok(()),
            _ => Err(PlayerError::NothingLoaded),
        }
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        self.ensure_open()?;
        match self.state {
            PlayerState::Playing { index } => {
                self.state = PlayerState::Paused { index };
                Ok(())
            }
            PlayerState::Paused { .. } => Ok(()),
            _ => Err(PlayerError::NothingLoaded),
        }
    }

    /// Seek within the current track. Denials leave playback untouched and
    /// surface as a notice, not an error.
    pub fn seek(&mut self, target_secs: u32) -> Result<StepOutcome, PlayerError> {
        self.ensure_open()?;
        if self.current_index().is_none() {
            return Err(PlayerError::NothingLoaded);
        }

        let decision = PlaybackPolicy::decide(
            &TransportAction::Seek { target_secs },
            &self.entitlements,
            self.skips_today,
        );

        if !decision.allowed {
            debug!(target_secs, "seek denied by policy");
            return Ok(StepOutcome::denied(
                decision.deny_reason.unwrap_or(DenyReason::SeekNotAllowed),
            ));
        }

        // The host moves the media element; position is not modeled here.
        Ok(StepOutcome::allowed(None))
    }

    pub fn skip_next(&mut self, manual: bool) -> Result<StepOutcome, PlayerError> {
        self.advance(SkipDirection::Forward, manual)
    }

    pub fn skip_prev(&mut self) -> Result<StepOutcome, PlayerError> {
        self.advance(SkipDirection::Backward, true)
    }

    /// The current track finished on its own: an automatic forward advance.
    pub fn track_ended(&mut self) -> Result<StepOutcome, PlayerError> {
        self.ensure_open()?;
        let Some(from) = self.current_index() else {
            return Err(PlayerError::NothingLoaded);
        };

        let decision =
            PlaybackPolicy::decide(&TransportAction::NaturalEnd, &self.entitlements, self.skips_today);

        let pending = self.step_index(from, SkipDirection::Forward);
        if decision.requires_ad {
            self.state = PlayerState::AdShowing {
                from,
                pending,
                countdown: AD_COUNTDOWN_TICKS,
            };
        } else {
            self.state = PlayerState::Playing { index: pending };
        }

        Ok(StepOutcome::allowed(None))
    }

    fn advance(
        &mut self,
        direction: SkipDirection,
        manual: bool,
    ) -> Result<StepOutcome, PlayerError> {
        self.ensure_open()?;
        let Some(from) = self.current_index() else {
            return Err(PlayerError::NothingLoaded);
        };

        let action = TransportAction::Skip { direction, manual };
        let decision = PlaybackPolicy::decide(&action, &self.entitlements, self.skips_today);

        if !decision.allowed {
            debug!(?direction, manual, "skip denied by policy");
            return Ok(StepOutcome::denied(
                decision.deny_reason.unwrap_or(DenyReason::SkipQuotaExceeded),
            ));
        }

        let effect = if decision.counts_against_quota {
            self.skips_today += 1;
            Some(Effect::ReportSkip)
        } else {
            None
        };

        let pending = self.step_index(from, direction);
        if decision.requires_ad {
            self.state = PlayerState::AdShowing {
                from,
                pending,
                countdown: AD_COUNTDOWN_TICKS,
            };
        } else {
            self.state = PlayerState::Playing { index: pending };
        }

        Ok(StepOutcome::allowed(effect))
    }

    fn step_index(&mut self, from: usize, direction: SkipDirection) -> usize {
        let len = self.queue.len();
        match &mut self.shuffle {
            Some(shuffled) => {
                shuffled.cursor = match direction {
                    SkipDirection::Forward => (shuffled.cursor + 1) % shuffled.order.len(),
                    SkipDirection::Backward => {
                        (shuffled.cursor + shuffled.order.len() - 1) % shuffled.order.len()
                    }
                };
                shuffled.order[shuffled.cursor]
            }
            None => match direction {
                SkipDirection::Forward => (from + 1) % len,
                SkipDirection::Backward => (from + len - 1) % len,
            },
        }
    }

    /// One-second countdown tick while the interstitial is showing.
    pub fn tick_ad(&mut self) -> Result<u8, PlayerError> {
        match &mut self.state {
            PlayerState::AdShowing { countdown, .. } => {
                *countdown = countdown.saturating_sub(1);
                Ok(*countdown)
            }
            _ => Err(PlayerError::NoAdShowing),
        }
    }

    /// Completes the deferred advance. Rejected while the countdown is still
    /// running; the ad phase cannot be cut short.
    pub fn confirm_ad(&mut self) -> Result<(), PlayerError> {
        match self.state {
            PlayerState::AdShowing { pending, countdown, .. } => {
                if countdown > 0 {
                    return Err(PlayerError::AdNotElapsed);
                }
                self.state = PlayerState::Playing { index: pending };
                Ok(())
            }
            _ => Err(PlayerError::NoAdShowing),
        }
    }

    /// Shuffle on builds a permutation and walks it from the current track;
    /// shuffle off restores the original ordering.
    pub fn toggle_shuffle<R: Rng>(&mut self, rng: &mut R) -> Result<(), PlayerError> {
        self.ensure_open()?;
        if matches!(self.state, PlayerState::AdShowing { .. }) {
            // The pending advance was computed against the current order.
            return Ok(());
        }

        match self.shuffle.take() {
            Some(_) => Ok(()),
            None => {
                let mut order: Vec<usize> = (0..self.queue.len()).collect();
                order.shuffle(rng);
                let cursor = self
                    .current_index()
                    .and_then(|current| order.iter().position(|&index| index == current))
                    .unwrap_or(0);
                self.shuffle = Some(ShuffleOrder { order, cursor });
                Ok(())
            }
        }
    }

    pub fn close(&mut self) {
        self.state = PlayerState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::plan_kinds::PlanKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn queue(len: usize) -> Vec<Uuid> {
        (0..len).map(|_| Uuid::new_v4()).collect()
    }

    fn free_session(len: usize, skips_today: i32) -> PlayerSession {
        let mut session = PlayerSession::new(
            queue(len),
            Entitlements::for_kind(PlanKind::Free),
            skips_today,
        );
        session.load(0).unwrap();
        session.play().unwrap();
        session
    }

    fn premium_session(len: usize) -> PlayerSession {
        let mut session =
            PlayerSession::new(queue(len), Entitlements::for_kind(PlanKind::Premium), 0);
        session.load(0).unwrap();
        session.play().unwrap();
        session
    }

    fn sit_through_ad(session: &mut PlayerSession) {
        for _ in 0..AD_COUNTDOWN_TICKS {
            session.tick_ad().unwrap();
        }
        session.confirm_ad().unwrap();
    }

    #[test]
    fn free_user_gets_three_skips_then_a_denial() {
        let mut session = free_session(10, 0);

        for expected in 1..=3 {
            let outcome = session.skip_next(true).unwrap();
            assert_eq!(outcome.effect, Some(Effect::ReportSkip));
            assert!(matches!(session.state(), PlayerState::AdShowing { .. }));
            assert_eq!(session.skips_today(), expected);
            sit_through_ad(&mut session);
        }

        let state_before = session.state();
        let outcome = session.skip_next(true).unwrap();
        assert_eq!(outcome.notice, Some(DenyReason::SkipQuotaExceeded));
        assert_eq!(outcome.effect, None);
        assert_eq!(session.state(), state_before);
        assert_eq!(session.skips_today(), 3);
    }

    #[test]
    fn ad_cannot_be_dismissed_before_the_countdown_elapses() {
        let mut session = free_session(3, 0);
        session.skip_next(true).unwrap();

        assert_eq!(session.confirm_ad(), Err(PlayerError::AdNotElapsed));
        for _ in 0..(AD_COUNTDOWN_TICKS - 1) {
            session.tick_ad().unwrap();
            assert_eq!(session.confirm_ad(), Err(PlayerError::AdNotElapsed));
        }

        assert_eq!(session.tick_ad().unwrap(), 0);
        session.confirm_ad().unwrap();
        assert_eq!(session.state(), PlayerState::Playing { index: 1 });
    }

    #[test]
    fn premium_user_skips_fifty_times_without_ads_or_counting() {
        let mut session = premium_session(4);

        for _ in 0..50 {
            let outcome = session.skip_next(true).unwrap();
            assert_eq!(outcome.notice, None);
            assert_eq!(outcome.effect, None);
            assert!(matches!(session.state(), PlayerState::Playing { .. }));
        }

        assert_eq!(session.skips_today(), 0);
    }

    #[test]
    fn natural_end_shows_an_ad_for_free_but_not_premium() {
        let mut free = free_session(3, 3);
        let outcome = free.track_ended().unwrap();
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.effect, None);
        assert!(matches!(free.state(), PlayerState::AdShowing { .. }));
        assert_eq!(free.skips_today(), 3);

        let mut premium = premium_session(3);
        premium.track_ended().unwrap();
        assert_eq!(premium.state(), PlayerState::Playing { index: 1 });
    }

    #[test]
    fn previous_is_never_gated_even_at_quota() {
        let mut session = free_session(5, 3);

        let outcome = session.skip_prev().unwrap();
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.effect, None);
        assert_eq!(session.state(), PlayerState::Playing { index: 4 });
        assert_eq!(session.skips_today(), 3);
    }

    #[test]
    fn seek_is_a_noop_with_notice_for_free_users() {
        let mut session = free_session(3, 0);
        let state_before = session.state();

        let outcome = session.seek(30).unwrap();
        assert_eq!(outcome.notice, Some(DenyReason::SeekNotAllowed));
        assert_eq!(session.state(), state_before);

        let mut premium = premium_session(3);
        let outcome = premium.seek(30).unwrap();
        assert_eq!(outcome.notice, None);
    }

    #[test]
    fn shuffle_walks_a_permutation_and_restores_order() {
        let mut session = premium_session(6);
        let mut rng = StdRng::seed_from_u64(7);

        session.toggle_shuffle(&mut rng).unwrap();
        assert!(session.is_shuffled());

        let mut visited = Vec::new();
        for _ in 0..5 {
            session.skip_next(true).unwrap();
            let PlayerState::Playing { index } = session.state() else {
                panic!("expected playing state");
            };
            visited.push(index);
        }

        // Five forward steps from the starting slot cover the rest of the
        // permutation exactly once.
        let mut sorted = visited.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);

        session.toggle_shuffle(&mut rng).unwrap();
        assert!(!session.is_shuffled());

        let PlayerState::Playing { index: current } = session.state() else {
            panic!("expected playing state");
        };
        session.skip_next(true).unwrap();
        assert_eq!(
            session.state(),
            PlayerState::Playing {
                index: (current + 1) % 6
            }
        );
    }

    #[test]
    fn forward_advance_wraps_at_the_end_of_the_queue() {
        let mut session = premium_session(3);
        session.skip_next(true).unwrap();
        session.skip_next(true).unwrap();
        assert_eq!(session.state(), PlayerState::Playing { index: 2 });

        session.skip_next(true).unwrap();
        assert_eq!(session.state(), PlayerState::Playing { index: 0 });
    }

    #[test]
    fn transport_requires_a_loaded_track_and_stops_after_close() {
        let mut session =
            PlayerSession::new(queue(2), Entitlements::for_kind(PlanKind::Premium), 0);

        assert_eq!(session.skip_next(true), Err(PlayerError::NothingLoaded));
        assert_eq!(session.load(5), Err(PlayerError::IndexOutOfBounds(5)));

        session.load(1).unwrap();
        session.play().unwrap();
        session.close();
        assert_eq!(session.state(), PlayerState::Closed);
        assert_eq!(session.skip_next(true), Err(PlayerError::Closed));
        assert_eq!(session.play(), Err(PlayerError::Closed));
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut session = premium_session(2);

        session.pause().unwrap();
        assert_eq!(session.state(), PlayerState::Paused { index: 0 });
        session.play().unwrap();
        assert_eq!(session.state(), PlayerState::Playing { index: 0 });
    }
}
