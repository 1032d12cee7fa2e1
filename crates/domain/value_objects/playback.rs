use serde::{Deserialize, Serialize};

use crate::domain::value_objects::plans::Entitlements;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipDirection {
    Forward,
    Backward,
}

/// A transport action requested by the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportAction {
    Play,
    Pause,
    Resume,
    Seek { target_secs: u32 },
    Skip { direction: SkipDirection, manual: bool },
    NaturalEnd,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DenyReason {
    SeekNotAllowed,
    SkipQuotaExceeded,
}

/// Outcome of a policy check for one transport action.
///
/// A denied action never requires an ad and never counts against quota; an
/// allowed forward advance on an ad-supported plan defers behind an
/// interstitial rather than being refused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub requires_ad: bool,
    pub counts_against_quota: bool,
    pub deny_reason: Option<DenyReason>,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            requires_ad: false,
            counts_against_quota: false,
            deny_reason: None,
        }
    }

    fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            requires_ad: false,
            counts_against_quota: false,
            deny_reason: Some(reason),
        }
    }
}

pub struct PlaybackPolicy;

impl PlaybackPolicy {
    /// Decides whether a transport action is permitted, whether an ad must be
    /// interposed, and whether the action consumes skip quota.
    ///
    /// Pure over `(action, entitlements, skips_so_far)`; callers persist the
    /// quota side effect when `counts_against_quota` is set.
    pub fn decide(
        action: &TransportAction,
        entitlements: &Entitlements,
        skips_so_far: i32,
    ) -> Decision {
        match action {
            TransportAction::Play | TransportAction::Pause | TransportAction::Resume => {
                Decision::allow()
            }
            TransportAction::Seek { .. } => {
                if entitlements.can_seek() {
                    Decision::allow()
                } else {
                    Decision::deny(DenyReason::SeekNotAllowed)
                }
            }
            TransportAction::Skip {
                direction: SkipDirection::Backward,
                ..
            } => Decision::allow(),
            TransportAction::Skip {
                direction: SkipDirection::Forward,
                manual,
            } => {
                if *manual {
                    if let Some(max_skips) = entitlements.max_skips_per_day {
                        if skips_so_far >= max_skips {
                            return Decision::deny(DenyReason::SkipQuotaExceeded);
                        }
                    }
                }

                Decision {
                    allowed: true,
                    requires_ad: entitlements.is_ad_supported(),
                    counts_against_quota: *manual && !entitlements.unlimited_skips(),
                    deny_reason: None,
                }
            }
            TransportAction::NaturalEnd => Decision {
                allowed: true,
                requires_ad: entitlements.is_ad_supported(),
                counts_against_quota: false,
                deny_reason: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::plan_kinds::PlanKind;

    fn free() -> Entitlements {
        Entitlements::for_kind(PlanKind::Free)
    }

    fn premium() -> Entitlements {
        Entitlements::for_kind(PlanKind::Premium)
    }

    fn manual_forward() -> TransportAction {
        TransportAction::Skip {
            direction: SkipDirection::Forward,
            manual: true,
        }
    }

    #[test]
    fn seek_is_denied_for_free_and_allowed_for_premium() {
        let action = TransportAction::Seek { target_secs: 42 };

        let denied = PlaybackPolicy::decide(&action, &free(), 0);
        assert!(!denied.allowed);
        assert_eq!(denied.deny_reason, Some(DenyReason::SeekNotAllowed));
        assert!(!denied.requires_ad);

        let allowed = PlaybackPolicy::decide(&action, &premium(), 0);
        assert!(allowed.allowed);
        assert!(allowed.deny_reason.is_none());
    }

    #[test]
    fn seek_denial_is_independent_of_quota() {
        let action = TransportAction::Seek { target_secs: 10 };
        let decision = PlaybackPolicy::decide(&action, &free(), 0);

        assert!(!decision.counts_against_quota);
    }

    #[test]
    fn manual_forward_skip_within_quota_counts_and_requires_ad_on_free() {
        let decision = PlaybackPolicy::decide(&manual_forward(), &free(), 2);

        assert!(decision.allowed);
        assert!(decision.requires_ad);
        assert!(decision.counts_against_quota);
    }

    #[test]
    fn manual_forward_skip_at_quota_is_denied() {
        let decision = PlaybackPolicy::decide(&manual_forward(), &free(), 3);

        assert!(!decision.allowed);
        assert_eq!(decision.deny_reason, Some(DenyReason::SkipQuotaExceeded));
        assert!(!decision.counts_against_quota);
        assert!(!decision.requires_ad);
    }

    #[test]
    fn premium_manual_skip_never_counts_and_never_requires_ad() {
        let decision = PlaybackPolicy::decide(&manual_forward(), &premium(), 50);

        assert!(decision.allowed);
        assert!(!decision.requires_ad);
        assert!(!decision.counts_against_quota);
    }

    #[test]
    fn backward_skip_is_never_gated() {
        let action = TransportAction::Skip {
            direction: SkipDirection::Backward,
            manual: true,
        };
        let decision = PlaybackPolicy::decide(&action, &free(), 99);

        assert!(decision.allowed);
        assert!(!decision.requires_ad);
        assert!(!decision.counts_against_quota);
    }

    #[test]
    fn automatic_forward_skip_ignores_quota_but_keeps_the_ad() {
        let action = TransportAction::Skip {
            direction: SkipDirection::Forward,
            manual: false,
        };
        let decision = PlaybackPolicy::decide(&action, &free(), 3);

        assert!(decision.allowed);
        assert!(decision.requires_ad);
        assert!(!decision.counts_against_quota);
    }

    #[test]
    fn natural_end_behaves_like_an_automatic_forward_skip() {
        let free_decision = PlaybackPolicy::decide(&TransportAction::NaturalEnd, &free(), 3);
        assert!(free_decision.allowed);
        assert!(free_decision.requires_ad);
        assert!(!free_decision.counts_against_quota);

        let premium_decision = PlaybackPolicy::decide(&TransportAction::NaturalEnd, &premium(), 0);
        assert!(premium_decision.allowed);
        assert!(!premium_decision.requires_ad);
    }
}
