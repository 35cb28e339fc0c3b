// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single recents-animation slot.
//!
//! At most one consumer owns the system gesture animation at a time. A consumer
//! claims it with [`TaskAnimationManager::start_recents_animation`]; a
//! continuation gesture inherits it through
//! [`TaskAnimationManager::continue_recents_animation`] instead of claiming a
//! second one. Completion timing belongs to whoever drives the animation; this
//! type only tracks ownership and phase.

use thiserror::Error;

use crate::consumer::ConsumerId;
use crate::types::{ComponentName, TaskId};

/// Errors returned by the animation slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// Another consumer already owns the animation.
    #[error("recents animation already owned by {owner:?}")]
    AlreadyClaimed {
        /// Current owner.
        owner: ConsumerId,
    },
    /// There is no animation to continue or finish.
    #[error("no recents animation in flight")]
    NotRunning,
    /// The caller does not own the animation.
    #[error("{caller:?} does not own the recents animation")]
    NotOwner {
        /// The consumer that made the call.
        caller: ConsumerId,
    },
}

/// Phase of the animation in the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnimationPhase {
    /// Following the finger.
    Running,
    /// Settling towards its end state.
    Finishing {
        /// Task the animation settles into, if it ends in an app.
        target: Option<TaskId>,
        /// The animation ends at home.
        to_home: bool,
    },
}

/// The current owner of the animation slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AnimationClaim {
    /// Consumer that owns the animation.
    pub owner: ConsumerId,
    /// Log id of the gesture that started it.
    pub log_id: Option<u32>,
    /// Current phase.
    pub phase: AnimationPhase,
}

/// Owner of the one allowed recents animation.
#[derive(Clone, Debug, Default)]
pub struct TaskAnimationManager {
    claim: Option<AnimationClaim>,
    preloaded: Option<ComponentName>,
}

impl TaskAnimationManager {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current claim, if any.
    pub fn claim(&self) -> Option<AnimationClaim> {
        self.claim
    }

    /// Owner of the animation, if any.
    pub fn owner(&self) -> Option<ConsumerId> {
        self.claim.map(|c| c.owner)
    }

    /// An animation is following the finger.
    pub fn is_recents_animation_running(&self) -> bool {
        matches!(
            self.claim,
            Some(AnimationClaim {
                phase: AnimationPhase::Running,
                ..
            })
        )
    }

    /// An animation is settling.
    pub fn is_finishing(&self) -> bool {
        matches!(
            self.claim,
            Some(AnimationClaim {
                phase: AnimationPhase::Finishing { .. },
                ..
            })
        )
    }

    /// Claim the slot for `owner`.
    ///
    /// Claiming again from the current owner is a no-op. A preloaded overview
    /// is consumed by the claim.
    pub fn start_recents_animation(
        &mut self,
        owner: ConsumerId,
        log_id: Option<u32>,
    ) -> Result<(), AnimationError> {
        match self.claim {
            Some(claim) if claim.owner != owner => Err(AnimationError::AlreadyClaimed {
                owner: claim.owner,
            }),
            Some(_) => Ok(()),
            None => {
                self.preloaded = None;
                self.claim = Some(AnimationClaim {
                    owner,
                    log_id,
                    phase: AnimationPhase::Running,
                });
                tracing::debug!(?owner, ?log_id, "recents animation claimed");
                Ok(())
            }
        }
    }

    /// Hand the in-flight animation to `new_owner`, the base of a continuation gesture.
    ///
    /// A finishing animation goes back to running under its new owner.
    pub fn continue_recents_animation(
        &mut self,
        new_owner: ConsumerId,
        log_id: Option<u32>,
    ) -> Result<(), AnimationError> {
        let claim = self.claim.as_mut().ok_or(AnimationError::NotRunning)?;
        tracing::debug!(from = ?claim.owner, to = ?new_owner, "recents animation continued");
        claim.owner = new_owner;
        claim.log_id = log_id;
        claim.phase = AnimationPhase::Running;
        Ok(())
    }

    /// Begin settling the animation owned by `caller`.
    pub fn finish_recents_animation(
        &mut self,
        caller: ConsumerId,
        target: Option<TaskId>,
        to_home: bool,
    ) -> Result<(), AnimationError> {
        let claim = self.claim.as_mut().ok_or(AnimationError::NotRunning)?;
        if claim.owner != caller {
            return Err(AnimationError::NotOwner { caller });
        }
        claim.phase = AnimationPhase::Finishing { target, to_home };
        Ok(())
    }

    /// Settle whatever animation is running, regardless of owner.
    ///
    /// Used by the reset baseline when a new gesture lands on top of a stale
    /// animation. Returns false if nothing was running.
    pub fn finish_running_recents_animation(&mut self, to_home: bool) -> bool {
        match self.claim.as_mut() {
            Some(claim) if claim.phase == AnimationPhase::Running => {
                claim.phase = AnimationPhase::Finishing {
                    target: None,
                    to_home,
                };
                true
            }
            _ => false,
        }
    }

    /// Release a claim whose owner is not in `live`.
    ///
    /// The owner's chain was replaced without handing the animation over, so
    /// the animation is finished to let the new chain claim the slot.
    pub fn release_orphaned(&mut self, live: &[ConsumerId]) -> Option<AnimationClaim> {
        let claim = self.claim.filter(|c| !live.contains(&c.owner))?;
        tracing::debug!(
            owner = ?claim.owner,
            phase = ?claim.phase,
            "recents animation of a replaced chain finished"
        );
        self.claim = None;
        Some(claim)
    }

    /// The animation completed; release the slot.
    pub fn on_recents_animation_finished(&mut self) -> Option<AnimationClaim> {
        self.claim.take()
    }

    /// Warm up the overview activity ahead of the next gesture.
    ///
    /// Ignored while an animation owns the slot.
    pub fn preload_recents_animation(&mut self, overview: ComponentName) -> bool {
        if self.claim.is_some() {
            return false;
        }
        tracing::trace!(%overview, "preloading recents animation");
        self.preloaded = Some(overview);
        true
    }

    /// The component preloaded for the next animation.
    pub fn preloaded(&self) -> Option<&ComponentName> {
        self.preloaded.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ConsumerId = ConsumerId(1);
    const B: ConsumerId = ConsumerId(2);

    #[test]
    fn single_claim() {
        let mut m = TaskAnimationManager::new();
        assert_eq!(m.start_recents_animation(A, Some(1)), Ok(()));
        assert_eq!(m.start_recents_animation(A, Some(1)), Ok(()));
        assert_eq!(
            m.start_recents_animation(B, Some(2)),
            Err(AnimationError::AlreadyClaimed { owner: A })
        );
        assert!(m.is_recents_animation_running());
        assert_eq!(m.owner(), Some(A));
    }

    #[test]
    fn continuation_transfers_ownership() {
        let mut m = TaskAnimationManager::new();
        assert_eq!(
            m.continue_recents_animation(B, None),
            Err(AnimationError::NotRunning)
        );
        m.start_recents_animation(A, Some(1)).unwrap();
        m.finish_recents_animation(A, Some(TaskId(42)), false)
            .unwrap();
        assert!(m.is_finishing());
        m.continue_recents_animation(B, Some(2)).unwrap();
        assert_eq!(m.owner(), Some(B));
        assert!(m.is_recents_animation_running());
        assert_eq!(
            m.finish_recents_animation(A, None, true),
            Err(AnimationError::NotOwner { caller: A })
        );
    }

    #[test]
    fn finish_running_only_touches_running() {
        let mut m = TaskAnimationManager::new();
        assert!(!m.finish_running_recents_animation(false));
        m.start_recents_animation(A, None).unwrap();
        assert!(m.finish_running_recents_animation(true));
        assert!(!m.finish_running_recents_animation(true));
        assert!(m.is_finishing());
        let released = m.on_recents_animation_finished().unwrap();
        assert_eq!(released.owner, A);
        assert!(m.claim().is_none());
    }

    #[test]
    fn orphaned_claim_yields_to_new_owner() {
        let mut m = TaskAnimationManager::new();
        assert!(m.release_orphaned(&[B]).is_none());
        m.start_recents_animation(A, Some(1)).unwrap();
        assert!(m.release_orphaned(&[A, B]).is_none());
        assert_eq!(m.owner(), Some(A));

        let released = m.release_orphaned(&[B]).unwrap();
        assert_eq!(released.owner, A);
        assert_eq!(m.start_recents_animation(B, Some(2)), Ok(()));
        assert_eq!(m.owner(), Some(B));
    }

    #[test]
    fn preload_is_skipped_while_claimed() {
        let mut m = TaskAnimationManager::new();
        let overview = ComponentName::new("com.android.launcher3", ".Launcher");
        assert!(m.preload_recents_animation(overview.clone()));
        assert_eq!(m.preloaded(), Some(&overview));
        m.start_recents_animation(A, None).unwrap();
        assert!(m.preloaded().is_none());
        assert!(!m.preload_recents_animation(overview));
    }
}
