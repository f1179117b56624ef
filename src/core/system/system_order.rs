//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level, all in `Update`):
//! 1. PrePhysics (thrust force / rotation edits before Rapier steps)
//! 2. Outcome (collision responses, level transition timers)
//! 3. Feedback (audio + particles following gameplay state)
//! Rapier itself runs afterwards in `PostUpdate`.
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // forces applied before physics simulation step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct OutcomeSet; // collision responses + scheduled transitions

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct FeedbackSet; // presentation of the gameplay state
