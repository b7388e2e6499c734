//! Strider locomotion core (engine-agnostic)
//!
//! Procedural locomotion control for a multi-legged articulated body: a
//! hierarchical pose-node arena, an analytic two-bone limb solver, per-leg
//! stepping state machines coordinated by a shared gait clock, and a body
//! floating/leveling/jump controller. Environment geometry is consumed
//! through the [`SceneQuery`] capability; rendering, input decoding and UI
//! live outside this crate.

pub mod body;
pub mod config;
pub mod error;
pub mod gait;
pub mod inputs;
pub mod leg;
pub mod math;
pub mod node;
pub mod outputs;
pub mod query;
pub mod rig;
pub mod solver;
pub mod stepper;

// Re-exports for consumers (adapters)
pub use body::{BodyController, BodyState};
pub use config::RigConfig;
pub use error::RigError;
pub use gait::GaitClock;
pub use inputs::{Inputs, JumpCommand};
pub use leg::{Leg, LegState, LegStateKind};
pub use node::{NodeArena, NodeId};
pub use outputs::{BodyOutput, LegOutput, Outputs};
pub use query::{LayerMask, RayHit, SceneQuery, ALL_LAYERS};
pub use rig::{LimbSpec, Rig};
pub use solver::{solve_two_bone, LimbPose};
