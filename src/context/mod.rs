//! External collaborators
//!
//! The hydrator consults two outside sources and owns neither:
//! - `Authorization`: whether the current actor passes a gate
//! - `Settings`: string-keyed configuration

mod authorization;
mod settings;

pub use authorization::{ActorContext, Authorization};
pub use settings::{Settings, StaticSettings, ENV_PREFIX};
