//! Data models for the Inclusion Hub catalog.
//!
//! These models match the frontend TypeScript interfaces for seamless interoperability.

mod account;
mod dashboard;
mod member;
mod notification;
mod resource;
mod snapshot;
mod taxonomy;
mod training;

pub use account::*;
pub use dashboard::*;
pub use member::*;
pub use notification::*;
pub use resource::*;
pub use snapshot::*;
pub use taxonomy::*;
pub use training::*;
