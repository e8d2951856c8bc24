//! Control-plane client for Starcast broadcast rooms.
//!
//! Wraps the LiveKit server API with the access policy Starcast rooms use:
//! one trusted publishing source per room, any number of hidden viewers.
//! Room and participant state lives on the remote service; nothing is
//! cached here.

pub mod config;
pub mod controller;
pub mod error;
pub mod token;

pub use config::{ControllerConfig, EnvFile};
pub use controller::RoomController;
pub use error::{Error, Result};

/// Wire-level descriptors returned unchanged by the service.
pub use livekit_protocol as proto;
