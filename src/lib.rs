//! # Satellite Telemetry Commands
//!
//! Telemetry command handlers for nanosatellite flight software. A textual
//! command invocation (name plus parameter string) becomes one fixed-size
//! binary frame ready for downlink.
//!
//! ## Features
//!
//! - **Fixed-size frames**: every packed struct is checked against the frame
//!   payload capacity, at compile time and again at pack time
//! - **Typed parameters**: per-command field schemas instead of format strings
//! - **Payload selection**: temperature and attitude samples as a sum type
//! - **Pluggable collaborators**: data store, transport and command registry
//!   are traits or owned values, never globals
//! - **Embedded-friendly**: bounded buffers, no heap allocation on the frame path
//!
//! ## Quick Start
//!
//! ```rust
//! use sattm::commands::{tm, CmdStatus, CommandContext};
//! use sattm::config::TmConfig;
//! use sattm::registry::CommandRegistry;
//! use sattm::store::MemoryStore;
//! use sattm::transport::RecordingTransport;
//!
//! let mut registry = CommandRegistry::new();
//! tm::tm_init(&mut registry).unwrap();
//! registry.activate();
//!
//! let config = TmConfig::default();
//! let store = MemoryStore::simulated(3600, 4);
//! let mut transport = RecordingTransport::new();
//! let mut console = String::new();
//! let mut ctx = CommandContext::new(&config, &store, &mut transport, &mut console);
//!
//! let status = registry.execute("send_status", Some("5".as_bytes()), &mut ctx).unwrap();
//! assert_eq!(status, CmdStatus::Ok);
//! assert_eq!(transport.sent().len(), 1);
//! ```
//!
//! ## Architecture
//!
//! - [`frame`] - Telemetry frame model and packing
//! - [`codec`] - Fixed-layout little-endian encoding
//! - [`params`] - Command parameter schemas and parsing
//! - [`telemetry`] - Status snapshot, payload samples and the payload selector
//! - [`commands`] - Telemetry command handlers
//! - [`registry`] - Command registry
//! - [`store`] / [`transport`] - Data store and downlink seams
//! - [`config`] - Command configuration

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod codec;
pub mod commands;
pub mod config;
pub mod frame;
pub mod params;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod transport;

// Re-export main public types for convenience
pub use commands::{CmdStatus, CommandContext};
pub use frame::{DestinationEnvelope, FrameKind, TelemetryFrame, FRAME_PAYLOAD_CAPACITY};
pub use registry::CommandRegistry;
pub use telemetry::{PayloadKind, PayloadSample, StatusSnapshot};
