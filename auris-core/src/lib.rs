//! # auris-core
//!
//! Session layer for the Auris ear-training engine. Owns the live round state,
//! serializes event delivery through the pure reducer in `auris-types`, and
//! fans the resulting effect bundles out to collaborators — independent of any
//! UI framework or audio backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use auris_core::config::Presets;
//! use auris_core::engine::EngineHandle;
//! use auris_core::session::Session;
//! use auris_types::GameEvent;
//!
//! // 1. Load discipline presets (embedded defaults + user override)
//! let presets = Presets::load();
//! let config = presets.into_configs().remove(0);
//!
//! // 2. Build a session; the audio engine drains the command receiver
//! let (engine, engine_rx) = EngineHandle::new();
//! let session = Arc::new(Session::new(config, files, seed)?);
//! session.add_observer(move |effects| engine.apply(effects));
//!
//! // 3. Attach the UI and start the tick source
//! session.post_event(&GameEvent::Init);
//! session.post_event(&GameEvent::CreateUi);
//! session.start_ticker(Duration::from_millis(100));
//!
//! // 4. UI raises events back into `post_event`; the `quit` effect tears
//! //    the session down via the registered on_quit continuation.
//! ```
//!
//! ## Module Overview
//!
//! - [`session`] — `Session`: state lock, observer fan-out, tick source
//! - [`engine`] — `EngineHandle`: fire-and-forget DSP/playback command channel
//! - [`config`] — TOML preset loading (embedded + user override)
//! - [`event_log`] — append-only JSONL event recording and replay
//! - [`store`] — round-result history as JSONL value trees

pub mod config;
pub mod engine;
pub mod event_log;
pub mod session;
pub mod store;
