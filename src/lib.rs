// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) loads settings, builds the client and hands it to the loop.
//
// Module responsibilities:
// - `config`: reads the API credential and the few optional settings from
//   the environment (optionally populated from a local settings file).
// - `validate`: rejects empty or non-name-like input before any request.
// - `prompt`: the fixed system instruction and the per-name user message.
// - `api`: the completion client talking to the hosted chat endpoint.
// - `retry`: fixed-delay retry around a fallible call.
// - `ui`: the interactive read/answer loop.
// - `error` and `logging`: the shared error type and subscriber setup.
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod retry;
pub mod ui;
pub mod validate;

pub use error::{Error, Result};
