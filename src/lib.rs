//! # Mycora
//!
//! Driver layer around `mycora_core`: the [`app::App`] state behind the
//! `mycora` binary.

pub mod app;
