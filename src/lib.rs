//! # ugapi
//!
//! A small HTTP proxy that searches Ultimate Guitar and fetches single tabs,
//! returning normalized JSON instead of HTML.
//!
//! Upstream pages embed all of their data as a JSON blob inside one marker
//! element. Each request fetches one page, pulls that blob out, maps the
//! part it needs and returns it. Nothing is cached or shared between
//! requests.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │   fetch    │──▶│    store     │──▶│ search  /  tab   │
//! │ PageSource │   │ js-store div │   │ map + filter     │
//! └────────────┘   └──────────────┘   └────────┬─────────┘
//!                                              │
//!                           ┌──────────────────┤
//!                           ▼                  ▼
//!                      ┌──────────┐      ┌──────────┐
//!                      │   CLI    │      │   HTTP   │
//!                      │ (ugapi)  │      │  server  │
//!                      └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ugapi serve                              # listen on 0.0.0.0:8000
//! ugapi search "wonderwall" --type Chords  # one-off search, JSON to stdout
//! ugapi tab https://tabs.ultimate-guitar.com/tab/oasis/wonderwall-chords-27596
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Pipeline error kinds |
//! | [`fetch`] | Outbound page fetching |
//! | [`store`] | Embedded JSON store extraction |
//! | [`models`] | Request and response types |
//! | [`search`] | Search result mapping and filtering |
//! | [`tab`] | Tab mapping and markup cleaning |
//! | [`server`] | HTTP server |

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod search;
pub mod server;
pub mod store;
pub mod tab;

#[cfg(test)]
mod test_utils;
