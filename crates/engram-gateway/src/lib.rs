// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP REST surface for the Engram memory store.
//!
//! The gateway exposes the ingestion, retrieval, profile, and maintenance
//! operations over axum with explicit request/response schemas per endpoint.
//! Consumers (agent runtimes) talk to exactly this surface and have no
//! dependency on internal representations.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
