//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, repository calls and query derivation into the
//!   operations a UI layer binds to.
//! - Keep presentation layers decoupled from storage details.

pub mod board_service;
