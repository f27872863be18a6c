//! # Equipment Interface
//!
//! This module defines the interface structures which are passed to the drive equipment.

/// Drive equipment demands and sides
pub mod drive;
