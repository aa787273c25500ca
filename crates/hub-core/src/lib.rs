//! # hub-core
//!
//! Domain types and pure policy for LinkHub.
//!
//! This crate is shared by every other LinkHub crate:
//! - Entity structs for links, users, and the org chart
//! - Status enums with moderation transitions
//! - The [`access::Audience`] variant describing who may see a link
//! - Visibility resolution and org-hierarchy helpers
//! - Search, paging, and analytics over in-memory collections
//! - CLI response types

pub mod access;
pub mod analytics;
pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod org;
pub mod responses;
pub mod search;
pub mod validation;
pub mod visibility;
