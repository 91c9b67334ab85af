//! Core types and shared functionality for lesekorpus.
//!
//! This crate provides:
//! - Unified error types
//! - Layered configuration
//! - The extraction data model and output records
//! - Per-site profiles

pub mod config;
pub mod error;
pub mod model;
pub mod profile;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{
    Article, BlockKind, Book, BookEntry, BookRecord, Chapter, ContentBlock, Section, TocNode, TocRecord, WikiRecord,
};
pub use profile::{
    ContainerRule, ExtractRule, Family, IndexRule, Layout, ListingRule, Marker, NextLinkRule, PruneRule, SanitizeRule,
    Scope, Seed, SiteProfile, TocRule,
};
