//! Crawling and extraction for lesekorpus.
//!
//! This crate provides the HTTP session, the rule-driven extraction
//! primitives, pagination and scheduling, and the per-family site crawls
//! the CLI drives.

pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod sites;

pub use crawl::{Completed, FetchScheduler, PaginationWalker, Walk, WalkOutcome, WorkItem};
pub use extract::{Extractor, ProfileExtractor, split_sentences};
pub use fetch::{FetchClient, FetchConfig, PageSource};
pub use sites::{CrawlContext, Dataset, crawl_site};
