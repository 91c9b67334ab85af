//! Crawl primitives shared by every site family.

pub mod pagination;
pub mod scheduler;

pub use pagination::{PaginationWalker, Walk, WalkOutcome};
pub use scheduler::{Completed, DEFAULT_WORKERS, FetchScheduler, WorkItem, progress_bar};
