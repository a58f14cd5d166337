// Host runner adapters

pub mod libtest;

pub use libtest::{FeedSummary, LibtestEvent, LibtestFeed};
