//! Application layer orchestrating a release run.
//!
//! [`job::ReleaseJob`] composes the [`scanner`], the release policy and the
//! [`dispatcher`], then folds the dispatch outcomes into a [`report`].

pub mod dispatcher;
pub mod job;
pub mod report;
pub mod scanner;
