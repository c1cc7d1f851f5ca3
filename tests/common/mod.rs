//! Common test utilities for producer tests
//!
//! `RecordingTemplate` stands in for a real graph template: it records every
//! call and answers with fixed ids.

pub mod recording_template;

pub use recording_template::{Call, RecordingTemplate};
