//! Signal extraction
//!
//! Turns raw match lists into the form and head-to-head signals the
//! predictor blends.

pub mod form;
pub mod head_to_head;

pub use form::{form_score, form_text, FormSummary};
pub use head_to_head::{head_to_head_scores, HeadToHeadTally};
