//! Server-rendered pages of the quiz site.
//!
//! Handlers map service results into the view models in [`vm`] and turn them
//! into complete HTML documents with the `render_*` functions.

#![forbid(unsafe_code)]

pub mod views;
pub mod vm;

pub use views::{
    render_error, render_feedback, render_history, render_home, render_question, render_result,
    render_review_list, render_start, render_year,
};
