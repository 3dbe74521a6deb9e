pub mod output;

pub use output::{display_answer, display_error, display_notice, display_partial_answers};
