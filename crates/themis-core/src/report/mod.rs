pub mod console;

pub use console::{print_evaluation_summary, print_run_summary};
