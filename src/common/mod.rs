pub mod logging;
pub mod month;
pub mod output;
pub mod progress;
pub mod utils;

pub use logging::*;
pub use month::{diff_month, ParseMonthError, YearMonth};
pub use output::OutputLayout;
pub use progress::{create_bytes_progress_bar, create_count_progress_bar};
pub use utils::*;
