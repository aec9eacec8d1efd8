pub mod ineq;
pub mod plot_lag;
pub mod reproduce;
pub mod sweep;
pub mod timeline;

pub use ineq::run_ineq;
pub use plot_lag::run_plot_lag;
pub use reproduce::run_reproduce;
pub use sweep::{run_authors, run_journals, run_lag, SweepSummary};
pub use timeline::run_timeline;
