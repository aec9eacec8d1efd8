pub mod plot;
pub mod tsv;

pub use plot::{render_lag, render_lorenz, render_timeline};
pub use tsv::{read_lag_rows, write_gini_rows, write_timeline, GiniRow, LagRow};
