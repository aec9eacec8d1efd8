pub mod gini;
pub mod lorenz;

pub use gini::gini;
pub use lorenz::LorenzCurve;
