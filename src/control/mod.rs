pub mod controller;
pub mod independent;
pub mod standard;

pub use controller::Controller;
pub use independent::IndependentPid;
pub use standard::StandardPid;
