pub mod error;
pub mod params;
pub mod plant;
pub mod control;
pub mod sim;
pub mod io;

pub use error::{Result, SimError};
pub use params::Params;
pub use plant::{BallChannel, FirstOrderLag, Plant};
pub use control::{Controller, IndependentPid, StandardPid};
pub use sim::{simulate, SimConfig};
