// Teikoku CLI library

pub mod output;
pub mod router;
pub mod session;

pub use router::{Cli, Commands};
pub use session::{Selection, Session};
