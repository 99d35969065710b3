//! Builder API for state graphs and machines.
//!
//! Graphs are declared state by state with [`StateBuilder`], validated as a
//! whole by [`StateGraphBuilder::build`], and then shared by any number of
//! machines configured through [`MachineBuilder`].

pub mod error;
pub mod graph;
pub mod machine;
pub mod state;

pub use error::BuildError;
pub use graph::StateGraphBuilder;
pub use machine::MachineBuilder;
pub use state::StateBuilder;
