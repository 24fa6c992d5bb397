//! xap-binpacking: machine-level container allocation for elastic scaling.
//!
//! Given the capacity each agent still has free and what a deployment
//! already holds, the solver grows or shrinks the deployment one container
//! at a time. It does NOT discover agents or start containers; it only
//! produces the allocation plan the grid manager then executes.
//!
//! # Heuristics
//!
//! ```text
//! scale-out: pick the agent with the fewest containers
//!            (ties: most free memory, most free cpu, lowest agent id)
//!            opening unused agents first while below min_machines
//!
//! scale-in:  pick the agent with the most containers
//!            (ties: least free memory, least free cpu, lowest agent id)
//!            avoiding emptying agents while at or below min_machines
//!            freeing the agent's own cpu per container, capped at the
//!            target's cpu; an emptied agent returns all of its cpu
//! ```
//!
//! # Components
//!
//! - **`config`**: `SolverConfig` (container quantum, caps, minimum spread)
//! - **`solver`**: `BinPackingSolver` and `ScaleOutcome`
//! - **`error`**: `SolverError`

pub mod config;
pub mod error;
pub mod solver;

pub use config::SolverConfig;
pub use error::{SolverError, SolverResult};
pub use solver::{BinPackingSolver, ScaleOutcome};
