//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled        |
//! |-----------|-------------------------|
//! | `project` | `Init`, `Interview`     |
//! | `extract` | `Extract`               |
//! | `session` | `Status`, `Gaps`        |
//! | `config`  | `Config`                |

pub mod config;
pub mod extract;
pub mod project;
pub mod session;

pub use config::cmd_config;
pub use extract::cmd_extract;
pub use project::{cmd_init, cmd_interview};
pub use session::{cmd_gaps, cmd_status};
