//! # t-coord
//!
//! A coordination and aggregation engine for distributed functional-test
//! campaigns. Many independent test clients register against a coordinator,
//! receive an environment assignment from the active selector strategy, report
//! structured events while exercising their target, and unregister when done.
//! The coordinator durably records every event despite concurrent writers
//! contending on the same record, and summarizes per-round health for a
//! periodic notification push.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tcoord::{Coordinator, CoordinatorConfig, Event, EventType, RegisterRequest};
//!
//! # fn example() -> tcoord::Result<()> {
//! let config = CoordinatorConfig::load(None)?;
//! let coordinator = Coordinator::open(config)?;
//!
//! let env = coordinator.register(&RegisterRequest {
//!     name: "replication-smoke".into(),
//!     class_name: "SmokeSuite".into(),
//!     author: "alice".into(),
//!     round: coordinator.get_round()?,
//!     correlation_token: None,
//! })?;
//! println!("assigned {}/{}", env.cluster_urls[0], env.database_name);
//!
//! coordinator.report_event(
//!     "replication-smoke",
//!     Event::new(EventType::TestSuccess, "all replicas converged"),
//!     1,
//! )?;
//! coordinator.unregister("replication-smoke", 1)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod constants;
mod coordinator;
mod errors;
mod model;
mod notify;
mod registry;
mod round;
mod selector;
mod storage;
mod summary;

pub mod metrics;
pub mod utils;

pub use config::*;
pub use constants::UNRESOLVED_ROUND;
pub use coordinator::*;
pub use errors::*;
pub use model::*;
pub use notify::*;
pub use registry::*;
pub use round::*;
pub use selector::*;
pub use storage::*;
pub use summary::*;
