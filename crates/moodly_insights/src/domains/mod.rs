//! Dashboard compositions over the core aggregations.
//!
//! - [`team`]: manager view of anonymous, aggregated team trends
//! - [`personal`]: an employee's own history overview

pub mod personal;
pub mod team;
