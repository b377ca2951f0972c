pub mod recalc;
pub mod reconcile;
pub mod schedule;
pub mod workdays;
