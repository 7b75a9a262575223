//! Per-verb action handlers.

pub mod app;
pub mod compose;
pub mod db;
