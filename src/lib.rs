pub mod attachments;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod ops;
pub mod output;
pub mod paths;
pub mod planner;
pub mod theme;
pub mod tui;
pub mod validate;
pub mod watch;
pub mod week;
