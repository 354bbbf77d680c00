//! Decision Console Library
//!
//! Client-side core of the credit decision dashboard: it submits an applicant
//! profile to the remote decision service, keeps the session state machine,
//! and reshapes each response into display-ready views.
//!
//! # Modules
//!
//! - `audit`: Live and synthetic audit log rows.
//! - `config`: Configuration management.
//! - `debounce`: Cancellable debounce timer.
//! - `decision_client`: Decision service HTTP client.
//! - `errors`: Request error types.
//! - `models`: Profile and decision response models.
//! - `render`: Plain-text panels for the console.
//! - `session`: Session controller and lifecycle state.
//! - `tabs`: Tab router and simulator slider ranges.
//! - `views`: Pure view derivers.

pub mod audit;
pub mod config;
pub mod debounce;
pub mod decision_client;
pub mod errors;
pub mod models;
pub mod render;
pub mod session;
pub mod tabs;
pub mod views;
