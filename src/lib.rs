//! Building Wizard - multi-step add-building setup
//!
//! The wizard core lives in [`wizard`]; [`content`] resolves the fields of
//! each sub-step and [`storage`] keeps entered data across runs. The terminal
//! front end is in [`app`] and [`ui`].

pub mod app;
pub mod config;
pub mod content;
pub mod logging;
pub mod storage;
pub mod ui;
pub mod wizard;
