//! Parameter management
//!
//! - [`storage`]: The [`ParameterStore`] name/value map
//! - [`actions`]: Typed [`ActionParams`] snapshot with bounds

pub mod actions;
pub mod error;
pub mod storage;

pub use actions::ActionParams;
pub use error::ParameterError;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
