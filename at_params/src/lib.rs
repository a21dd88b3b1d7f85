//! # at_params
//!
//! Strategy parameters shared between the strategy process and the Telegram controller.
//! The set lives in a single JSON file; writers go through [`ParamStore::save`] and
//! readers poll [`ParamStore::has_changed`] before re-parsing.

pub mod error;
pub mod params;
pub mod store;
pub mod validator;

pub use error::StoreError;
pub use error::ValidationError;
pub use params::ParameterSet;
pub use store::ParamStore;
pub use validator::validate;
pub use validator::validate_value;
