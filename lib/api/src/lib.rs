pub mod rest;

pub use rest::{ApiConfig, AppState, RestApi};
