pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod i18n;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod search;
pub mod storage;
pub mod utils;

pub use error::{GatewayError, PortalError, PortalResult, StoreError};
