// src/lib.rs

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod db;
pub mod error;
pub mod events;
pub mod flow;
pub mod inline;
pub mod logging;
pub mod messenger;
pub mod store;
pub mod telegram;

pub use assistant::Assistant;
pub use config::RefBotConfig;
pub use error::{FlowError, StoreError, TransportError};
