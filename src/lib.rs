pub mod config;
pub mod detector;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod retry;
pub mod security;
pub mod server;
pub mod translator;
pub mod translators;

pub use dispatch::Dispatcher;
pub use error::{DispatchError, Result};
pub use model::{TranslationRequest, TranslationResult};
pub use registry::TranslatorRegistry;
