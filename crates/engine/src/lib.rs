pub mod bootstrap;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod matching;

pub use bootstrap::{bootstrap, bootstrap_with_config, init_logging, BootstrapError, Engine};
pub use errors::EngineError;
pub use gateway::{GatewayError, ProfileGateway, StaticProfileGateway};
pub use ledger::RequestLedger;
pub use matching::MatchingService;
