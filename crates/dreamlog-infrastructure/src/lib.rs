pub mod config_service;
pub mod json_entry_repository;
pub mod json_profile_repository;
pub mod paths;
pub mod remote;
pub mod secret_service;

pub use crate::config_service::ConfigService;
pub use crate::json_entry_repository::JsonFileEntryRepository;
pub use crate::json_profile_repository::JsonFileProfileRepository;
pub use crate::remote::{RemoteEntryClient, RemoteEntryStore};
pub use crate::secret_service::SecretServiceImpl;
