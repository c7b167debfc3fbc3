pub mod manager;
pub mod services;

pub use manager::RegistryManager;
