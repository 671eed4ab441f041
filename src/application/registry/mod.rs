//! Registry use case: inspect, extend and check the registry document.

mod use_case;

pub use use_case::{RegistryUseCase, Violation, VerifyReport};
