pub mod associations;
pub mod auth;
pub mod credentials;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod validation;

pub use associations::*;
pub use auth::*;
pub use credentials::*;
pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
