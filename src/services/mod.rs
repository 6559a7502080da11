pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, IssuedToken};
pub use auth_service_impl::SeaOrmAuthService;

pub mod bootstrap;
pub use bootstrap::{BootstrapOutcome, ensure_admin};

pub mod subscription;
pub use subscription::{is_subscription_valid, render_subscription};
