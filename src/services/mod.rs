pub mod retry;
pub use retry::RetryPolicy;

pub mod quote_service;
pub use quote_service::{QuoteError, QuoteService};

pub mod quote_service_impl;
pub use quote_service_impl::SeaOrmQuoteService;

pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::RestAuthService;
