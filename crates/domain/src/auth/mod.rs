//! Authentication domain types

mod authorization;
mod grant;
mod payload;
mod token;

pub use authorization::{AuthorizationData, AuthorizationStatus};
pub use grant::AuthorizationGrant;
pub use payload::TokenPayloadFormat;
pub use token::Token;
