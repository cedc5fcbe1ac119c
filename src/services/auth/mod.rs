pub mod authenticator;
pub mod factory;
pub mod password;
pub mod policy;
pub mod role;
pub mod token_codec;

pub use authenticator::{AuthError, Authenticator, IssuedToken};
pub use password::{PasswordParams, PasswordService};
pub use policy::{AccessDecision, Capability};
pub use role::Role;
pub use token_codec::{TokenCodec, TokenError};
