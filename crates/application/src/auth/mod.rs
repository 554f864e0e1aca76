//! Authentication module for the request pipeline.
//!
//! This module provides:
//! - The durable account store holding device identity and tokens
//! - The authorization provider exchanging grants for token pairs

mod account_store;
mod provider;

pub use account_store::AccountStore;
pub use provider::AuthorizationProvider;
