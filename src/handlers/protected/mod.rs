pub mod auth;
pub mod crops;
pub mod farms;
pub mod market;
pub mod weather;
