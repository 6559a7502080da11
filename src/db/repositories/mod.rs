pub mod account;
pub mod node;
