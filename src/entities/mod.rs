pub mod prelude;

pub mod nodes;
pub mod users;
