pub use super::nodes::Entity as Nodes;
pub use super::users::Entity as Users;
