pub use super::roles::Entity as Roles;
pub use super::users::Entity as Users;
