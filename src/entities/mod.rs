pub mod prelude;

pub mod roles;
pub mod users;
