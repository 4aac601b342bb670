pub mod digest;
pub mod token;

pub use digest::digest;
pub use token::TokenService;
