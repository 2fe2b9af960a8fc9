// Identity: bcrypt password hashes, 7-day HS256 tokens, and the bearer-token extractor
// that protected handlers take as an argument.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod users;

pub use extractor::AuthUser;
pub use jwt::JwtService;
