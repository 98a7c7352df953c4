pub mod extractors;
pub mod middleware;
pub mod token;

pub use extractors::AuthenticatedClaims;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenResponse, TokenService};
