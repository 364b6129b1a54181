pub mod routes;

pub use routes::{ensure_user_exists, routes};
