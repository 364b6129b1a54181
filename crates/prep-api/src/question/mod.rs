pub mod daily;
pub mod routes;
pub mod samples;

pub use routes::routes;
