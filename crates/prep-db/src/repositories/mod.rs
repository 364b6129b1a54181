// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod analytics;
pub mod chat;
pub mod practice;
pub mod progress;
pub mod question;
pub mod study_plan;
pub mod syllabus;
pub mod user;
