pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod progress;
pub mod webhooks;
