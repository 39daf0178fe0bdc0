pub mod credentials;
pub mod errors;
pub mod models;
pub mod providers;
pub mod router;
pub mod stream;
