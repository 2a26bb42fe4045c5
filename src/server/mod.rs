mod routes;
mod service;

pub use routes::{router, AppState};
pub use service::{run, serve};
