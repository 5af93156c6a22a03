pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::HealthResponse;
pub use service::HealthService;
