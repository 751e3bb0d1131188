//! LungScreen Server
//!
//! HTTP front end for lung cancer risk screening. Accepts a patient's
//! symptom answers, classifies them with a registered model, and returns
//! the verdict together with any follow-up links.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Overrides, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
