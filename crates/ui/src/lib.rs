#![forbid(unsafe_code)]

pub mod context;
pub mod routes;
pub mod state;
pub mod vm;

pub use context::{AppContext, UiApp, build_app_context};
pub use routes::Route;
pub use state::ViewError;
