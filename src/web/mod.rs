mod context;
pub use context::{AuthenticatedUser, RequestContext, UserRole};

mod error;
pub use error::{ErrorResponse, WebError, WebResult};

pub mod dto;
pub mod extract;
pub mod middlewares;

mod state;
pub use state::{AppState, AuthSettings};

pub mod routes;

pub mod doc;
