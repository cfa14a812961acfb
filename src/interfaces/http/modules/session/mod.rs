//! Session module: resolved snapshot and route, one-shot or streamed

pub mod dto;
pub mod handlers;
pub mod stream;

pub use dto::*;
pub use handlers::*;
pub use stream::session_stream;
