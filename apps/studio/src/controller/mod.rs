//! Controller layer: session commands typed at the prompt and the error
//! banners shown for failed operations.

pub mod commands;
pub mod events;
