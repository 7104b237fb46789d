//! Assistant relay - chat widget backend
//!
//! Relays chat messages to a hosted assistant (`OpenAI` Assistants v2),
//! polls the resulting run, and hands the reply back together with the
//! thread id the client resends on its next turn.

pub mod api;
pub mod assistant;
pub mod config;
pub mod relay;
pub mod surface;
