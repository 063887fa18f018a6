//! Front-end session: request state machine, command driver and views.

mod driver;
mod state;
mod view;

pub use driver::{SessionCommand, SessionDriver};
pub use state::{RequestState, Session, SessionError, Snapshot};
pub use view::{format_view, render, LoadingPhrases, View};
