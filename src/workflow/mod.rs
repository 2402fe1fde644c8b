pub mod event;
pub mod session;
pub mod view;

pub use event::{transition, Dispatched, Event};
pub use session::SessionState;
pub use view::SessionView;
