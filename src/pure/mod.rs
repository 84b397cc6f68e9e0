//! Pure data structures for the window manager state.
//!
//! Everything in this module is free of X calls: clients are referred to by
//! opaque [Xid][crate::Xid] handles and all operations are in-memory state
//! transitions. The [core][crate::core] layer is responsible for reconciling
//! this state against the X server after each mutation.
pub mod client;
pub mod client_set;
pub mod geometry;
pub mod layout;
pub mod monitor;
pub mod view;

pub use client::{Client, SizeHints};
pub use client_set::ClientSet;
pub use geometry::{Point, Rect};
pub use layout::Layout;
pub use monitor::{Monitor, NUM_VIEWS};
pub use view::View;
