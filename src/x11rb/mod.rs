//! Helpers and utilities for using x11rb as a back end for tessella
pub mod xconn;

pub use xconn::RustConn;

/// Enum to store the various ways that operations can fail inside of the
/// x11rb implementation of the [XConn][crate::x::XConn] trait.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ::x11rb::errors::ConnectionError),

    /// Could not get an X11 request reply
    #[error(transparent)]
    Reply(#[from] ::x11rb::errors::ReplyError),

    /// Could not get an X11 request reply or could not generate_id()
    #[error(transparent)]
    ReplyOrId(#[from] ::x11rb::errors::ReplyOrIdError),
}

impl From<::x11rb::errors::ConnectError> for crate::Error {
    fn from(e: ::x11rb::errors::ConnectError) -> Self {
        Self::X11rb(BackendError::from(e))
    }
}

impl From<::x11rb::errors::ConnectionError> for crate::Error {
    fn from(e: ::x11rb::errors::ConnectionError) -> Self {
        Self::X11rb(BackendError::from(e))
    }
}

impl From<::x11rb::errors::ReplyError> for crate::Error {
    fn from(e: ::x11rb::errors::ReplyError) -> Self {
        Self::X11rb(BackendError::from(e))
    }
}

impl From<::x11rb::errors::ReplyOrIdError> for crate::Error {
    fn from(e: ::x11rb::errors::ReplyOrIdError) -> Self {
        Self::X11rb(BackendError::from(e))
    }
}
