//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod level_data_error;
mod path_error;

pub use http_error::{Error, ErrorKind, Result};
