#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod error;
pub mod i2c_drv;
pub mod st25dv;
pub mod util;

#[cfg(feature = "firmware")]
pub mod board;

pub use config::{Config, Password, WriteWindow};
pub use error::Error;
pub use i2c_drv::{Bus, Engine, Event, Frame, Framing, TransactionStatus};
pub use st25dv::{Link, Port, Suspend, Transport};
