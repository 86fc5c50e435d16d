use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
  EmptyPayload,
  PayloadTooLarge { len: usize, max: usize },
  /// the payload can never fit the write window, even right after a wraparound
  PayloadExceedsWindow { len: usize, window: usize },
  /// the tag refused the I2C password on every attempt
  SessionNotOpen,
  /// every attempt of the memory write ended in a NACK
  NotAcknowledged { attempts: u8 },
  InvalidRetryLimit,
  InvalidWindow,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::EmptyPayload => write!(f, "payload is empty"),
      Error::PayloadTooLarge { len, max } => {
        write!(f, "payload of {} bytes is larger than the {} byte transmit buffer", len, max)
      }
      Error::PayloadExceedsWindow { len, window } => {
        write!(f, "payload of {} bytes does not fit the {} byte write window", len, window)
      }
      Error::SessionNotOpen => write!(f, "security session could not be opened"),
      Error::NotAcknowledged { attempts } => {
        write!(f, "tag did not acknowledge the write after {} attempts", attempts)
      }
      Error::InvalidRetryLimit => write!(f, "retry limit must be at least 1"),
      Error::InvalidWindow => write!(f, "write window start must be below its end"),
    }
  }
}
