pub mod engine;
#[cfg(feature = "firmware")]
pub mod i2c1;

use heapless::{consts::U34, Vec};

use crate::constants::{ADDRESS_LEN, MAX_PAYLOAD, TX_BUFFER_SIZE};
use crate::error::Error;

pub use engine::Engine;

/// Outcome of the transaction currently (or last) driven by the engine.
///
/// Written by the interrupt context, read by the foreground only once it is
/// terminal.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TransactionStatus {
  None,
  Begin,
  InProgress,
  Success,
  Nack,
  // reserved
  Finished,
}

impl TransactionStatus {
  pub fn is_terminal(self) -> bool {
    match self {
      TransactionStatus::Success | TransactionStatus::Nack => true,
      _ => false,
    }
  }

  pub fn is_success(self) -> bool {
    self == TransactionStatus::Success
  }
}

/// Bus level event decoded from the peripheral's interrupt flags.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Event {
  /// previous byte acknowledged, transmit register empty
  ByteRequested,
  NotAcknowledged,
  /// start/address phase bookkeeping handled by the bus itself
  Ignore,
}

#[derive(Debug)]
pub enum Message {
  Begin,
  Event(Event),
  FinishTransaction,
}

#[derive(Debug, PartialEq)]
pub enum Action {
  DoNothing,
  Reject,
  StartWrite,
  ContinueWrite,
  Abort,
}

/// Hardware side of the engine: one I2C controller talking to the tag.
pub trait Bus {
  /// Set the 7-bit select code used by the next start condition.
  fn set_target(&mut self, select: u8);
  /// Become transmitter and send a start condition.
  fn start(&mut self);
  fn write(&mut self, byte: u8);
  fn stop(&mut self);
  /// A stop condition was requested and has not been put on the bus yet.
  fn is_stopping(&mut self) -> bool;
  /// Read and acknowledge the pending interrupt source.
  fn poll_event(&mut self) -> Option<Event>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Framing {
  /// engine sends the write cursor as two address bytes ahead of the payload
  PrependAddress,
  /// the first two bytes of the buffer already are the target address
  PreFramed,
}

/// Bounded copy of the bytes one transaction puts on the bus.
#[derive(Debug, Clone)]
pub struct Frame {
  data: Vec<u8, U34>,
  framing: Framing,
}

impl Frame {
  pub fn new(bytes: &[u8], framing: Framing) -> Result<Self, Error> {
    let (min, max) = match framing {
      Framing::PrependAddress => (1, MAX_PAYLOAD),
      Framing::PreFramed => (ADDRESS_LEN + 1, TX_BUFFER_SIZE),
    };

    if bytes.len() < min {
      return Err(Error::EmptyPayload);
    }
    if bytes.len() > max {
      return Err(Error::PayloadTooLarge { len: bytes.len(), max });
    }

    let mut data = Vec::new();
    data.extend_from_slice(bytes).map_err(|_| Error::PayloadTooLarge { len: bytes.len(), max })?;

    Ok(Frame { data, framing })
  }

  pub fn framing(&self) -> Framing {
    self.framing
  }

  pub fn bytes(&self) -> &[u8] {
    &self.data
  }

  /// Bytes that end up in tag memory.
  pub fn payload_len(&self) -> usize {
    match self.framing {
      Framing::PrependAddress => self.data.len(),
      Framing::PreFramed => self.data.len() - ADDRESS_LEN,
    }
  }

  /// Bytes clocked out after the select code.
  pub fn wire_len(&self) -> usize {
    match self.framing {
      Framing::PrependAddress => self.data.len() + ADDRESS_LEN,
      Framing::PreFramed => self.data.len(),
    }
  }

  /// Address carried in the first two bytes of a pre-framed buffer.
  pub fn embedded_address(&self) -> Option<u16> {
    match self.framing {
      Framing::PreFramed => Some(u16::from_be_bytes([self.data[0], self.data[1]])),
      Framing::PrependAddress => None,
    }
  }
}
