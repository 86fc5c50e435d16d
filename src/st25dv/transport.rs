use rtic_core::Mutex;

use crate::config::Config;
use crate::constants::USER_MEMORY_SELECT;
use crate::error::Error;
use crate::i2c_drv::{Bus, Engine, Frame, Framing, TransactionStatus};
use crate::st25dv::allocator::Allocator;
use crate::st25dv::session::Session;
use crate::util::debugger;

/// One complete bus transaction, start to stop.
pub trait Link {
  /// Blocks until the tag acknowledged every byte of `frame` or rejected one
  /// of them. The result is always `Success` or `Nack`.
  fn transact(&mut self, select: u8, frame: &Frame, address: u16) -> TransactionStatus;
}

/// Parks the foreground until the bus interrupt had a chance to run.
pub trait Suspend {
  /// Sleep for as long as `pending` holds. `pending` must be evaluated and
  /// the sleep entered without an interrupt slipping in between, or a
  /// terminal event can be missed.
  fn suspend_while<F: FnMut() -> bool>(&mut self, pending: F);
}

/// Foreground handle on the engine shared with the bus interrupt.
pub struct Port<M, S> {
  engine: M,
  sleep: S,
}

impl<M, S> Port<M, S> {
  pub fn new(engine: M, sleep: S) -> Self {
    Port { engine, sleep }
  }
}

impl<M, B, S> Link for Port<M, S>
where
  M: Mutex<T = Engine<B>>,
  B: Bus,
  S: Suspend,
{
  fn transact(&mut self, select: u8, frame: &Frame, address: u16) -> TransactionStatus {
    // wait until the previous stop condition went out
    while !self.engine.lock(|e| e.is_idle()) {}

    if !self.engine.lock(|e| e.begin(select, frame.clone(), address)) {
      return TransactionStatus::Nack;
    }

    let engine = &mut self.engine;
    self.sleep.suspend_while(|| engine.lock(|e| !e.status().is_terminal()));

    self.engine.lock(|e| e.status())
  }
}

/// Entry point for writing records into the tag.
pub struct Transport<L> {
  link: L,
  config: Config,
  session: Session,
  allocator: Allocator,
}

impl<L: Link> Transport<L> {
  pub fn new(link: L, config: Config) -> Self {
    Transport {
      link,
      session: Session::new(&config.password),
      allocator: Allocator::new(config.window),
      config,
    }
  }

  pub fn retry_limit(&self) -> u8 {
    self.config.retry_limit()
  }

  pub fn set_retry_limit(&mut self, retries: u8) -> Result<(), Error> {
    self.config.set_retry_limit(retries)
  }

  pub fn session_open(&self) -> bool {
    self.session.is_open()
  }

  pub fn cursor(&self) -> u16 {
    self.allocator.cursor()
  }

  /// Forget the session and rewind the write cursor, e.g. after the bus has
  /// been reinitialized.
  pub fn reset(&mut self) {
    self.session.reset();
    self.allocator.reset();
  }

  /// Write `payload` into user memory.
  ///
  /// With [`Framing::PrependAddress`] the payload lands at the write cursor,
  /// which then moves past it. With [`Framing::PreFramed`] the first two
  /// bytes are the target address and the cursor is left alone.
  ///
  /// The security session is opened first if needed; a tag that refuses the
  /// password fails the call with `SessionNotOpen` before any memory write.
  pub fn send(&mut self, payload: &[u8], framing: Framing) -> Result<(), Error> {
    let frame = Frame::new(payload, framing)?;
    let len = frame.payload_len();

    if framing == Framing::PrependAddress && len > self.allocator.window().len() {
      return Err(Error::PayloadExceedsWindow { len, window: self.allocator.window().len() });
    }

    if !self.session.is_open() {
      let status = self.session.open(&mut self.link, self.config.retry_limit());
      if !status.is_success() {
        debugger::print(format_args!("giving up, security session closed\n"));
        return Err(Error::SessionNotOpen);
      }
    }

    let address = match frame.embedded_address() {
      Some(address) => address,
      None => self.allocator.next_address(len),
    };

    let retries = self.config.retry_limit();
    for attempt in 1..=retries {
      let status = self.link.transact(USER_MEMORY_SELECT, &frame, address);
      if status.is_success() {
        if framing == Framing::PrependAddress {
          self.allocator.advance(len);
        }
        return Ok(());
      }
      debugger::print(format_args!(
        "write to {:#06x} not acknowledged, attempt {}/{}\n",
        address, attempt, retries
      ));
    }

    debugger::print(format_args!("giving up on {:#06x} after {} attempts\n", address, retries));
    Err(Error::NotAcknowledged { attempts: retries })
  }
}
