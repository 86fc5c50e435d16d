use crate::constants::ADDRESS_LEN;
use crate::i2c_drv::{
  Action,
  Bus,
  Event,
  Frame,
  Framing,
  Message,
  TransactionStatus,
};

/// Interrupt side of a transaction: pumps one byte per bus event.
///
/// Shared between the foreground and the bus interrupt through an
/// `rtic_core::Mutex`. The foreground only calls [`Engine::begin`] while the
/// bus is idle and only reads the status once it is terminal; everything in
/// between is driven from [`Engine::on_interrupt`].
pub struct Engine<B> {
  pub bus: B,
  state: State,
  frame: Option<Frame>,
  address: u16,
  status: TransactionStatus,
  bytes_transferred: usize,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum State {
  Idling,
  Writing,
}

impl State {
  pub fn next(self, msg: &Message) -> (State, Action) {
    match (self, msg) {
      (State::Idling, Message::Begin) => {
        (State::Writing, Action::StartWrite)
      }
      (State::Writing, Message::Event(Event::ByteRequested)) => {
        (State::Writing, Action::ContinueWrite)
      }
      (State::Writing, Message::Event(Event::NotAcknowledged)) => {
        (State::Idling, Action::Abort)
      }
      (State::Writing, Message::FinishTransaction) => {
        (State::Idling, Action::DoNothing)
      }
      (s, Message::Event(Event::Ignore)) => {
        (s, Action::DoNothing)
      }
      (s, _m) => {
        (s, Action::Reject)
      }
    }
  }
}

impl<B: Bus> Engine<B> {
  pub fn new(bus: B) -> Self {
    Engine {
      bus,
      state: State::Idling,
      frame: None,
      address: 0,
      status: TransactionStatus::None,
      bytes_transferred: 0,
    }
  }

  pub fn status(&self) -> TransactionStatus {
    self.status
  }

  /// No transaction in flight and the last stop condition is on the bus.
  pub fn is_idle(&mut self) -> bool {
    self.state == State::Idling && !self.bus.is_stopping()
  }

  /// Load `frame` and put a start condition on the bus for `select`.
  ///
  /// `address` is only sent when the frame asks for it. Returns `false` if a
  /// transaction is still in flight, nothing is touched in that case.
  pub fn begin(&mut self, select: u8, frame: Frame, address: u16) -> bool {
    let action;
    (self.state, action) = self.state.next(&Message::Begin);

    match action {
      Action::StartWrite => {
        self.frame = Some(frame);
        self.address = address;
        self.bytes_transferred = 0;
        self.status = TransactionStatus::Begin;

        self.bus.set_target(select);
        self.bus.start();
        true
      }
      _ => false,
    }
  }

  /// Interrupt entry point. Returns `true` exactly once per transaction, when
  /// it settles at `Success` or `Nack`, so the caller knows to wake the
  /// foreground.
  pub fn on_interrupt(&mut self) -> bool {
    match self.bus.poll_event() {
      Some(event) => self.handle(event),
      None => false,
    }
  }

  pub fn handle(&mut self, event: Event) -> bool {
    let action;
    (self.state, action) = self.state.next(&Message::Event(event));

    match action {
      Action::ContinueWrite => {
        if self.bytes_transferred >= self.wire_len() {
          // last byte acknowledged
          (self.state, ..) = self.state.next(&Message::FinishTransaction);
          self.bus.stop();
          self.bytes_transferred = 0;
          self.status = TransactionStatus::Success;
          true
        } else {
          let byte = self.byte_at(self.bytes_transferred);
          self.bus.write(byte);
          self.bytes_transferred += 1;
          self.status = TransactionStatus::InProgress;
          false
        }
      }
      Action::Abort => {
        self.bus.stop();
        self.bytes_transferred = 0;
        self.status = TransactionStatus::Nack;
        true
      }
      Action::StartWrite | Action::Reject | Action::DoNothing => false,
    }
  }

  fn wire_len(&self) -> usize {
    self.frame.as_ref().map_or(0, |f| f.wire_len())
  }

  fn byte_at(&self, idx: usize) -> u8 {
    let frame = match self.frame.as_ref() {
      Some(f) => f,
      None => return 0,
    };

    match frame.framing() {
      Framing::PrependAddress if idx < ADDRESS_LEN => self.address.to_be_bytes()[idx],
      Framing::PrependAddress => frame.bytes()[idx - ADDRESS_LEN],
      Framing::PreFramed => frame.bytes()[idx],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::vec::Vec;

  #[derive(Default)]
  struct Recorder {
    target: Option<u8>,
    starts: usize,
    stops: usize,
    written: Vec<u8>,
  }

  impl Bus for Recorder {
    fn set_target(&mut self, select: u8) {
      self.target = Some(select);
    }

    fn start(&mut self) {
      self.starts += 1;
    }

    fn write(&mut self, byte: u8) {
      self.written.push(byte);
    }

    fn stop(&mut self) {
      self.stops += 1;
    }

    fn is_stopping(&mut self) -> bool {
      false
    }

    fn poll_event(&mut self) -> Option<Event> {
      None
    }
  }

  fn engine() -> Engine<Recorder> {
    Engine::new(Recorder::default())
  }

  #[test]
  fn prepends_cursor_address_before_payload() {
    let mut e = engine();
    let frame = Frame::new(&[0xD0, 0xD1, 0xB2], Framing::PrependAddress).unwrap();
    assert!(e.begin(0x53, frame, 0x0124));
    assert_eq!(e.status(), TransactionStatus::Begin);
    assert_eq!(e.bus.target, Some(0x53));
    assert_eq!(e.bus.starts, 1);

    for _ in 0..5 {
      assert!(!e.handle(Event::ByteRequested));
      assert_eq!(e.status(), TransactionStatus::InProgress);
    }
    assert_eq!(e.bus.written, [0x01, 0x24, 0xD0, 0xD1, 0xB2]);
    assert_eq!(e.bus.stops, 0);

    assert!(e.handle(Event::ByteRequested));
    assert_eq!(e.status(), TransactionStatus::Success);
    assert_eq!(e.bus.stops, 1);
    assert!(e.is_idle());
  }

  #[test]
  fn pre_framed_bytes_go_out_untouched() {
    let mut e = engine();
    let frame = Frame::new(&[0x09, 0x00, 0x11], Framing::PreFramed).unwrap();
    assert!(e.begin(0x57, frame, 0xFFFF));

    while !e.handle(Event::ByteRequested) {}
    assert_eq!(e.bus.written, [0x09, 0x00, 0x11]);
    assert_eq!(e.status(), TransactionStatus::Success);
  }

  #[test]
  fn nack_aborts_mid_transaction() {
    let mut e = engine();
    let frame = Frame::new(&[1, 2, 3, 4], Framing::PrependAddress).unwrap();
    e.begin(0x53, frame, 0x0024);

    e.handle(Event::ByteRequested);
    e.handle(Event::ByteRequested);
    assert!(e.handle(Event::NotAcknowledged));
    assert_eq!(e.status(), TransactionStatus::Nack);
    assert_eq!(e.bus.stops, 1);
    assert_eq!(e.bus.written.len(), 2);

    // stray events after the abort change nothing and wake nobody
    assert!(!e.handle(Event::ByteRequested));
    assert!(!e.handle(Event::NotAcknowledged));
    assert_eq!(e.status(), TransactionStatus::Nack);
    assert_eq!(e.bus.written.len(), 2);
  }

  #[test]
  fn cursor_restarts_for_every_transaction() {
    let mut e = engine();
    let frame = Frame::new(&[0xAA, 0xBB], Framing::PrependAddress).unwrap();
    e.begin(0x53, frame.clone(), 0x0024);
    e.handle(Event::ByteRequested);
    e.handle(Event::NotAcknowledged);

    e.bus.written.clear();
    assert!(e.begin(0x53, frame, 0x0024));
    while !e.handle(Event::ByteRequested) {}
    assert_eq!(e.bus.written, [0x00, 0x24, 0xAA, 0xBB]);
  }

  #[test]
  fn begin_is_rejected_while_writing() {
    let mut e = engine();
    let frame = Frame::new(&[0xAA], Framing::PrependAddress).unwrap();
    assert!(e.begin(0x53, frame.clone(), 0x0024));
    assert!(!e.begin(0x57, frame, 0x0900));
    assert_eq!(e.bus.target, Some(0x53));
    assert_eq!(e.bus.starts, 1);
  }

  #[test]
  fn ignore_events_do_not_move_the_cursor() {
    let mut e = engine();
    let frame = Frame::new(&[0xAA], Framing::PrependAddress).unwrap();
    e.begin(0x53, frame, 0x0024);
    assert!(!e.handle(Event::Ignore));
    assert_eq!(e.status(), TransactionStatus::Begin);
    assert!(e.bus.written.is_empty());
  }
}
