#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use st25dv_link::{Bus, Config, Engine, Event, Port, Suspend, Transport};

/// How the simulated tag answers one transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
  Ack,
  /// select code not acknowledged
  NackAddress,
  /// the n-th data byte is not acknowledged
  NackByte(usize),
}

/// Replies consumed one per transaction, `fallback` once the queue is empty.
#[derive(Debug, Clone)]
pub struct Script {
  replies: VecDeque<Reply>,
  fallback: Reply,
}

impl Script {
  pub fn always(reply: Reply) -> Self {
    Script { replies: VecDeque::new(), fallback: reply }
  }

  pub fn then(replies: &[Reply], fallback: Reply) -> Self {
    Script { replies: replies.iter().copied().collect(), fallback }
  }

  fn next(&mut self) -> Reply {
    self.replies.pop_front().unwrap_or(self.fallback)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Txn {
  pub select: u8,
  pub bytes: Vec<u8>,
  pub reply: Reply,
}

/// ST25DV stand-in on the bus: records every byte, answers per script.
pub struct SimTag {
  pub log: Vec<Txn>,
  session: Script,
  memory: Script,
  target: u8,
  events: VecDeque<Event>,
  /// polls a stop condition stays pending for
  pub stop_delay: usize,
  stop_pending: usize,
  pub stops: usize,
  /// `is_stopping` calls that saw the bus still busy
  pub busy_polls: usize,
}

impl SimTag {
  pub fn new(session: Script, memory: Script) -> Self {
    SimTag {
      log: Vec::new(),
      session,
      memory,
      target: 0,
      events: VecDeque::new(),
      stop_delay: 1,
      stop_pending: 0,
      stops: 0,
      busy_polls: 0,
    }
  }

  pub fn has_event(&self) -> bool {
    !self.events.is_empty()
  }

  pub fn transactions(&self, select: u8) -> Vec<&Txn> {
    self.log.iter().filter(|t| t.select == select).collect()
  }
}

impl Bus for SimTag {
  fn set_target(&mut self, select: u8) {
    self.target = select;
  }

  fn start(&mut self) {
    assert_eq!(self.stop_pending, 0, "start condition while the previous stop is still pending");
    let reply = match self.target {
      0x57 => self.session.next(),
      _ => self.memory.next(),
    };
    self.log.push(Txn { select: self.target, bytes: Vec::new(), reply });

    match reply {
      Reply::NackAddress => self.events.push_back(Event::NotAcknowledged),
      _ => {
        // SB, then ADDR acknowledged
        self.events.push_back(Event::Ignore);
        self.events.push_back(Event::ByteRequested);
      }
    }
  }

  fn write(&mut self, byte: u8) {
    let txn = self.log.last_mut().expect("write outside a transaction");
    txn.bytes.push(byte);

    match txn.reply {
      Reply::NackByte(n) if txn.bytes.len() == n + 1 => self.events.push_back(Event::NotAcknowledged),
      _ => self.events.push_back(Event::ByteRequested),
    }
  }

  fn stop(&mut self) {
    self.stop_pending = self.stop_delay;
    self.stops += 1;
  }

  fn is_stopping(&mut self) -> bool {
    if self.stop_pending > 0 {
      self.stop_pending -= 1;
      self.busy_polls += 1;
      true
    } else {
      false
    }
  }

  fn poll_event(&mut self) -> Option<Event> {
    self.events.pop_front()
  }
}

pub type SharedEngine = Rc<RefCell<Engine<SimTag>>>;

/// Foreground side of the engine, like an RTIC resource proxy.
pub struct Shared(pub SharedEngine);

impl rtic_core::Mutex for Shared {
  type T = Engine<SimTag>;

  fn lock<R>(&mut self, f: impl FnOnce(&mut Self::T) -> R) -> R {
    f(&mut self.0.borrow_mut())
  }
}

/// Runs the bus interrupt while the foreground sleeps.
pub struct Isr {
  engine: SharedEngine,
  pub wakes: Rc<Cell<usize>>,
}

impl Suspend for Isr {
  fn suspend_while<F: FnMut() -> bool>(&mut self, mut pending: F) {
    while pending() {
      let mut engine = self.engine.borrow_mut();
      assert!(engine.bus.has_event(), "bus stalled, no interrupt pending");
      if engine.on_interrupt() {
        self.wakes.set(self.wakes.get() + 1);
      }
    }
  }
}

pub struct Rig {
  pub transport: Transport<Port<Shared, Isr>>,
  pub engine: SharedEngine,
  pub wakes: Rc<Cell<usize>>,
}

impl Rig {
  pub fn new(session: Script, memory: Script, config: Config) -> Self {
    let engine = Rc::new(RefCell::new(Engine::new(SimTag::new(session, memory))));
    let wakes = Rc::new(Cell::new(0));
    let isr = Isr { engine: engine.clone(), wakes: wakes.clone() };
    let transport = Transport::new(Port::new(Shared(engine.clone()), isr), config);

    Rig { transport, engine, wakes }
  }

  /// Tag that acknowledges everything.
  pub fn happy() -> Self {
    Rig::new(Script::always(Reply::Ack), Script::always(Reply::Ack), Config::default())
  }

  pub fn session_txns(&self) -> Vec<Txn> {
    self.engine.borrow().bus.transactions(0x57).into_iter().cloned().collect()
  }

  pub fn memory_txns(&self) -> Vec<Txn> {
    self.engine.borrow().bus.transactions(0x53).into_iter().cloned().collect()
  }

  pub fn all_txns(&self) -> Vec<Txn> {
    self.engine.borrow().bus.log.clone()
  }
}
