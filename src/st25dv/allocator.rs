use crate::config::WriteWindow;
use crate::util::debugger;

/// Next free address inside the write window.
#[derive(Debug)]
pub struct Allocator {
  window: WriteWindow,
  cursor: u16,
}

impl Allocator {
  pub fn new(window: WriteWindow) -> Self {
    Allocator { window, cursor: window.start() }
  }

  pub fn cursor(&self) -> u16 {
    self.cursor
  }

  pub fn window(&self) -> WriteWindow {
    self.window
  }

  /// Address the next `len` byte write goes to.
  ///
  /// Payloads are never split: one that would run past the end of the window
  /// is moved to the start of it instead. Callers check `len` against the
  /// window size first.
  pub fn next_address(&mut self, len: usize) -> u16 {
    if usize::from(self.cursor) + len > usize::from(self.window.end()) {
      debugger::print(format_args!(
        "wrapping write cursor {:#06x} -> {:#06x}\n",
        self.cursor,
        self.window.start()
      ));
      self.cursor = self.window.start();
    }
    self.cursor
  }

  /// Only called after the tag acknowledged all `len` bytes, at the address
  /// `next_address(len)` returned, so the cursor stays inside the window.
  pub fn advance(&mut self, len: usize) {
    debug_assert!(
      usize::from(self.cursor) + len <= usize::from(self.window.end()),
      "advance past the write window end"
    );
    self.cursor += len as u16;
  }

  pub fn reset(&mut self) {
    self.cursor = self.window.start();
  }
}
