use crate::constants;

pub const fn convert_us_to_cycles(us: u32) -> u32 {
  us * (constants::CPU_FREQ / 1_000_000)
}

/// Semihosting output, only when a debugger is attached.
pub mod debugger {
  use core::fmt;
  use core::sync::atomic::{AtomicBool, Ordering};

  static ENABLED: AtomicBool = AtomicBool::new(false);

  #[cfg(feature = "firmware")]
  pub fn init() {
    // DHCSR.C_DEBUGEN
    let addr = 0xE000EDF0usize;
    let r = addr as *const u32;
    if unsafe { core::ptr::read_volatile(r) & 1 } == 1 {
      ENABLED.store(true, Ordering::Relaxed);
    }
  }

  pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
  }

  pub fn print(args: fmt::Arguments) {
    if is_enabled() {
      emit(args);
    }
  }

  #[cfg(feature = "firmware")]
  fn emit(args: fmt::Arguments) {
    let _ = cortex_m_semihosting::hprint!("{}", args);
  }

  #[cfg(not(feature = "firmware"))]
  fn emit(_args: fmt::Arguments) {}
}
