//! STM32F4 Discovery glue: I2C1 bring-up, sleeping, status LEDs.

use cortex_m::{asm, interrupt};
use stm32f4xx_hal::{
  prelude::*,
  gpio::{gpiob, gpiod, AlternateOD, Output, PushPull, AF4},
  i2c::I2c,
  rcc::Clocks,
  stm32::I2C1,
};

use crate::constants::I2C_FREQ;
use crate::i2c_drv::{i2c1::I2c1Bus, TransactionStatus};
use crate::st25dv::Suspend;

pub type Scl = gpiob::PB6<AlternateOD<AF4>>;
pub type Sda = gpiob::PB9<AlternateOD<AF4>>;

/// Clock, pins and timing of I2C1, then hand the raw peripheral to the
/// interrupt driven bus. PB6/PB9 carry the board's external pull-ups.
pub fn configure_i2c1(i2c: I2C1, scl: Scl, sda: Sda, clocks: Clocks) -> I2c1Bus {
  let i2c = I2c::i2c1(i2c, (scl, sda), (I2C_FREQ / 1_000).khz(), clocks);
  let (i2c, _pins) = i2c.release();
  I2c1Bus::new(i2c)
}

/// Sleeps with `wfi`. The check runs with interrupts masked so a terminal
/// event cannot land between the check and the sleep; `wfi` still wakes on
/// the pending interrupt.
pub struct Wfi;

impl Suspend for Wfi {
  fn suspend_while<F: FnMut() -> bool>(&mut self, mut pending: F) {
    loop {
      let parked = interrupt::free(|_| {
        let p = pending();
        if p {
          asm::wfi();
        }
        p
      });

      if !parked {
        break;
      }
    }
  }
}

/// Green toggles on every successful write, red on every failed one.
pub struct StatusLeds {
  ok: gpiod::PD12<Output<PushPull>>,
  fail: gpiod::PD14<Output<PushPull>>,
}

impl StatusLeds {
  pub fn new(ok: gpiod::PD12<Output<PushPull>>, fail: gpiod::PD14<Output<PushPull>>) -> Self {
    StatusLeds { ok, fail }
  }

  pub fn show(&mut self, status: TransactionStatus) {
    match status {
      TransactionStatus::Success => {
        self.ok.toggle().ok();
      }
      TransactionStatus::Nack => {
        self.fail.toggle().ok();
      }
      _ => (),
    }
  }
}
