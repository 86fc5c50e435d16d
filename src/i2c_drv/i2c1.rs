use stm32f4xx_hal::stm32::I2C1;

use crate::i2c_drv::{Bus, Event};

/// I2C1 of the STM32F4 driven from its event/error interrupts.
///
/// Expects the peripheral to be clocked, timed and enabled already (see
/// `board::configure_i2c1`). Only ITEVTEN and ITERREN are used, so one event
/// arrives per acknowledged byte (ADDR for the address, BTF after that).
pub struct I2c1Bus {
  i2c: I2C1,
  select: u8,
}

impl I2c1Bus {
  pub fn new(i2c: I2C1) -> Self {
    i2c.cr2.modify(|_, w| w.itevten().set_bit().iterren().set_bit().itbufen().clear_bit());

    I2c1Bus { i2c, select: 0 }
  }
}

impl Bus for I2c1Bus {
  fn set_target(&mut self, select: u8) {
    self.select = select;
  }

  fn start(&mut self) {
    self.i2c.cr1.modify(|_, w| w.start().set_bit());
  }

  fn write(&mut self, byte: u8) {
    self.i2c.dr.write(|w| unsafe { w.bits(u32::from(byte)) });
  }

  fn stop(&mut self) {
    self.i2c.cr1.modify(|_, w| w.stop().set_bit());
  }

  fn is_stopping(&mut self) -> bool {
    self.i2c.cr1.read().stop().bit_is_set()
  }

  fn poll_event(&mut self) -> Option<Event> {
    let sr1 = self.i2c.sr1.read();

    if sr1.af().bit_is_set() || sr1.berr().bit_is_set() || sr1.arlo().bit_is_set() {
      self.i2c.sr1.modify(|_, w| w.af().clear_bit().berr().clear_bit().arlo().clear_bit());
      Some(Event::NotAcknowledged)
    } else if sr1.sb().bit_is_set() {
      // writing the select code clears SB
      let addr = self.select << 1;
      self.write(addr);
      Some(Event::Ignore)
    } else if sr1.addr().bit_is_set() {
      // SR1 then SR2 read clears ADDR
      let _ = self.i2c.sr2.read();
      Some(Event::ByteRequested)
    } else if sr1.btf().bit_is_set() {
      Some(Event::ByteRequested)
    } else {
      None
    }
  }
}
