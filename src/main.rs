#![no_main]
#![no_std]

use panic_semihosting as _;

// every record goes to the tag with the write cursor prepended
const NODE_ID: u8 = 1;
const MESSAGE_PERIOD_US: u32 = 3_000_000;
const MAX_MESSAGES: usize = 6;

#[rtic::app(device = stm32f4xx_hal::stm32, peripherals = true)]
mod app {
  use cortex_m::asm;
  use rtic::Mutex;
  use stm32f4xx_hal::prelude::*;

  use st25dv_link::{
    board::{self, StatusLeds, Wfi},
    i2c_drv::i2c1::I2c1Bus,
    util::{self, debugger},
    Config,
    Engine,
    Framing,
    Port,
    TransactionStatus,
    Transport,
  };

  use super::{MAX_MESSAGES, MESSAGE_PERIOD_US, NODE_ID};

  #[resources]
  struct Resources {
    engine: Engine<I2c1Bus>,
    leds: StatusLeds,
  }

  #[init]
  fn init(cx: init::Context) -> init::LateResources {
    debugger::init();
    debugger::print(format_args!("init\n"));

    // device specific peripherals
    let device = cx.device;

    let rcc = device.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(168.mhz()).freeze();

    let gpiob = device.GPIOB.split();
    let gpiod = device.GPIOD.split();

    let scl = gpiob.pb6.into_alternate_af4().set_open_drain();
    let sda = gpiob.pb9.into_alternate_af4().set_open_drain();
    let bus = board::configure_i2c1(device.I2C1, scl, sda, clocks);

    let leds = StatusLeds::new(
      gpiod.pd12.into_push_pull_output(),
      gpiod.pd14.into_push_pull_output(),
    );

    init::LateResources {
      engine: Engine::new(bus),
      leds,
    }
  }

  #[idle(resources = [engine, leds])]
  fn idle(cx: idle::Context) -> ! {
    let mut leds = cx.resources.leds;
    let mut transport = Transport::new(Port::new(cx.resources.engine, Wfi), Config::default());

    let record = [NODE_ID, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xEF, 0xDD, 0x03];
    let mut messages = 0;

    while messages < MAX_MESSAGES {
      asm::delay(util::convert_us_to_cycles(MESSAGE_PERIOD_US));

      let status = match transport.send(&record, Framing::PrependAddress) {
        Ok(()) => TransactionStatus::Success,
        Err(e) => {
          debugger::print(format_args!("send failed: {}\n", e));
          TransactionStatus::Nack
        }
      };
      leds.lock(|leds| leds.show(status));
      messages += 1;
    }

    loop {
      // sleep while waiting for next event
      asm::wfi();
    }
  }

  #[task(binds = I2C1_EV, priority = 2, resources = [engine])]
  fn i2c1_ev(mut cx: i2c1_ev::Context) {
    // no explicit wake needed, wfi in idle returns on any interrupt and rechecks the status
    cx.resources.engine.lock(|engine| {
      engine.on_interrupt();
    });
  }

  #[task(binds = I2C1_ER, priority = 2, resources = [engine])]
  fn i2c1_er(mut cx: i2c1_er::Context) {
    // no explicit wake needed, wfi in idle returns on any interrupt and rechecks the status
    cx.resources.engine.lock(|engine| {
      engine.on_interrupt();
    });
  }
}
