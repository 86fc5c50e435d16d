use crate::config::Password;
use crate::constants::{PASSWORD_ADDRESS, SECURITY_SESSION_SELECT, SESSION_MESSAGE_LEN};
use crate::i2c_drv::{Frame, Framing, TransactionStatus};
use crate::st25dv::transport::Link;
use crate::util::debugger;

/// I2C security session of the tag. User memory only accepts writes while it
/// is open.
pub struct Session {
  open: bool,
  frame: Frame,
}

/// Present-password message: password address, password, address MSB as a
/// validation code, password again.
pub fn present_password_message(password: &Password) -> [u8; SESSION_MESSAGE_LEN] {
  let [msb, lsb] = PASSWORD_ADDRESS.to_be_bytes();
  let pwd = &password.0;

  let mut msg = [0u8; SESSION_MESSAGE_LEN];
  msg[0] = msb;
  msg[1] = lsb;
  msg[2..2 + pwd.len()].copy_from_slice(pwd);
  msg[2 + pwd.len()] = msb;
  msg[3 + pwd.len()..].copy_from_slice(pwd);
  msg
}

impl Session {
  pub fn new(password: &Password) -> Self {
    let msg = present_password_message(password);
    Session {
      open: false,
      // 19 bytes always fit the transmit buffer
      frame: match Frame::new(&msg, Framing::PreFramed) {
        Ok(frame) => frame,
        Err(_) => unreachable!(),
      },
    }
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn reset(&mut self) {
    self.open = false;
  }

  pub fn frame(&self) -> &Frame {
    &self.frame
  }

  /// Present the password, up to `retries` times.
  ///
  /// The session only counts as open if this returns `Success`.
  pub fn open<L: Link>(&mut self, link: &mut L, retries: u8) -> TransactionStatus {
    let mut status = TransactionStatus::None;

    for attempt in 1..=retries {
      status = link.transact(SECURITY_SESSION_SELECT, &self.frame, PASSWORD_ADDRESS);
      if status.is_success() {
        self.open = true;
        debugger::print(format_args!("security session open after {} attempt(s)\n", attempt));
        return status;
      }
      debugger::print(format_args!("password rejected, attempt {}/{}\n", attempt, retries));
    }

    status
  }
}
