// board
pub const CPU_FREQ: u32 = 168_000_000;
pub const I2C_FREQ: u32 = 100_000;

/// 7-bit select code for the tag's user memory (E2 = 0).
pub const USER_MEMORY_SELECT: u8 = 0b101_0011;

/// 7-bit select code for the tag's system area, where the I2C password is presented (E2 = 1).
pub const SECURITY_SESSION_SELECT: u8 = 0b101_0111;

// writable window inside user memory, the cursor never moves past the end
pub const WINDOW_START: u16 = 0x0024;
pub const WINDOW_END: u16 = 0x00FF;

pub const PASSWORD_ADDRESS: u16 = 0x0900;
pub const PASSWORD_LEN: usize = 8;
// factory default I2C password
pub const DEFAULT_PASSWORD: [u8; PASSWORD_LEN] = [0x00; PASSWORD_LEN];

/// 2 address bytes + password + address MSB marker + password
pub const SESSION_MESSAGE_LEN: usize = 2 + PASSWORD_LEN + 1 + PASSWORD_LEN;

pub const DEFAULT_RETRY_LIMIT: u8 = 3;

pub const ADDRESS_LEN: usize = 2;
pub const MAX_PAYLOAD: usize = 32;
pub const TX_BUFFER_SIZE: usize = MAX_PAYLOAD + ADDRESS_LEN;
