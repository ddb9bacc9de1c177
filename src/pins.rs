//! GPIO / peripheral pin assignments for the AlertNode board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Alert indicator LEDs (active HIGH, 330 Ω series)
// ---------------------------------------------------------------------------

/// D1: fire.
pub const LED_D1_GPIO: u8 = 4;
/// D2: flood.
pub const LED_D2_GPIO: u8 = 5;
/// D3: medical.
pub const LED_D3_GPIO: u8 = 6;
/// D4: hazmat.
pub const LED_D4_GPIO: u8 = 7;

/// Outputs an indicator channel may be mapped to.
pub const LED_GPIOS: [u8; 4] = [LED_D1_GPIO, LED_D2_GPIO, LED_D3_GPIO, LED_D4_GPIO];

// ---------------------------------------------------------------------------
// HD44780 16x2 LCD, 4-bit parallel mode (R/W tied to GND)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: u8 = 8;
pub const LCD_E_GPIO: u8 = 9;
pub const LCD_D4_GPIO: u8 = 10;
pub const LCD_D5_GPIO: u8 = 11;
pub const LCD_D6_GPIO: u8 = 12;
pub const LCD_D7_GPIO: u8 = 13;

// ---------------------------------------------------------------------------
// Acknowledge button (active-low, external 10 kΩ pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_GPIO: u8 = 14;

// ---------------------------------------------------------------------------
// UART1 link to the mesh radio (Meshtastic serial module, TEXTMSG mode)
// ---------------------------------------------------------------------------

pub const RADIO_UART_PORT: i32 = 1;
pub const RADIO_TX_GPIO: i32 = 17;
pub const RADIO_RX_GPIO: i32 = 18;

/// Every output the firmware drives, configured once at boot.
pub const OUTPUT_GPIOS: [u8; 10] = [
    LED_D1_GPIO,
    LED_D2_GPIO,
    LED_D3_GPIO,
    LED_D4_GPIO,
    LCD_RS_GPIO,
    LCD_E_GPIO,
    LCD_D4_GPIO,
    LCD_D5_GPIO,
    LCD_D6_GPIO,
    LCD_D7_GPIO,
];
