//! One-shot hardware peripheral initialization and raw pin/UART access.
//!
//! Configures GPIO directions and the radio UART using raw ESP-IDF sys
//! calls.  Called once from `main()` before the drivers are built.  Host
//! builds get no-op fallbacks so the drivers above run unchanged in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::HalError;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartConfigFailed(i32),
    UartInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartConfigFailed(rc) => write!(f, "UART param/pin config failed (rc={})", rc),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any worker thread exists.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
    }
    info!("hw_init: GPIO configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::OUTPUT_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(i32::from(pin), 0) };
    }
    Ok(())
}

/// Drive an output configured by [`init_peripherals`].
#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: u8, high: bool) -> Result<(), HalError> {
    // SAFETY: gpio_set_level is a single register write to a pin that was
    // configured as an output at boot; each pin has one owning driver.
    let ret = unsafe { gpio_set_level(i32::from(pin), u32::from(high)) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(HalError::WriteFailed(pin)) }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: u8, _high: bool) -> Result<(), HalError> {
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: u8) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(i32::from(pin)) }) != 0
}

// ── Radio UART ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART_RX_BUF: i32 = 1024;

#[cfg(target_os = "espidf")]
pub fn init_radio_uart(baud: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: Called once from main() before the reader thread starts; the
    // driver owns its buffers after install.
    unsafe {
        let ret = uart_param_config(pins::RADIO_UART_PORT, &cfg);
        if ret != ESP_OK as i32 { return Err(HwInitError::UartConfigFailed(ret)); }

        let ret = uart_set_pin(
            pins::RADIO_UART_PORT,
            pins::RADIO_TX_GPIO,
            pins::RADIO_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        );
        if ret != ESP_OK as i32 { return Err(HwInitError::UartConfigFailed(ret)); }

        let ret = uart_driver_install(
            pins::RADIO_UART_PORT,
            UART_RX_BUF,
            0,
            0,
            core::ptr::null_mut(),
            0,
        );
        if ret != ESP_OK as i32 { return Err(HwInitError::UartInstallFailed(ret)); }
    }
    info!("hw_init: radio UART{} at {} baud", pins::RADIO_UART_PORT, baud);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_radio_uart(baud: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): radio UART skipped ({} baud)", baud);
    Ok(())
}

/// Blocking write.  Returns bytes queued, or the driver error code.
#[cfg(target_os = "espidf")]
pub fn uart_write(bytes: &[u8]) -> Result<usize, i32> {
    // SAFETY: the driver copies `bytes` into its TX path before returning.
    let n = unsafe { uart_write_bytes(pins::RADIO_UART_PORT, bytes.as_ptr().cast(), bytes.len()) };
    if n < 0 { Err(n) } else { Ok(n as usize) }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(bytes: &[u8]) -> Result<usize, i32> {
    Ok(bytes.len())
}

/// Read up to `buf.len()` bytes, waiting at most `timeout_ms` for the first.
#[cfg(target_os = "espidf")]
pub fn uart_read(buf: &mut [u8], timeout_ms: u32) -> Result<usize, i32> {
    let ticks = (timeout_ms * configTICK_RATE_HZ / 1000).max(1);
    // SAFETY: `buf` is valid for `buf.len()` bytes for the duration of the call.
    let n = unsafe { uart_read_bytes(pins::RADIO_UART_PORT, buf.as_mut_ptr().cast(), buf.len() as u32, ticks) };
    if n < 0 { Err(n) } else { Ok(n as usize) }
}

/// No radio in simulation: behaves like an idle line.
#[cfg(not(target_os = "espidf"))]
pub fn uart_read(_buf: &mut [u8], timeout_ms: u32) -> Result<usize, i32> {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(timeout_ms)));
    Ok(0)
}
