//! AlertNode Firmware: main entry point
//!
//! Hexagonal architecture with a polled control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PinBank<RawGpio>   Hd44780<RawGpio>   SerialTextRadio<Uart>    │
//! │  (OutputBank)       (DisplayPort)      (RadioPort + reader)    │
//! │  LogEventSink       UptimeClock                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   AlertService: AlertState · Indicators · Display      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Control loop: EventQueue drain · AckTrigger · redisplay timer │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{info, warn};

use alertnode::adapters::log_sink::LogEventSink;
use alertnode::adapters::pin_bank::{PinBank, RawGpio};
use alertnode::adapters::radio::{self, SerialTextRadio, Uart};
use alertnode::adapters::time::UptimeClock;
use alertnode::app::ack::AckTrigger;
use alertnode::app::deferred::DeferredRedisplay;
use alertnode::app::ports::OutputBank;
use alertnode::app::service::AlertService;
use alertnode::config::NodeConfig;
use alertnode::drivers::display::DisplayController;
use alertnode::drivers::indicator::IndicatorDriver;
use alertnode::drivers::lcd::Hd44780;
use alertnode::drivers::{button, hw_init};
use alertnode::events::{EventQueue, NodeEvent};
use alertnode::pins;

/// How long the startup and connected screens stay up.
const SPLASH_HOLD: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AlertNode v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (baked at build time, or defaults) ──────────
    let config = load_config();

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    let mut lcd = Hd44780::new(
        RawGpio(pins::LCD_RS_GPIO),
        RawGpio(pins::LCD_E_GPIO),
        [
            RawGpio(pins::LCD_D4_GPIO),
            RawGpio(pins::LCD_D5_GPIO),
            RawGpio(pins::LCD_D6_GPIO),
            RawGpio(pins::LCD_D7_GPIO),
        ],
        esp_idf_hal::delay::Ets,
    );
    if let Err(e) = lcd.init() {
        warn!("LCD init failed ({}), continuing without display", e);
    }

    let bank: Arc<dyn OutputBank> = Arc::new(PinBank::gpio(config.indicators.iter().map(|c| c.pin)));
    let indicators = IndicatorDriver::new(bank, &config);
    indicators.self_test();

    // ── 4. App service ────────────────────────────────────────
    let service = AlertService::new(&config, indicators, DisplayController::new(Box::new(lcd), &config));
    service.show_startup();
    thread::sleep(SPLASH_HOLD);

    // ── 5. Radio link ─────────────────────────────────────────
    if let Err(e) = hw_init::init_radio_uart(config.uart_baud) {
        service.show_error("Connection fail");
        return Err(e.into());
    }
    let queue = Arc::new(EventQueue::new());
    let _reader = radio::spawn_reader(Uart, Arc::clone(&queue))?;
    let mut radio = SerialTextRadio::new(Uart);

    service.show_connected();
    thread::sleep(SPLASH_HOLD);

    let mut sink = LogEventSink::new();
    service.start(&mut sink);

    // ── 6. Control loop ───────────────────────────────────────
    let clock = UptimeClock::new();
    let mut ack = AckTrigger::new(&config);
    let mut redisplay = DeferredRedisplay::new();

    info!("System ready. Entering control loop.");

    loop {
        queue.drain(|event| match event {
            NodeEvent::Packet(packet) => {
                let follow_up = service.on_packet(&packet, &mut sink);
                redisplay.apply(follow_up, Instant::now());
            }
            NodeEvent::RadioDown => service.show_error("Radio link lost"),
        });

        let follow_up = ack.poll(
            button::is_pressed_hw(),
            clock.uptime_ms(),
            &service,
            &mut radio,
            &mut sink,
        );
        redisplay.apply(follow_up, Instant::now());

        if redisplay.take_due(Instant::now()) {
            service.redisplay();
        }

        thread::sleep(config.loop_tick());
    }
}

fn load_config() -> NodeConfig {
    let Some(json) = option_env!("ALERTNODE_CONFIG_JSON") else {
        info!("Config: none baked in, using defaults");
        return NodeConfig::default();
    };
    match NodeConfig::from_json(json) {
        Ok(config) => {
            info!("Config: loaded baked document for '{}'", config.node_name);
            config
        }
        Err(e) => {
            warn!("Config: baked document rejected ({}), using defaults", e);
            NodeConfig::default()
        }
    }
}
