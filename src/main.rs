//! Floker demo firmware — subscribe to a topic and mirror its changes.
//!
//! Minimal end-to-end wiring on an ESP32-family board:
//!
//! ```text
//! WiFi STA ──▶ EspHttpTransport ──▶ FlokerClient ──▶ callback (log)
//! ```
//!
//! Builds only with the `espidf` feature; credentials and server address
//! come from compile-time environment variables.

use anyhow::{Context, Result, anyhow};
use log::info;

use floker_client::adapters::http::EspHttpTransport;
use floker_client::adapters::time::MonotonicClock;
use floker_client::adapters::wifi;
use floker_client::client::Clock;
use floker_client::{ClientConfig, FlokerClient};

const WIFI_SSID: &str = env!("FLOKER_WIFI_SSID");
const WIFI_PASSWORD: &str = env!("FLOKER_WIFI_PASSWORD");
const SERVER_HOST: &str = env!("FLOKER_SERVER_HOST");
const TOKEN: &str = env!("FLOKER_TOKEN");
const DEVICE_PATH: &str = "demo-device";

/// Delay between poll cycles.
const CYCLE_DELAY_MS: u32 = 500;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Floker demo v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Network up ─────────────────────────────────────────
    let peripherals =
        esp_idf_hal::peripherals::Peripherals::take().context("peripherals already taken")?;
    let (_wifi, ip) = wifi::connect_station(peripherals.modem, WIFI_SSID, WIFI_PASSWORD)
        .map_err(|e| anyhow!("{e}"))?;

    // ── 3. Client wiring ──────────────────────────────────────
    let mut config = ClientConfig::new(SERVER_HOST, TOKEN);
    config.device_path = Some(String::from(DEVICE_PATH));

    let mut transport = EspHttpTransport::new(&config);
    let clock = MonotonicClock::new();

    let mut client = FlokerClient::new(config);
    client
        .enable_connection_polling(None)
        .map_err(|e| anyhow!("{e}"))?;
    client.set_device_ip(&ip);

    client.subscribe(
        "/power",
        Box::new(|state| info!("power changed to {state}")),
    );

    // ── 4. Poll loop ──────────────────────────────────────────
    loop {
        client.handle(&mut transport, &clock);
        clock.sleep_ms(CYCLE_DELAY_MS);
    }
}
