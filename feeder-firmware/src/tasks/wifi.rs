// WiFi Tasks - Station-Verbindung, Netzwerk-Stack, DHCP
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// WiFi Connection Task
///
/// Hält die Station-Verbindung aufrecht. Die Fütterung läuft auch ohne
/// WLAN weiter, nur die Weboberfläche ist dann nicht erreichbar.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task for '{}'", WIFI_SSID);

    loop {
        if let Err(reason) = start_and_connect(&mut controller).await {
            error!("WiFi: {}, retrying in {}s", reason, WIFI_RETRY_DELAY_SECS);
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }

        info!("WiFi: Connected, waiting for disconnect event...");
        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Startet den Controller (falls nötig) und verbindet mit dem AP
async fn start_and_connect(controller: &mut WifiController<'static>) -> Result<(), &'static str> {
    if matches!(controller.is_started(), Ok(false)) {
        let client_config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(WIFI_SSID.into())
                .with_password(WIFI_PASSWORD.into()),
        );

        controller.set_config(&client_config).map_err(|e| {
            error!("WiFi: set_config: {}", Debug2Format(&e));
            "configuration failed"
        })?;

        controller.start_async().await.map_err(|e| {
            error!("WiFi: start: {}", Debug2Format(&e));
            "start failed"
        })?;

        info!("WiFi: Started");
    }

    controller.connect_async().await.map_err(|e| {
        error!("WiFi: connect: {}", Debug2Format(&e));
        "connection failed"
    })
}

/// Network Task - treibt den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis Link up ist UND DHCP eine IPv4-Adresse geliefert hat
///
/// Wird von DHCP-Monitor und mDNS genutzt.
pub async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// DHCP Monitor Task
///
/// Loggt die Netzwerk-Konfiguration sobald eine IP da ist, damit man die
/// Adresse der Weboberfläche im Log findet.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    wait_for_network(stack).await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  Web UI:  http://{}/", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}
