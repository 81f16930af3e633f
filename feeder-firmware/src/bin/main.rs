// Firmware-Einstieg des Futterautomaten
//
// Boot-Reihenfolge: Servo anhalten → Parameter aus Flash → Feeder-Task →
// WLAN/Netzwerk → HTTP + mDNS. Die Fütterung hängt nicht am Netzwerk.
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

extern crate alloc;

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Stack, StackResources};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::peripherals::{FLASH, GPIO4, LEDC, WIFI};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;
use static_cell::StaticCell;
use {esp_backtrace as _, esp_println as _};

use esp_futterautomat::config::{
    EXTRA_HEAP_SIZE, HTTP_TASK_POOL_SIZE, PARAMS_FLASH_OFFSET, SERVO_GPIO_PIN, SERVO_PWM_FREQ_HZ,
    WIFI_HEAP_SIZE,
};
use esp_futterautomat::hal::{EmbassyClock, FlashParameterStore, ServoAuger};
use esp_futterautomat::tasks::{
    connection_task, dhcp_task, feeder_task, http_server_task, mdns_responder_task, net_task,
};
use esp_futterautomat::{FeedController, SharedFeeder};
use feeder_core::ParamsOrigin;

/// HTTP-Listener + mDNS + DHCP + DNS
const NET_SOCKETS: usize = HTTP_TASK_POOL_SIZE + 3;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let software_interrupts =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, software_interrupts.software_interrupt0);

    info!("Futterautomat startet");

    let feeder = init_feeder(peripherals.LEDC, peripherals.GPIO4, peripherals.FLASH);
    spawner
        .spawn(feeder_task(feeder, peripherals.GPIO8, peripherals.RMT))
        .unwrap();

    let stack = init_network(&spawner, peripherals.WIFI);

    for task_id in 0..HTTP_TASK_POOL_SIZE {
        spawner
            .spawn(http_server_task(task_id, stack, feeder))
            .unwrap();
    }
    spawner.spawn(mdns_responder_task(stack)).unwrap();

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Baut den Controller auf und legt ihn in eine StaticCell
///
/// Das Servo wird vor allem anderen angehalten, damit die Schnecke nach
/// einem Reset nicht weiterläuft.
fn init_feeder(
    ledc: LEDC<'static>,
    servo_pin: GPIO4<'static>,
    flash: FLASH<'static>,
) -> &'static SharedFeeder {
    let auger = ServoAuger::new(ledc, servo_pin).expect("Failed to initialize servo");
    info!(
        "Servo: Stopped, {} Hz PWM on GPIO{}",
        SERVO_PWM_FREQ_HZ, SERVO_GPIO_PIN
    );
    let store = FlashParameterStore::new(FlashStorage::new(flash), PARAMS_FLASH_OFFSET);
    let controller = FeedController::new(auger, store, EmbassyClock);

    match controller.params_origin() {
        ParamsOrigin::Stored => info!("Feeder: Parameters loaded from flash"),
        ParamsOrigin::Defaults { persisted: true } => {
            info!("Feeder: No valid parameters in flash, defaults written")
        }
        ParamsOrigin::Defaults { persisted: false } => {
            warn!("Feeder: No valid parameters in flash, writing defaults failed")
        }
    }
    info!("Feeder: {}", controller.parameters());

    static FEEDER: StaticCell<SharedFeeder> = StaticCell::new();
    FEEDER.init(Mutex::new(RefCell::new(controller)))
}

/// Startet WLAN (Station + DHCP) und liefert den Netzwerk-Stack
fn init_network(spawner: &Spawner, wifi: WIFI<'static>) -> &'static Stack<'static> {
    static RADIO: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio = RADIO.init(esp_radio::init().expect("Failed to initialize radio"));

    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, Default::default()).expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = u64::from(rng.random()) << 32 | u64::from(rng.random());

    static RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack: &'static Stack<'static> = STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    stack
}
