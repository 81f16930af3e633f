// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Die Fütterungs-Zeiten stehen NICHT hier, sondern im Flash
// (Defaults siehe feeder_core::types).

// ============================================================================
// Servo / Schnecke
// ============================================================================

/// GPIO-Pin für das Servo-Signal (im Code: peripherals.GPIO4)
pub const SERVO_GPIO_PIN: u8 = 4;

/// Servo-Winkel für "Stopp" (360°-Servo: Mittelstellung = Stillstand)
pub const SERVO_STOP_ANGLE: u8 = 90;

/// Servo-Winkel für "vorwärts" (Futter fördern)
pub const SERVO_FORWARD_ANGLE: u8 = 0;

/// Servo-Winkel für "rückwärts" (Verstopfung lösen)
pub const SERVO_BACK_ANGLE: u8 = 180;

/// PWM-Frequenz für Servos in Hz
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// PWM-Periode in µs (1 / 50 Hz)
pub const SERVO_PERIOD_US: u32 = 20_000;

/// Pulsbreite bei 0° in µs
pub const SERVO_MIN_PULSE_US: u32 = 500;

/// Pulsbreite bei 180° in µs
pub const SERVO_MAX_PULSE_US: u32 = 2_500;

/// LEDC Duty-Auflösung in Bit (muss zu `Duty::Duty14Bit` passen)
pub const SERVO_DUTY_BITS: u8 = 14;

// ============================================================================
// Fütterungs-Task
// ============================================================================

/// Poll-Intervall des Zustandsautomaten in ms
/// Muss deutlich kleiner sein als die kürzeste Phase
pub const FEEDER_POLL_INTERVAL_MS: u64 = 10;

// ============================================================================
// Status-LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel, im Code: peripherals.GPIO8)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// Flash Konfiguration
// ============================================================================

/// Flash-Offset des Parameter-Blobs
/// 0x9000 = Standard-NVS-Partition, wird von dieser Firmware nicht anderweitig genutzt
pub const PARAMS_FLASH_OFFSET: u32 = 0x9000;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch in Sekunden
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
/// Auch für die gerenderte HTML-Seite
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
/// Der Futterautomat ist erreichbar unter: feeder.local
pub const MDNS_HOSTNAME: &str = "feeder";

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (RFC 6762)
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse (224.0.0.251)
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes
/// 1500 Bytes = Standard MTU für Ethernet/WiFi
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port
pub const HTTP_PORT: u16 = 80;

/// Anzahl paralleler HTTP-Server-Tasks
pub const HTTP_TASK_POOL_SIZE: usize = 2;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Formular-Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// JSON Serialisierungs-Buffer für GET /status
/// {"feeding":true,"phase":"forward_pause","iteration":4,"params":{...}}
pub const JSON_STATUS_BUFFER_SIZE: usize = 256;
