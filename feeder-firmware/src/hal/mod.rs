// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul enthält die echten Implementierungen der Traits aus
// feeder-core (Aktor, Speicher, Uhr, Status-LED).

pub mod clock;
pub mod flash_store;
pub mod led_writer;
pub mod servo;

pub use clock::EmbassyClock;
pub use flash_store::FlashParameterStore;
pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter};
pub use servo::{ServoAuger, ServoError};
