// Task-Modul: Enthält alle Embassy Tasks
//
// Der Feeder-Task pollt den Zustandsautomaten, die HTTP-Tasks rufen
// start/cancel/update auf. Beide teilen sich den Controller über
// `SharedFeeder` (siehe lib.rs).

pub mod feeder;
pub mod http;
pub mod mdns;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use feeder::feeder_task;
pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use wifi::{connection_task, dhcp_task, net_task};
