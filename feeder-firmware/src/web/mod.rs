// Web-Modul für den HTTP Server
// Rendert die Steuerseite und definiert das JSON-Statusformat

pub mod protocol;

use alloc::string::String;
use core::fmt::Write;

use feeder_core::types::{
    DEFAULT_BACK_MS, DEFAULT_FORWARD_MS, DEFAULT_ITERATIONS, DEFAULT_PAUSE_MS, DEFAULT_REST_MS,
};
use feeder_core::FeedParameters;

/// Erwartete Seitengröße, damit der String nicht mehrfach wächst
const PAGE_CAPACITY: usize = 2048;

/// Rendert die Hauptseite
///
/// - Während der Fütterung: Auto-Refresh jede Sekunde + "Cancel Feeding"
/// - Sonst: "Feed Now"
/// - Formular mit den aktuellen Parametern, "Reset to Defaults" füllt nur
///   das Formular (gespeichert wird erst mit "Update")
pub fn render_main_page(feeding: bool, params: &FeedParameters) -> String {
    let mut page = String::with_capacity(PAGE_CAPACITY);
    // write! auf String kann nicht fehlschlagen
    let _ = write_main_page(&mut page, feeding, params);
    page
}

fn write_main_page(out: &mut String, feeding: bool, params: &FeedParameters) -> core::fmt::Result {
    out.push_str("<!DOCTYPE html><html><head><title>Futterautomat</title>");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    if feeding {
        out.push_str("<meta http-equiv=\"refresh\" content=\"1\" />");
    }
    out.push_str("</head><body><h1>Futterautomat</h1>");

    if feeding {
        out.push_str("<p>Status: Feeding</p>");
        out.push_str("<button onclick=\"window.location.href = 'cancel';\">Cancel Feeding</button>");
    } else {
        out.push_str("<p>Status: Idle</p>");
        out.push_str("<button onclick=\"window.location.href = 'feed';\">Feed Now</button>");
    }

    out.push_str("<h2>Parameter Update</h2><form action=\"updateparams\" method=\"post\">");
    write_field(out, "forward", "Forward time (ms)", params.forward_ms)?;
    write_field(out, "back", "Backward time (ms)", params.back_ms)?;
    write_field(out, "pause", "Pause time (ms)", params.pause_ms)?;
    write_field(out, "rest", "Rest time (ms)", params.rest_ms)?;
    write_field(out, "iterations", "Number of iterations", params.iterations)?;
    out.push_str("<br><input type=\"submit\" value=\"Update\"></form>");

    out.push_str("<button onclick=\"loadDefaults();\">Reset to Defaults</button>");
    out.push_str("<script>function loadDefaults() {");
    for (id, value) in [
        ("forward", DEFAULT_FORWARD_MS),
        ("back", DEFAULT_BACK_MS),
        ("pause", DEFAULT_PAUSE_MS),
        ("rest", DEFAULT_REST_MS),
        ("iterations", DEFAULT_ITERATIONS),
    ] {
        write!(out, "document.getElementById(\"{}\").value = \"{}\";", id, value)?;
    }
    out.push_str("}</script></body></html>");
    Ok(())
}

fn write_field(out: &mut String, id: &str, label: &str, value: i32) -> core::fmt::Result {
    write!(
        out,
        "<label for=\"{id}\">{label}:</label><input type=\"number\" id=\"{id}\" name=\"{id}\" value=\"{value}\"><br>"
    )
}
