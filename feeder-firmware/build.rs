// Build-Script für den Futterautomaten
// WLAN-Zugangsdaten aus .env einbacken, Linker-Skripte für ESP32-C6 setzen

fn main() {
    // .env ist optional, ohne Datei müssen die Variablen in der Umgebung stehen
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=.env nicht geladen ({e}), erwarte WIFI_SSID/WIFI_PASSWORD aus der Umgebung");
    }

    for key in ["WIFI_SSID", "WIFI_PASSWORD"] {
        println!("cargo:rerun-if-env-changed={key}");
        match std::env::var(key) {
            Ok(value) => println!("cargo:rustc-env={key}={value}"),
            Err(_) => println!("cargo:warning={key} fehlt, config.rs wird nicht kompilieren"),
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_be_nice();

    // defmt.x vor linkall.x, linkall.x muss zuletzt kommen
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Linker ruft dieses Build-Script als `--error-handling-script` erneut auf
///
/// Übersetzt typische Link-Fehler in einen lesbaren Hinweis.
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        if args[1] != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = undefined_symbol_hint(&args[2]) {
            eprintln!();
            eprintln!("💡 {hint}");
            eprintln!();
        }
        std::process::exit(0);
    }

    match std::env::current_exe() {
        Ok(exe) => println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        ),
        Err(e) => println!("cargo:warning=Linker-Hinweise deaktiviert: {e}"),
    }
}

fn undefined_symbol_hint(symbol: &str) -> Option<&'static str> {
    const HEAP_SYMBOLS: [&str; 8] = [
        "free",
        "malloc",
        "calloc",
        "get_free_internal_heap_size",
        "malloc_internal",
        "realloc_internal",
        "calloc_internal",
        "free_internal",
    ];

    if symbol.starts_with("_defmt_") {
        Some("defmt-Symbole fehlen: ist `-Tdefmt.x` gesetzt und `esp_println` mit Feature `defmt-espflash` eingebunden?")
    } else if symbol == "_stack_start" {
        Some("Linker-Skript `linkall.x` fehlt")
    } else if symbol.starts_with("esp_rtos_") {
        Some("esp-radio findet keinen Scheduler: wurde `esp_rtos::start` aufgerufen?")
    } else if HEAP_SYMBOLS.contains(&symbol) {
        Some("Heap-Symbole fehlen: `esp-alloc` als Dependency eingetragen?")
    } else {
        None
    }
}
