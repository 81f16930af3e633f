// HTTP Server Task - Steuerseite, Start/Abbruch, Parameter-Update
use alloc::string::String;
use defmt::{info, warn};
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::extract::Form;
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Redirect, Response, StatusCode};
use picoserve::routing::{get, post};

use crate::config::*;
use crate::web::{protocol::StatusMessage, render_main_page};
use crate::{ParameterUpdate, SharedFeeder, StorageError, UpdateOutcome, with_feeder};

/// Antwort auf POST /updateparams
///
/// Erfolg und "nichts geändert" leiten auf / um. Ein Speicherfehler wird
/// als Text gemeldet, statt so zu tun als wäre alles gut.
enum UpdateResponse {
    Redirect,
    Failed(StorageError),
}

impl IntoResponse for UpdateResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            UpdateResponse::Redirect => {
                Redirect::to("/")
                    .write_to(connection, response_writer)
                    .await
            }
            UpdateResponse::Failed(e) => {
                let body = match e {
                    StorageError::ReadFailed => "Update failed: flash read-back failed",
                    StorageError::WriteFailed => "Update failed: flash write failed",
                    StorageError::VerifyFailed => "Update failed: flash verify failed",
                };
                Response::new(StatusCode::new(500), body)
                    .with_header("Content-Type", "text/plain")
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}

/// HTTP Server Task - läuft parallel zum Feeder-Task
///
/// Routen:
/// - `GET /` - Status + Parameter-Formular
/// - `GET /feed` - Fütterung starten, Redirect auf /
/// - `GET /cancel` - Fütterung abbrechen, Redirect auf /
/// - `POST /updateparams` - Parameter übernehmen (fehlende Felder bleiben)
/// - `GET /status` - JSON-Status
/// - alles andere: 404 (picoserve Default)
///
/// **Task Pool:** Wird `HTTP_TASK_POOL_SIZE`x gespawnt, damit ein hängender
/// Client die Seite nicht blockiert.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `feeder`: geteilter Controller
#[embassy_executor::task(pool_size = HTTP_TASK_POOL_SIZE)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    feeder: &'static SharedFeeder,
) {
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(move || serve_main_page(feeder)))
        .route(
            "/feed",
            get(move || async move {
                info!("HTTP: Feeding initiated");
                with_feeder(feeder, |f| f.start_feeding());
                Redirect::to("/")
            }),
        )
        .route(
            "/cancel",
            get(move || async move {
                info!("HTTP: Feeding cancelled");
                with_feeder(feeder, |f| f.cancel_feeding());
                Redirect::to("/")
            }),
        )
        .route(
            "/updateparams",
            post(move |Form(update): Form<ParameterUpdate>| async move {
                update_parameters(feeder, update)
            }),
        )
        .route("/status", get(move || serve_status(feeder)));

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die HTML-Hauptseite mit aktuellem Zustand
async fn serve_main_page(feeder: &'static SharedFeeder) -> impl IntoResponse {
    let (feeding, params) = with_feeder(feeder, |f| (f.is_feeding(), f.parameters()));
    Response::new(StatusCode::OK, render_main_page(feeding, &params))
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Serviert den Status als JSON
async fn serve_status(feeder: &'static SharedFeeder) -> impl IntoResponse {
    let status = with_feeder(feeder, |f| StatusMessage::from_controller(f));

    let mut json_buffer = [0u8; JSON_STATUS_BUFFER_SIZE];
    let (code, body) = match serde_json_core::to_slice(&status, &mut json_buffer) {
        Ok(n) => (
            StatusCode::OK,
            String::from_utf8_lossy(&json_buffer[..n]).into_owned(),
        ),
        Err(_) => {
            warn!("HTTP: Status JSON does not fit into buffer");
            (StatusCode::new(500), String::from("{}"))
        }
    };

    Response::new(code, body).with_header("Content-Type", "application/json")
}

/// Übernimmt das Formular in den Controller
fn update_parameters(feeder: &'static SharedFeeder, update: ParameterUpdate) -> UpdateResponse {
    info!("HTTP: Updating parameters");

    match with_feeder(feeder, |f| f.apply_update(&update)) {
        Ok(UpdateOutcome::Applied) => {
            let params = with_feeder(feeder, |f| f.parameters());
            info!("HTTP: Parameter update success: {}", params);
            UpdateResponse::Redirect
        }
        Ok(UpdateOutcome::Unchanged) => {
            info!("HTTP: No parameters changed");
            UpdateResponse::Redirect
        }
        Err(e) => {
            warn!("HTTP: Parameter update failed: {}", e);
            UpdateResponse::Failed(e)
        }
    }
}
