/// qr-damage-net server
///
/// Single-endpoint web service for QR damage classification, served by a
/// synchronous tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin server --release
/// Then open http://127.0.0.1:5000
///
/// Configuration (environment):
///   QR_MODEL - checkpoint path (default: model/qr_damage_net.json)
///   QR_ADDR  - bind address    (default: 127.0.0.1:5000)

mod routes;
mod handlers;
mod util;

use std::sync::Arc;
use tiny_http::Server;

use env_logger::Env;
use qr_damage_net::QrDamagePredictor;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let model_path = std::env::var("QR_MODEL")
        .unwrap_or_else(|_| "model/qr_damage_net.json".to_owned());
    let addr = std::env::var("QR_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());

    // The checkpoint is loaded before the accept loop, so no request is ever
    // served by a half-initialized predictor.
    let predictor = match QrDamagePredictor::load(&model_path) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            log::error!("cannot start: {}", e);
            log::error!(
                "hint: `cargo run --bin qr-damage-net -- init {}` writes a fresh (untrained) checkpoint",
                model_path
            );
            std::process::exit(1);
        }
    };
    log::info!(
        "model '{}' loaded: {} parameters, {}x{} input",
        model_path,
        predictor.param_count(),
        predictor.img_size(),
        predictor.img_size()
    );

    let server = Server::http(&addr).expect("Failed to bind HTTP server");

    println!("╔══════════════════════════════════════════════╗");
    println!("║          QR Damage Estimator                 ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{}                  ║", addr);
    println!("╚══════════════════════════════════════════════╝");

    // Each request is dispatched on its own thread so one long forward pass
    // does not stall other uploads or page loads.
    for request in server.incoming_requests() {
        let predictor = predictor.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, predictor);
        });
    }
}
