// Command-line entry point.
// All classification logic lives in the library (src/lib.rs and its modules);
// this binary only wires files to it.

use qr_damage_net::network::checkpoint;
use qr_damage_net::{Classification, QrDamagePredictor, TinyQrNet};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("init") if args.len() == 3 => init_model(&args[2]),
        Some("classify") if args.len() == 4 => classify(&args[2], &args[3]),
        _ => {
            eprintln!("Usage:");
            eprintln!("  qr-damage-net init <model.json>              write a freshly initialized checkpoint");
            eprintln!("  qr-damage-net classify <model.json> <image>  classify an image file");
            std::process::exit(2);
        }
    }
}

/// Writes an untrained (He/Xavier initialized) checkpoint. A stand-in
/// artifact until trained weights are exported.
fn init_model(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    let net = TinyQrNet::new();
    match checkpoint::save(path, &net.state()) {
        Ok(()) => println!(
            "Wrote fresh checkpoint ({} parameters) to {}",
            net.param_count(),
            path
        ),
        Err(e) => {
            eprintln!("Could not write checkpoint '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn classify(model_path: &str, image_path: &str) {
    let predictor = match QrDamagePredictor::load(model_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    match predictor.predict_path(image_path) {
        Ok(result) => print_report(&result),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(result: &Classification) {
    println!(
        "Prediction: {} ({:.1}% confidence)",
        result.class_name(),
        result.confidence * 100.0
    );
    println!();
    for (class, prob) in result.ranked() {
        let bar = "#".repeat((prob * 40.0).round() as usize);
        println!("  {:<8} {:>5.1}%  {}", class.name(), prob * 100.0, bar);
    }
}
