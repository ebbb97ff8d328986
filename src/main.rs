use tracing_subscriber::EnvFilter;

fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    if let Err(e) = gripper_runtime::runtime::run() {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
