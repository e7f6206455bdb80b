mod app;

use tracing::error;

fn main() {
    let config = app::bootstrap::build_app();
    if let Err(err) = app::runner::run(&config) {
        error!(error = %err, "demo_failed");
        std::process::exit(1);
    }
}
