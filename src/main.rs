//! astgen CLI entry point

fn main() {
    astgen::cli::run();
}
