fn main() {
    if let Err(err) = proclog::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
