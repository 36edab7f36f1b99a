fn main() {
    if let Err(err) = traytimer_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
