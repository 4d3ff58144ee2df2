fn main() {
    if let Err(error) = slide_roi::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
