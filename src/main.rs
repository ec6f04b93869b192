fn main() {
    env_logger::init();

    if let Err(error) = roi_crop::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
