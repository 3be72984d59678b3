fn main() {
    if let Err(e) = backstory_lib::run() {
        eprintln!("backstory: {e}");
        std::process::exit(1);
    }
}
