fn main() {
    if let Err(err) = familytree_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
