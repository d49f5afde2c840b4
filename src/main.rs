use filter_spirit::cli::run_cli;

fn main() {
    std::process::exit(run_cli());
}
