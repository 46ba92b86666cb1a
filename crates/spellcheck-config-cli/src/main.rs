use std::process;

fn main() {
    match spellcheck_config_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("spellcheck-config error: {err:#}");
            process::exit(1);
        }
    }
}
