use gst_uninstalled::options::{Args, program_dir};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Args = argh::from_env();
    let options = args.resolve(&program_dir());

    let code = match gst_uninstalled::run(&options) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            gst_uninstalled::exit_code(&err)
        }
    };
    std::process::exit(code);
}
