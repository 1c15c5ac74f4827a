// Entry point: resolve the data/output directories and hand off to the
// batch pipeline. All file names within those directories are fixed.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "condicionamentos",
    about = "Relatórios anuais dos condicionamentos de trânsito em Lisboa (2018-2021)"
)]
struct Args {
    /// Directory containing the yearly condicionamentostransito<ano>.csv files.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Directory where reports, charts and the JSON summary are written.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = condicionamentos::run(&args.data_dir, &args.out_dir) {
        eprintln!("Erro: {}", e);
        std::process::exit(1);
    }
}
