use clap::Parser;
use irb_cli::ScreenCli;

fn main() {
    let cli = ScreenCli::parse();
    std::process::exit(cli.run());
}
