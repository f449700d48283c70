mod cli;
mod config;
mod render;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Update(args) => {
            let out = render::update(&args)?;
            print!("{out}");
            Ok(())
        }
        cli::Command::Filter(args) => {
            let out = render::filter(&args)?;
            print!("{out}");
            Ok(())
        }
    }
}
