use crate::error::AppError;
use crate::server;
use clap::{Args, Parser, Subcommand};
use property_hub::registration::ROLE_REDIRECTS;

#[derive(Parser, Debug)]
#[command(
    name = "PropertyHub Portal",
    about = "Serve the PropertyHub search and sign-up pages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print where each role lands after registration
    Redirects,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Redirects => {
            print!("{}", redirect_table());
            Ok(())
        }
    }
}

fn redirect_table() -> String {
    let mut table = String::from("ROLE        DESTINATION\n");
    for (role, path) in ROLE_REDIRECTS.entries() {
        table.push_str(&format!("{role:<12}{path}\n"));
    }
    table.push_str(&format!("{:<12}{}\n", "(other)", ROLE_REDIRECTS.fallback()));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["property-hub-web"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["property-hub-web", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8080)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn redirect_table_lists_every_role_and_fallback() {
        let table = redirect_table();
        assert!(table.contains("agent       /agent/dashboard"));
        assert!(table.contains("landlord    /agent/dashboard"));
        assert!(table.contains("seeker      /"));
        assert!(table.lines().last().is_some_and(|line| line.starts_with("(other)")));
    }
}
