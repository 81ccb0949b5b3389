use crate::commands::{run_encode, run_predict, EncodeArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruitment_ai::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Verdict Service",
    about = "Serve the candidate recruitment form or score candidates from the command line",
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
    /// Score a candidate profile (JSON file) with the model artifact
    Predict(PredictArgs),
    /// Print the feature vector for a profile, or the training code for one label
    Encode(EncodeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Encode(args) => run_encode(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use recruitment_ai::screening::CategoricalField;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve_when_no_subcommand() {
        let cli = Cli::try_parse_from(["recruitment-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_single_label_encoding() {
        let cli = Cli::try_parse_from([
            "recruitment-ai-api",
            "encode",
            "--field",
            "company_size",
            "--value",
            "10000+",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Encode(args)) => {
                assert_eq!(args.field, Some(CategoricalField::CompanySize));
                assert_eq!(args.value.as_deref(), Some("10000+"));
                assert!(args.profile.is_none());
            }
            other => panic!("expected encode command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = Cli::try_parse_from([
            "recruitment-ai-api",
            "encode",
            "--field",
            "salary",
            "--value",
            "high",
        ]);
        assert!(result.is_err());
    }
}
