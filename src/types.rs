// types.rs
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name to give the new cluster, user and context
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub context_name: String,

    /// Kubeconfig to modify. Defaults to $KUBECONFIG, then ~/.kube/config
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubeconfig holding the entry to add. Opens $EDITOR when omitted
    #[arg(long)]
    pub new_config: Option<String>,

    /// Overwrite an existing entry without asking
    #[arg(short, long)]
    pub force: bool,

    // -v enables debug output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long)]
    pub log_file: Option<String>,

    /// JSON settings file. Defaults to <config dir>/k8ctx/settings.json
    #[arg(long)]
    pub settings: Option<String>,

    /// Print the merged kubeconfig instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}
