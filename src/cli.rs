use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lumo")]
#[command(version)]
#[command(about = "Command-line AI assistant using the Gemini API", long_about = None)]
pub struct Args {
    #[arg(short = 'm', long = "model", help = "Model name to use")]
    pub model: Option<String>,

    #[arg(
        long = "system-prompt",
        help = "System prompt establishing the assistant's behavior"
    )]
    pub system_prompt: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:8080/v1beta/models)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(
        long = "max-rounds",
        help = "Maximum number of tool-call rounds per turn"
    )]
    pub max_rounds: Option<usize>,

    #[arg(long = "no-tools", help = "Disable tools for this query")]
    pub no_tools: bool,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic output")]
    pub verbose: bool,

    #[arg(help = "Message to send to the assistant (reads stdin when omitted)")]
    pub message: Vec<String>,
}
