use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "optimaize", version, about = "Optimaize AI Chat Server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Enter interactive terminal chat mode against a stored chat
    Chat {
        /// The UUID of the chat to connect to
        #[arg(short = 'i', long)]
        chat: Uuid,
    },

    /// Manage stored chats
    Chats {
        #[command(subcommand)]
        action: ChatAction,
    },
}

#[derive(Subcommand)]
pub enum ChatAction {
    /// Create a new chat
    Create {
        /// Initial title; defaults to "New Chat" and is renamed by the
        /// first user message
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List stored chats
    List,

    /// Delete a chat and its messages
    Delete { id: Uuid },

    /// Export a chat transcript to a .txt file
    Export {
        /// The UUID of the chat to export
        id: Uuid,
        /// The path to the output file (optional)
        #[arg(short, long)]
        path: Option<String>,
    },
}
