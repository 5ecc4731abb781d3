use clap::{Parser, Subcommand};

use crate::config::SERVER_URL_ENV;

/// noclip - Share clipboards between machines
#[derive(Parser, Debug)]
#[command(name = "noclip", version)]
pub struct Cli {
    /// URL of the noclip server, overriding the one saved at registration
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new user and save the API key
    Register {
        /// The id other users will know you by
        user_id: String,
    },
    /// Add a friend by their unique ID
    Add {
        friend_id: String,
    },
    /// Put content into a bucket
    Put {
        bucket: String,
        /// Read from the clipboard when omitted
        content: Option<String>,
    },
    /// Get content from someone's bucket and copy it to the clipboard
    Get {
        owner_id: String,
        #[arg(default_value = "default")]
        bucket: String,
        /// Print the content instead of copying it
        #[arg(long, short)]
        print: bool,
    },
    /// Show who you are registered as
    Whoami,
}
