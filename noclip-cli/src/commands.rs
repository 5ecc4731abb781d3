use std::{io::Write, path::Path};

use anyhow::Result;

use crate::{
    api::{AddFriendOutcome, ApiClient},
    args::{Cli, Command},
    clipboard,
    config::ClientConfig,
};

/// Runs one command, writing what the user should see to `out`
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let path = ClientConfig::default_path()?;
    let config = ClientConfig::load(&path)?;
    let server_url = config.resolve_server_url(cli.server.as_deref())?;

    let client = || -> Result<ApiClient> {
        Ok(ApiClient::new(&server_url)?.with_api_key(config.api_key()?))
    };

    match cli.command {
        Command::Register { user_id } => register(&path, &server_url, &user_id, out)?,
        Command::Add { friend_id } => match client()?.add_friend(&friend_id)? {
            AddFriendOutcome::Added => {
                writeln!(out, "Successfully added {} as friend!", friend_id)?
            }
            AddFriendOutcome::AlreadyFriends => {
                writeln!(out, "You are already friends with {}", friend_id)?
            }
        },
        Command::Put { bucket, content } => {
            let content = match content {
                Some(content) => content,
                None => clipboard::paste()?,
            };

            client()?.put_clip(&bucket, &content)?;
            writeln!(out, "Content stored in bucket '{}'", bucket)?;
        }
        Command::Get {
            owner_id,
            bucket,
            print,
        } => {
            let content = client()?.get_clip(&owner_id, &bucket)?;

            if print {
                write!(out, "{}", content)?;
            } else {
                clipboard::copy(&content)?;
                writeln!(
                    out,
                    "Content from {}'s bucket '{}' copied to clipboard",
                    owner_id, bucket
                )?;
            }
        }
        Command::Whoami => {
            let id = client()?.me()?;
            writeln!(out, "{} on {}", id, server_url)?;
        }
    }

    Ok(())
}

/// Registers through the server and saves the issued api key.
/// Nothing is written locally unless the server accepted the registration.
fn register(
    path: &Path,
    server_url: &str,
    user_id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let registration = ApiClient::new(server_url)?.register(user_id)?;

    ClientConfig {
        user_id: Some(registration.id),
        api_key: Some(registration.api_key),
        server_url: Some(server_url.to_string()),
    }
    .save(path)?;

    writeln!(out, "Registered successfully! Your API key has been saved.")?;

    Ok(())
}
