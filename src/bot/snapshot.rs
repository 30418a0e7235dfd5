// A channel stored as a JSON file, standing in for the chat platform.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::bot::channel::*;
use crate::bot::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PostedReply {
    #[serde(rename = "inReplyTo")]
    pub in_reply_to: String,
    pub content: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    #[serde(rename = "botUser")]
    pub bot_user: String,
    /// Oldest first.
    pub messages: Vec<ChannelMessage>,
    #[serde(default)]
    pub members: Vec<Member>,
    /// The names of the roles defined on the server.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub replies: Vec<PostedReply>,
}

pub struct FileChannel {
    path: Option<PathBuf>,
    snapshot: ChannelSnapshot,
}

impl FileChannel {
    pub fn open(path: &Path) -> BotResult<FileChannel> {
        let path_s = path.display().to_string();
        let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: path_s })?;
        let snapshot: ChannelSnapshot =
            serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
        debug!(
            "open: {}: {} messages, {} members",
            path.display(),
            snapshot.messages.len(),
            snapshot.members.len()
        );
        Ok(FileChannel {
            path: Some(path.to_path_buf()),
            snapshot,
        })
    }

    pub fn from_snapshot(snapshot: ChannelSnapshot) -> FileChannel {
        FileChannel {
            path: None,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &ChannelSnapshot {
        &self.snapshot
    }

    /// Writes the channel back to the file it was opened from.
    pub fn save(&self) -> BotResult<()> {
        let path = match &self.path {
            Some(p) => p,
            None => whatever!("This channel was not read from a file"),
        };
        let path_s = path.display().to_string();
        let js = serde_json::to_string_pretty(&self.snapshot).context(ParsingJsonSnafu {})?;
        fs::write(path, js).context(WritingFileSnafu { path: path_s })?;
        debug!("save: wrote {}", path.display());
        Ok(())
    }

    fn message_mut(&mut self, message_id: &str) -> BotResult<&mut ChannelMessage> {
        match self.snapshot.messages.iter_mut().find(|m| m.id == message_id) {
            Some(m) => Ok(m),
            None => UnknownMessageSnafu { id: message_id }.fail(),
        }
    }
}

impl ElectionChannel for FileChannel {
    fn fetch_recent(&self, limit: usize) -> BotResult<Vec<ChannelMessage>> {
        Ok(self
            .snapshot
            .messages
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    fn add_reaction(&mut self, message_id: &str, emoji: &str) -> BotResult<()> {
        let bot = self.snapshot.bot_user.clone();
        let m = self.message_mut(message_id)?;
        match m.reactions.iter_mut().find(|r| r.emoji == emoji) {
            Some(r) => {
                if !r.users.contains(&bot) {
                    r.users.push(bot);
                }
            }
            None => m.reactions.push(Reaction {
                emoji: emoji.to_string(),
                users: vec![bot],
            }),
        }
        Ok(())
    }

    fn remove_reaction(&mut self, message_id: &str, emoji: &str) -> BotResult<()> {
        let m = self.message_mut(message_id)?;
        m.reactions.retain(|r| r.emoji != emoji);
        Ok(())
    }

    fn reply(&mut self, message_id: &str, content: &str) -> BotResult<()> {
        self.message_mut(message_id)?;
        self.snapshot.replies.push(PostedReply {
            in_reply_to: message_id.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }

    fn member(&self, id: &str) -> Option<Member> {
        self.snapshot.members.iter().find(|m| m.id == id).cloned()
    }

    fn has_role_named(&self, name: &str) -> bool {
        self.snapshot.roles.iter().any(|r| r == name)
    }

    fn bot_user(&self) -> &str {
        &self.snapshot.bot_user
    }
}

/// Exclusive access to a channel for the lifetime of this value.
///
/// The lock is a file created next to the channel file, and removed on drop.
pub struct ChannelLock {
    path: PathBuf,
}

impl ChannelLock {
    pub fn acquire(channel_path: &Path) -> BotResult<ChannelLock> {
        let mut name = channel_path.as_os_str().to_owned();
        name.push(".lock");
        let path = PathBuf::from(name);
        let path_s = path.display().to_string();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!("acquire: locked {}", path_s);
                Ok(ChannelLock { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                ChannelBusySnafu { path: path_s }.fail()
            }
            Err(e) => Err(e).context(LockingSnafu { path: path_s }),
        }
    }
}

impl Drop for ChannelLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Could not remove lock file {}: {}", self.path.display(), e);
        }
    }
}
