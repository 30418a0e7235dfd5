// The boundary with the chat platform.

use serde::{Deserialize, Serialize};

use crate::bot::BotResult;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    /// The identities of the users who applied this reaction.
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl ChannelMessage {
    pub fn has_reaction(&self, emoji: &str) -> bool {
        self.reactions.iter().any(|r| r.emoji == emoji)
    }

    pub fn reaction(&self, emoji: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.emoji == emoji)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A channel holding an election.
///
/// All the calls are made one after the other, a tabulation never has two
/// calls in flight.
pub trait ElectionChannel {
    /// The most recent messages, newest first.
    fn fetch_recent(&self, limit: usize) -> BotResult<Vec<ChannelMessage>>;

    /// Adds a reaction from the bot to a message.
    fn add_reaction(&mut self, message_id: &str, emoji: &str) -> BotResult<()>;

    /// Removes a reaction from a message, whoever applied it.
    fn remove_reaction(&mut self, message_id: &str, emoji: &str) -> BotResult<()>;

    fn reply(&mut self, message_id: &str, content: &str) -> BotResult<()>;

    fn member(&self, id: &str) -> Option<Member>;

    /// Whether a role with this name exists on the server.
    fn has_role_named(&self, name: &str) -> bool;

    /// The identity of the bot itself. Its reactions are not votes.
    fn bot_user(&self) -> &str;
}
