use log::{debug, warn};
use snafu::prelude::*;

use crate::bot::channel::{ElectionChannel, Member};
use crate::bot::*;

/// Whether the member holds the role.
///
/// A role that does not exist on the server grants the permission to everyone,
/// so that servers that never set it up can still run elections.
pub fn has_role(channel: &dyn ElectionChannel, member: &Member, role: &str) -> bool {
    if !channel.has_role_named(role) {
        warn!(
            "The role {:?} does not exist on this server, allowing {} to manage elections",
            role, member.id
        );
        return true;
    }
    member.roles.iter().any(|r| r == role)
}

/// Resolves the invoker and checks that they may manage elections.
pub fn check_admin(channel: &dyn ElectionChannel, invoker: &str, role: &str) -> BotResult<Member> {
    let member = channel
        .member(invoker)
        .context(NoMemberSnafu { id: invoker })?;
    let display = member.name.clone().unwrap_or_else(|| member.id.clone());
    ensure!(
        has_role(channel, &member, role),
        PermissionDeniedSnafu {
            member: display,
            role
        }
    );
    debug!("check_admin: {} may manage elections", display);
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::snapshot::*;

    fn channel(roles: &[&str]) -> FileChannel {
        FileChannel::from_snapshot(ChannelSnapshot {
            bot_user: "bot".to_string(),
            messages: vec![],
            members: vec![
                Member {
                    id: "u1".to_string(),
                    name: Some("Ann".to_string()),
                    roles: vec!["ElectionAdmin".to_string()],
                },
                Member {
                    id: "u2".to_string(),
                    name: Some("Ben".to_string()),
                    roles: vec!["Member".to_string()],
                },
            ],
            roles: roles.iter().map(|r| r.to_string()).collect(),
            replies: vec![],
        })
    }

    #[test]
    fn requires_the_role_when_it_exists() {
        let ch = channel(&["ElectionAdmin", "Member"]);
        assert_eq!(check_admin(&ch, "u1", "ElectionAdmin").unwrap().id, "u1");
        let err = check_admin(&ch, "u2", "ElectionAdmin").unwrap_err();
        assert_eq!(err.to_string(), "Ben does not have the ElectionAdmin role");
        let err = check_admin(&ch, "u3", "ElectionAdmin").unwrap_err();
        assert!(matches!(err, BotError::NoMember { .. }));
    }

    #[test]
    fn allows_everyone_when_the_role_is_missing() {
        let ch = channel(&["Member"]);
        assert!(check_admin(&ch, "u2", "ElectionAdmin").is_ok());
        // Unknown members are still rejected.
        assert!(check_admin(&ch, "u3", "ElectionAdmin").is_err());
    }
}
