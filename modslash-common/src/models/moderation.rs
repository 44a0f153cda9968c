use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use crate::models::principal::Principal;

pub const DEFAULT_REASON: &str = "No reason provided.";

/// Every moderation command the bot exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Kick,
    Ban,
    Mute,
    Unmute,
    Deafen,
    Undeafen,
    Silence,
    Unsilence,
}

impl ModerationAction {
    pub const ALL: [ModerationAction; 8] = [
        ModerationAction::Kick,
        ModerationAction::Ban,
        ModerationAction::Mute,
        ModerationAction::Unmute,
        ModerationAction::Deafen,
        ModerationAction::Undeafen,
        ModerationAction::Silence,
        ModerationAction::Unsilence,
    ];

    /// Command name, also the verb used in user-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kick",
            ModerationAction::Ban => "ban",
            ModerationAction::Mute => "mute",
            ModerationAction::Unmute => "unmute",
            ModerationAction::Deafen => "deafen",
            ModerationAction::Undeafen => "undeafen",
            ModerationAction::Silence => "silence",
            ModerationAction::Unsilence => "unsilence",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kicked",
            ModerationAction::Ban => "banned",
            ModerationAction::Mute => "muted",
            ModerationAction::Unmute => "unmuted",
            ModerationAction::Deafen => "deafened",
            ModerationAction::Undeafen => "undeafened",
            ModerationAction::Silence => "silenced",
            ModerationAction::Unsilence => "unsilenced",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModerationAction::Kick => "Kicks a user from the server.",
            ModerationAction::Ban => "Bans a user from the server.",
            ModerationAction::Mute => "Mutes a user in their voice channel.",
            ModerationAction::Unmute => "Unmutes a user in their voice channel.",
            ModerationAction::Deafen => "Deafens a user in their voice channel.",
            ModerationAction::Undeafen => "Undeafens a user in their voice channel.",
            ModerationAction::Silence => "Mutes and deafens a user in their voice channel.",
            ModerationAction::Unsilence => "Unmutes and undeafens a user in their voice channel.",
        }
    }

    /// Voice actions only make sense while the target sits in a voice channel.
    pub fn requires_voice(self) -> bool {
        !matches!(self, ModerationAction::Kick | ModerationAction::Ban)
    }

    /// Restoring actions (unmute, undeafen, unsilence) take no reason.
    pub fn accepts_reason(self) -> bool {
        matches!(
            self,
            ModerationAction::Kick
                | ModerationAction::Ban
                | ModerationAction::Mute
                | ModerationAction::Deafen
                | ModerationAction::Silence
        )
    }

    /// Label of the user context menu entry, for the actions that have one.
    pub fn context_menu_label(self) -> Option<&'static str> {
        match self {
            ModerationAction::Kick => Some("Kick User"),
            ModerationAction::Ban => Some("Ban User"),
            ModerationAction::Mute => Some("Mute User"),
            ModerationAction::Deafen => Some("Deafen User"),
            _ => None,
        }
    }

    pub fn from_context_menu_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.context_menu_label() == Some(label))
    }

    /// Default member permissions the command is registered with.
    pub fn default_permissions(self) -> Permissions {
        match self {
            ModerationAction::Kick => Permissions::KICK_MEMBERS,
            ModerationAction::Ban => Permissions::BAN_MEMBERS,
            ModerationAction::Mute | ModerationAction::Unmute => Permissions::MUTE_MEMBERS,
            ModerationAction::Deafen | ModerationAction::Undeafen => Permissions::DEAFEN_MEMBERS,
            ModerationAction::Silence | ModerationAction::Unsilence => {
                Permissions::MUTE_MEMBERS | Permissions::DEAFEN_MEMBERS
            }
        }
    }

    /// The voice flags this action writes, or `None` for guild membership actions.
    pub fn voice_change(self) -> Option<VoiceStateChange> {
        let (mute, deafen) = match self {
            ModerationAction::Kick | ModerationAction::Ban => return None,
            ModerationAction::Mute => (Some(true), None),
            ModerationAction::Unmute => (Some(false), None),
            ModerationAction::Deafen => (None, Some(true)),
            ModerationAction::Undeafen => (None, Some(false)),
            ModerationAction::Silence => (Some(true), Some(true)),
            ModerationAction::Unsilence => (Some(false), Some(false)),
        };
        Some(VoiceStateChange { mute, deafen })
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModerationAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::Parse(format!("unknown moderation action: {s}")))
    }
}

/// Server voice flags written by one member update. `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceStateChange {
    pub mute: Option<bool>,
    pub deafen: Option<bool>,
}

/// Where a command came from. Changes only the audit reason and reply wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSurface {
    Slash,
    ContextMenu,
    Prefix,
}

/// One moderation command invocation, fully resolved.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub guild_id: Id<GuildMarker>,
    pub action: ModerationAction,
    pub actor: Principal,
    pub target: Principal,
    pub bot: Principal,
    pub reason: Option<String>,
    pub surface: CommandSurface,
}

impl ActionRequest {
    pub fn reason_or_default(&self) -> &str {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASON)
    }

    /// Reason string recorded in the guild audit log.
    pub fn audit_reason(&self) -> String {
        let past = capitalize(self.action.past_tense());
        match self.surface {
            CommandSurface::ContextMenu => {
                format!("{past} by {} via context menu.", self.actor.display_name)
            }
            _ if self.action.accepts_reason() => format!(
                "{past} by {} ({}). Reason: {}",
                self.actor.name,
                self.actor.id,
                self.reason_or_default()
            ),
            _ => format!("{past} by {} ({}).", self.actor.name, self.actor.id),
        }
    }

    /// Whether the confirmation should repeat the reason back to the moderator.
    pub fn echoes_reason(&self) -> bool {
        self.action.accepts_reason() && self.surface != CommandSurface::ContextMenu
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Why the hierarchy check refused a request. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HierarchyViolation {
    #[error("target is the acting moderator")]
    SelfTarget,
    #[error("target holds an equal or higher role than the moderator")]
    ActorOutranked,
    #[error("target holds an equal or higher role than the bot")]
    BotOutranked,
}

/// Failure reported by the platform when performing a moderation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationFailure {
    /// The bot lacks the platform permission for this mutation.
    #[error("missing permissions")]
    PermissionDenied,
    #[error("{0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: u64, name: &str) -> Principal {
        Principal {
            id: Id::new(id),
            name: name.to_string(),
            display_name: format!("{name} (nick)"),
            is_owner: false,
            role_ids: Vec::new(),
            highest_role_rank: 0,
        }
    }

    fn request(action: ModerationAction, reason: Option<&str>, surface: CommandSurface) -> ActionRequest {
        ActionRequest {
            guild_id: Id::new(1),
            action,
            actor: principal(10, "alice"),
            target: principal(20, "bob"),
            bot: principal(30, "modbot"),
            reason: reason.map(str::to_string),
            surface,
        }
    }

    #[test]
    fn kick_audit_reason_carries_actor_and_reason() {
        let req = request(ModerationAction::Kick, Some("spam"), CommandSurface::Slash);
        assert_eq!(req.audit_reason(), "Kicked by alice (10). Reason: spam");
    }

    #[test]
    fn missing_reason_falls_back_to_default() {
        let req = request(ModerationAction::Ban, None, CommandSurface::Slash);
        assert_eq!(req.audit_reason(), "Banned by alice (10). Reason: No reason provided.");

        let blank = request(ModerationAction::Ban, Some("   "), CommandSurface::Prefix);
        assert_eq!(blank.reason_or_default(), DEFAULT_REASON);
    }

    #[test]
    fn restoring_actions_omit_reason() {
        let req = request(ModerationAction::Unsilence, Some("ignored"), CommandSurface::Slash);
        assert_eq!(req.audit_reason(), "Unsilenced by alice (10).");
        assert!(!req.echoes_reason());
    }

    #[test]
    fn context_menu_reason_uses_display_name() {
        let req = request(ModerationAction::Mute, None, CommandSurface::ContextMenu);
        assert_eq!(req.audit_reason(), "Muted by alice (nick) via context menu.");
        assert!(!req.echoes_reason());
    }

    #[test]
    fn voice_changes_match_actions() {
        assert_eq!(ModerationAction::Kick.voice_change(), None);
        assert_eq!(
            ModerationAction::Silence.voice_change(),
            Some(VoiceStateChange { mute: Some(true), deafen: Some(true) })
        );
        assert_eq!(
            ModerationAction::Undeafen.voice_change(),
            Some(VoiceStateChange { mute: None, deafen: Some(false) })
        );
    }

    #[test]
    fn names_and_labels_parse_back() {
        for action in ModerationAction::ALL {
            assert_eq!(action.name().parse::<ModerationAction>().unwrap(), action);
            if let Some(label) = action.context_menu_label() {
                assert_eq!(ModerationAction::from_context_menu_label(label), Some(action));
            }
        }
        assert!("warn".parse::<ModerationAction>().is_err());
    }
}
