// Action dispatcher: voice precondition, hierarchy validation, then exactly one
// platform mutation and exactly one reply.

use std::sync::Arc;

use tracing::{debug, info, warn};

use modslash_common::models::{
    ActionRequest, HierarchyViolation, ModerationAction, ModerationFailure,
};
use modslash_common::traits::platform_traits::{MemberDirectory, MemberModerator, Responder};

use crate::Error;
use crate::services::moderation::{hierarchy, messages};

/// How a dispatched request ended. The invoker has received exactly one reply in
/// every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    NotInVoice,
    Rejected(HierarchyViolation),
    Failed(ModerationFailure),
}

pub struct ActionDispatcher {
    directory: Arc<dyn MemberDirectory>,
    moderator: Arc<dyn MemberModerator>,
}

impl ActionDispatcher {
    pub fn new(directory: Arc<dyn MemberDirectory>, moderator: Arc<dyn MemberModerator>) -> Self {
        Self { directory, moderator }
    }

    pub async fn dispatch(
        &self,
        request: &ActionRequest,
        responder: &dyn Responder,
    ) -> Result<DispatchOutcome, Error> {
        let action = request.action;

        if action.requires_voice() {
            let channel = match self
                .directory
                .voice_channel(request.guild_id, request.target.id)
                .await
            {
                Ok(channel) => channel,
                Err(e) => {
                    warn!("{action}: voice state lookup for {} failed: {e}", request.target.id);
                    responder.reply(&messages::unexpected(&e)).await?;
                    return Ok(DispatchOutcome::Failed(ModerationFailure::Platform(e.to_string())));
                }
            };
            if channel.is_none() {
                debug!("{action}: target {} is not in voice", request.target.id);
                responder.reply(&messages::not_in_voice(&request.target)).await?;
                return Ok(DispatchOutcome::NotInVoice);
            }
        }

        if let Err(violation) = hierarchy::validate(request) {
            warn!(
                "{action}: hierarchy rejected actor {} -> target {}: {violation}",
                request.actor.id, request.target.id
            );
            responder
                .reply(&messages::hierarchy_violation(action, violation))
                .await?;
            return Ok(DispatchOutcome::Rejected(violation));
        }

        match self.execute(request).await {
            Ok(()) => {
                info!(
                    "{} {} in guild {} (by {})",
                    action.past_tense(),
                    request.target.id,
                    request.guild_id,
                    request.actor.id
                );
                responder.reply(&messages::success(request)).await?;
                Ok(DispatchOutcome::Completed)
            }
            Err(failure) => {
                warn!(
                    "{action} of {} in guild {} failed: {failure}",
                    request.target.id, request.guild_id
                );
                responder.reply(&messages::failure(action, &failure)).await?;
                Ok(DispatchOutcome::Failed(failure))
            }
        }
    }

    async fn execute(&self, request: &ActionRequest) -> Result<(), ModerationFailure> {
        let reason = request.audit_reason();
        let (guild_id, user_id) = (request.guild_id, request.target.id);

        match request.action {
            ModerationAction::Kick => self.moderator.kick(guild_id, user_id, &reason).await,
            ModerationAction::Ban => self.moderator.ban(guild_id, user_id, &reason).await,
            other => match other.voice_change() {
                Some(change) => {
                    self.moderator
                        .update_voice_state(guild_id, user_id, change, &reason)
                        .await
                }
                None => Err(ModerationFailure::Platform(format!(
                    "{other} has no voice state change"
                ))),
            },
        }
    }
}
