// Role hierarchy validation. The order of the checks decides which message the
// moderator sees when several apply.

use modslash_common::models::{ActionRequest, HierarchyViolation};

pub fn validate(request: &ActionRequest) -> Result<(), HierarchyViolation> {
    let ActionRequest { actor, target, bot, .. } = request;

    if target.id == actor.id {
        return Err(HierarchyViolation::SelfTarget);
    }
    if actor.highest_role_rank <= target.highest_role_rank && !actor.is_owner {
        return Err(HierarchyViolation::ActorOutranked);
    }
    // The bot's reach is a platform limit; owner status does not lift it.
    if bot.highest_role_rank <= target.highest_role_rank {
        return Err(HierarchyViolation::BotOutranked);
    }
    Ok(())
}
