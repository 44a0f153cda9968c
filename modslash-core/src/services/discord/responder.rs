// modslash-core/src/services/discord/responder.rs

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client as HttpClient;
use twilight_model::channel::message::{AllowedMentions, MessageFlags};
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{
    ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker,
};
use twilight_util::builder::InteractionResponseDataBuilder;

use modslash_common::traits::platform_traits::Responder;

use crate::Error;

/// Answers an interaction with an ephemeral message.
pub struct InteractionResponder {
    http: Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    token: String,
}

impl InteractionResponder {
    pub fn new(
        http: Arc<HttpClient>,
        application_id: Id<ApplicationMarker>,
        interaction_id: Id<InteractionMarker>,
        token: String,
    ) -> Self {
        Self {
            http,
            application_id,
            interaction_id,
            token,
        }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn reply(&self, content: &str) -> Result<(), Error> {
        let data = InteractionResponseDataBuilder::new()
            .content(content)
            .flags(MessageFlags::EPHEMERAL)
            .allowed_mentions(AllowedMentions::default())
            .build();

        self.http
            .interaction(self.application_id)
            .create_response(
                self.interaction_id,
                &self.token,
                &InteractionResponse {
                    kind: InteractionResponseType::ChannelMessageWithSource,
                    data: Some(data),
                },
            )
            .await
            .map_err(|e| Error::Platform(format!("Error responding to interaction: {e}")))?;
        Ok(())
    }
}

/// Replies to a text message in its channel. Prefix commands have no ephemeral
/// messages, so the reply is public but never pings.
pub struct ChannelResponder {
    http: Arc<HttpClient>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
}

impl ChannelResponder {
    pub fn new(
        http: Arc<HttpClient>,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }
}

#[async_trait]
impl Responder for ChannelResponder {
    async fn reply(&self, content: &str) -> Result<(), Error> {
        let allowed_mentions = AllowedMentions::default();
        self.http
            .create_message(self.channel_id)
            .content(content)
            .reply(self.message_id)
            .allowed_mentions(Some(&allowed_mentions))
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e}")))?;
        Ok(())
    }
}
