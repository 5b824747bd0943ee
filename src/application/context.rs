//! Application context - everything a request needs, built once at startup

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::{CommandService, MessageService};
use crate::domain::traits::{Capabilities, Notifier};
use crate::infrastructure::config::Config;

pub struct AppContext {
    pub config: Arc<Config>,
    pub commands: CommandService,
    pub messages: MessageService,
}

impl AppContext {
    pub fn new(
        config: Config,
        caps: Capabilities,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, BotError> {
        let commands = CommandService::new(config.prefix()?);
        commands.register_defaults(&caps)?;

        let about = format!(
            "{} - WhatsApp bot built on the Meta WhatsApp Cloud API. Version {}",
            config.bot.name,
            env!("CARGO_PKG_VERSION")
        );
        commands.add_command("info", "Shows information about the bot", move |_| {
            Ok(about.clone())
        })?;

        let messages = MessageService::new(commands.dispatcher(), notifier);

        Ok(Self {
            config: Arc::new(config),
            commands,
            messages,
        })
    }
}
