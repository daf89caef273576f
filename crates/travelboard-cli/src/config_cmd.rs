use travelboard_core::config::Config;

use crate::{CommandOutput, ConfigCommand};

pub fn run_config(action: ConfigCommand, config: &Config) -> CommandOutput {
    match action {
        ConfigCommand::Show => match serde_yaml::to_string(config) {
            Ok(yaml) => CommandOutput::ok(yaml),
            Err(e) => CommandOutput::fail(1, format!("Error: encode config: {e}\n")),
        },
        ConfigCommand::Validate => match config.validate() {
            Ok(()) => CommandOutput::ok(format!(
                "config ok (favorites key {})\n",
                config.favorites_key()
            )),
            Err(msg) => CommandOutput::fail(1, format!("Error: invalid config: {msg}\n")),
        },
    }
}
