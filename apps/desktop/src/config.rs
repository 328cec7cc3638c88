use std::{collections::HashMap, fs};

#[derive(Debug)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
        }
    }
}

/// Defaults, then `scheduler.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("scheduler.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("SCHEDULER_SERVER_URL") {
        settings.server_url = v;
    }

    settings
}
