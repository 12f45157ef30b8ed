use serde::{Deserialize, Serialize};

/// User preferences, persisted as one record. Every field has a default
/// so partially saved records from earlier versions still load.
///
/// `pinyin_on` is the tone-insensitive pinyin matching preference
/// consumed by the write-hanzi-or-pinyin game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub audio_on: bool,
    pub pinyin_on: bool,
    pub notif_on: bool,
    pub username: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            audio_on: false,
            pinyin_on: true,
            notif_on: true,
            username: "Diệu".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run() {
        let settings = Settings::default();
        assert!(!settings.dark_mode);
        assert!(!settings.audio_on);
        assert!(settings.pinyin_on);
        assert!(settings.notif_on);
        assert_eq!(settings.username, "Diệu");
    }

    #[test]
    fn partial_record_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        assert!(settings.dark_mode);
        assert!(settings.pinyin_on);
        assert_eq!(settings.username, "Diệu");
    }
}
