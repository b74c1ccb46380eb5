// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{Level, metadata::ParseLevelError};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// A tracing level that is written as `"INFO"`, `"debug"`, ... in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SerLevel(Level);

impl Default for SerLevel {
    fn default() -> Self {
        Self(Level::INFO)
    }
}

impl FromStr for SerLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_str(s.trim()).map(SerLevel)
    }
}

impl From<SerLevel> for Level {
    fn from(level: SerLevel) -> Self {
        level.0
    }
}

impl Serialize for SerLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for SerLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The `[log]` section.
///
/// `additional` sets levels per target, e.g. `hyper = "WARN"`.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Logging {
    pub level: SerLevel,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub additional: HashMap<String, SerLevel>,
}

impl Logging {
    fn targets(&self) -> filter::Targets {
        self.additional.iter().fold(
            filter::Targets::new().with_default(Level::from(self.level)),
            |filter, (target, level)| filter.with_target(target, Level::from(*level)),
        )
    }

    pub fn init(&self) {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(self.targets())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn parses_section() {
        let logging: Logging = toml::from_str(
            r#"
level = "debug"

[additional]
hyper = "WARN"
"#,
        )
        .unwrap();
        assert_eq!(Level::from(logging.level), Level::DEBUG);
        assert_eq!(
            logging.additional.get("hyper").map(|x| Level::from(*x)),
            Some(Level::WARN)
        );
        assert!(toml::from_str::<Logging>("level = \"loud\"").is_err());
    }

    #[test]
    fn defaults_to_info() {
        let logging = Logging::default();
        assert_eq!(Level::from(logging.level), Level::INFO);
        assert_eq!(
            toml::to_string(&logging).unwrap().trim(),
            "level = \"INFO\""
        );
    }
}
