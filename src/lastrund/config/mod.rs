// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

mod logging;

use std::{
    fmt::{self, Display, Formatter},
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono_tz::Tz;
use clap::ArgAction;
use lastrunlib::{
    itglue,
    notify::{self, Address},
    parse::{DateOrder, TimestampParser},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use logging::{Logging, SerLevel};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unknown time zone: {0}")]
    TimeZone(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Listener {
    pub address: SocketAddr,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            address: ([127, 0, 0, 1], 3000).into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Endpoints {
    /// Value of the `x-api-key` header every request must carry.
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ItGlue {
    pub api_url: String,
    pub api_key: String,
    pub asset_type_id: String,
    /// Base of the links to assets in the web interface.
    pub base_url: String,
}

impl Default for ItGlue {
    fn default() -> Self {
        Self {
            api_url: "https://api.itglue.com".to_string(),
            api_key: String::new(),
            asset_type_id: String::new(),
            base_url: String::new(),
        }
    }
}

impl ItGlue {
    pub fn settings(&self) -> itglue::Settings {
        itglue::Settings {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            asset_type_id: self.asset_type_id.clone(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Notification {
    pub sendgrid_url: String,
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
    /// Comma separated list of recipients.
    pub to: String,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            sendgrid_url: notify::SENDGRID_URL.to_string(),
            api_key: String::new(),
            from_email: String::new(),
            from_name: String::new(),
            to: String::new(),
        }
    }
}

impl Notification {
    pub fn from(&self) -> Address {
        Address {
            email: self.from_email.clone(),
            name: self.from_name.clone(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Audit {
    /// IANA name of the zone the reference time and trait values are in.
    pub time_zone: String,
    pub date_order: DateOrder,
    /// Catalog file to use instead of the built-in one.
    pub catalog: Option<PathBuf>,
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            date_order: DateOrder::default(),
            catalog: None,
        }
    }
}

impl Audit {
    pub fn timestamps(&self) -> Result<TimestampParser, Error> {
        let zone =
            Tz::from_str(self.time_zone.trim()).map_err(|_| Error::TimeZone(self.time_zone.clone()))?;
        Ok(TimestampParser::new(zone, self.date_order))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub itglue: ItGlue,
    #[serde(default)]
    pub notification: Notification,
    #[serde(default)]
    pub audit: Audit,
    #[serde(default)]
    pub log: Logging,
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", toml::to_string_pretty(self).unwrap_or_default())
    }
}

fn command() -> clap::Command {
    clap::Command::new("lastrund")
        .about("Audits the last runs of maintenance scripts documented in IT Glue")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .env("LASTRUND_CONFIG")
                .long("config")
                .value_parser(clap::builder::PathBufValueParser::new())
                .action(ArgAction::Set)
                .help("path to toml config file"),
        )
        .arg(
            clap::Arg::new("listening")
                .env("LISTENING")
                .long("listening")
                .short('l')
                .value_name("IP:PORT")
                .value_parser(clap::value_parser!(SocketAddr))
                .help("the address to listen to (e.g. 127.0.0.1:3000 or 0.0.0.0:3000)."),
        )
        .arg(
            clap::Arg::new("api-key")
                .env("API_KEY")
                .long("api-key")
                .action(ArgAction::Set)
                .help("API key that must be set as X-API-KEY header to gain access"),
        )
        .arg(
            clap::Arg::new("itg-api-url")
                .env("ITG_API_URL")
                .long("itg-api-url")
                .action(ArgAction::Set)
                .help("base url of the IT Glue API"),
        )
        .arg(
            clap::Arg::new("itg-api-key")
                .env("ITG_API_KEY")
                .long("itg-api-key")
                .hide_env_values(true)
                .action(ArgAction::Set)
                .help("API key of IT Glue"),
        )
        .arg(
            clap::Arg::new("asset-type-id")
                .env("SCRIPTS_LAST_RUN_ASSET_TYPE_ID")
                .long("asset-type-id")
                .action(ArgAction::Set)
                .help("id of the flexible asset type containing the last runs"),
        )
        .arg(
            clap::Arg::new("itg-base-url")
                .env("ITG_BASE_URL")
                .long("itg-base-url")
                .action(ArgAction::Set)
                .help("base url used for links to assets"),
        )
        .arg(
            clap::Arg::new("sendgrid-api-key")
                .env("SENDGRID_API_KEY")
                .long("sendgrid-api-key")
                .hide_env_values(true)
                .action(ArgAction::Set)
                .help("API key of SendGrid"),
        )
        .arg(
            clap::Arg::new("email-from-email")
                .env("EMAIL_FROM_EMAIL")
                .long("email-from-email")
                .action(ArgAction::Set)
                .help("sender address of reports"),
        )
        .arg(
            clap::Arg::new("email-from-name")
                .env("EMAIL_FROM_NAME")
                .long("email-from-name")
                .action(ArgAction::Set)
                .help("sender name of reports"),
        )
        .arg(
            clap::Arg::new("emails-to")
                .env("EMAILS_TO")
                .long("emails-to")
                .action(ArgAction::Set)
                .help("comma separated list of report recipients"),
        )
        .arg(
            clap::Arg::new("time-zone")
                .env("AUDIT_TIME_ZONE")
                .long("time-zone")
                .action(ArgAction::Set)
                .help("IANA time zone of the reference time (e.g. Australia/Brisbane)"),
        )
        .arg(
            clap::Arg::new("date-order")
                .env("AUDIT_DATE_ORDER")
                .long("date-order")
                .value_parser(DateOrder::from_str)
                .help("order of numeric dates: day-first or month-first"),
        )
        .arg(
            clap::Arg::new("catalog")
                .env("AUDIT_CATALOG")
                .long("catalog")
                .value_parser(clap::builder::PathBufValueParser::new())
                .action(ArgAction::Set)
                .help("path to a catalog file replacing the built-in checks"),
        )
        .arg(
            clap::Arg::new("log-level")
                .env("LOG_LEVEL")
                .long("log-level")
                .short('L')
                .value_parser(SerLevel::from_str)
                .help("level of log messages (e.g. INFO, DEBUG)"),
        )
}

impl Config {
    fn load_etc() -> Option<Self> {
        let config = std::fs::read_to_string("/etc/lastrund/lastrund.toml").ok()?;
        toml::from_str(&config).ok()
    }

    fn load_user() -> Option<Self> {
        let home = std::env::var("HOME").ok()?;
        let path = format!("{home}/.config/lastrund/lastrund.toml");
        let config = std::fs::read_to_string(path).ok()?;
        toml::from_str(&config).ok()
    }

    pub fn from_file<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&config).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply(&mut self, cmds: &clap::ArgMatches) {
        fn set(target: &mut String, cmds: &clap::ArgMatches, id: &str) {
            if let Some(x) = cmds.get_one::<String>(id) {
                *target = x.clone();
            }
        }
        if let Some(ip) = cmds.get_one::<SocketAddr>("listening") {
            self.listener.address = *ip;
        }
        if let Some(api_key) = cmds.get_one::<String>("api-key") {
            self.endpoints.key = Some(api_key.clone());
        }
        set(&mut self.itglue.api_url, cmds, "itg-api-url");
        set(&mut self.itglue.api_key, cmds, "itg-api-key");
        set(&mut self.itglue.asset_type_id, cmds, "asset-type-id");
        set(&mut self.itglue.base_url, cmds, "itg-base-url");
        set(&mut self.notification.api_key, cmds, "sendgrid-api-key");
        set(&mut self.notification.from_email, cmds, "email-from-email");
        set(&mut self.notification.from_name, cmds, "email-from-name");
        set(&mut self.notification.to, cmds, "emails-to");
        set(&mut self.audit.time_zone, cmds, "time-zone");
        if let Some(order) = cmds.get_one::<DateOrder>("date-order") {
            self.audit.date_order = *order;
        }
        if let Some(path) = cmds.get_one::<PathBuf>("catalog") {
            self.audit.catalog = Some(path.clone());
        }
        if let Some(level) = cmds.get_one::<SerLevel>("log-level") {
            self.log.level = *level;
        }
    }

    fn from_matches(cmds: &clap::ArgMatches) -> Result<Self, Error> {
        let mut config = match cmds.get_one::<PathBuf>("config") {
            Some(path) => Self::from_file(path)?,
            None => Self::load_user()
                .or_else(Self::load_etc)
                .unwrap_or_default(),
        };
        config.apply(cmds);
        Ok(config)
    }

    /// Loads the config file and applies arguments and environment variables on top.
    pub fn load() -> Result<Self, Error> {
        Self::from_matches(&command().get_matches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.listener.address, ([127, 0, 0, 1], 3000).into());
        assert_eq!(config.itglue.api_url, "https://api.itglue.com");
        assert_eq!(config.notification.sendgrid_url, notify::SENDGRID_URL);
        assert_eq!(config.audit.time_zone, "UTC");
        assert_eq!(config.audit.date_order, DateOrder::DayFirst);
        assert!(config.endpoints.key.is_none());
        assert!(config.audit.timestamps().is_ok());
    }

    #[test]
    fn parses_sections() {
        let config: Config = toml::from_str(
            r#"
[listener]
address = "0.0.0.0:8080"

[itglue]
api_key = "itg"
asset_type_id = "42"
base_url = "https://contoso.itglue.com"

[audit]
time_zone = "Australia/Brisbane"
date_order = "month-first"

[log]
level = "DEBUG"
"#,
        )
        .unwrap();
        assert_eq!(config.listener.address, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.itglue.api_url, "https://api.itglue.com");
        assert_eq!(config.itglue.asset_type_id, "42");
        let timestamps = config.audit.timestamps().unwrap();
        assert_eq!(timestamps.zone(), Tz::Australia__Brisbane);
        assert_eq!(timestamps.order(), DateOrder::MonthFirst);
    }

    #[test]
    fn arguments_override_file() {
        let cmds = command()
            .try_get_matches_from([
                "lastrund",
                "--listening",
                "127.0.0.1:4000",
                "--api-key",
                "secret",
                "--asset-type-id",
                "7",
                "--emails-to",
                "a@example.com,b@example.com",
                "--date-order",
                "month-first",
                "--log-level",
                "trace",
            ])
            .unwrap();
        let mut config = Config::default();
        config.apply(&cmds);
        assert_eq!(config.listener.address, ([127, 0, 0, 1], 4000).into());
        assert_eq!(config.endpoints.key.as_deref(), Some("secret"));
        assert_eq!(config.itglue.asset_type_id, "7");
        assert_eq!(config.notification.to, "a@example.com,b@example.com");
        assert_eq!(config.audit.date_order, DateOrder::MonthFirst);
        assert_eq!(tracing::Level::from(config.log.level), tracing::Level::TRACE);
    }

    #[test]
    fn unknown_time_zone() {
        let audit = Audit {
            time_zone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(audit.timestamps(), Err(Error::TimeZone(_))));
    }
}
