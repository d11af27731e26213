//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fortuna_domain::{HoroscopePeriod, TarotSpread, ZodiacSign};
use url::Url;

/// Fortune-telling API client.
#[derive(Debug, Parser)]
#[command(name = "fortuna", version, about)]
pub struct Cli {
    /// Settings file (defaults to ./fortuna.toml when present).
    #[arg(long, env = "FORTUNA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding settings.
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Credentials file, overriding settings.
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the issued tokens.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Create an account and sign in.
    Register {
        /// Display name.
        name: String,
        /// Account email.
        email: String,
        /// Account password.
        password: String,
        /// Birth date, `YYYY-MM-DD`.
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },
    /// Sign out and forget the stored tokens.
    Logout,
    /// Show the signed-in user's profile.
    Profile,
    /// Daily, weekly or monthly horoscope.
    Horoscope {
        /// Zodiac sign, e.g. `leo`.
        sign: ZodiacSign,
        /// Period.
        #[arg(default_value = "daily")]
        period: HoroscopePeriod,
    },
    /// Ask the cards a question.
    Tarot {
        /// The question.
        question: String,
        /// Card layout.
        #[arg(long, value_enum, default_value_t = Spread::Single)]
        spread: Spread,
    },
    /// Coffee-grounds reading from cup photos.
    Coffee {
        /// Photo files, one to three.
        #[arg(required = true)]
        photos: Vec<PathBuf>,
        /// Note for the reader.
        #[arg(long)]
        note: Option<String>,
    },
    /// Show whether the wheel of fortune can be spun.
    Wheel,
    /// Spin the wheel of fortune.
    Spin,
    /// List notifications.
    Notifications,
    /// Mark a notification as read.
    Read {
        /// Notification id.
        id: String,
    },
}

/// Tarot layouts accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Spread {
    /// One card.
    Single,
    /// Past, present, future.
    ThreeCard,
    /// Ten-card Celtic cross.
    CelticCross,
}

impl From<Spread> for TarotSpread {
    fn from(spread: Spread) -> Self {
        match spread {
            Spread::Single => Self::Single,
            Spread::ThreeCard => Self::ThreeCard,
            Spread::CelticCross => Self::CelticCross,
        }
    }
}
