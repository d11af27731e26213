//! Reading types returned by the fortune endpoints.
//!
//! Tarot, coffee-cup and horoscope readings are generated entirely by the
//! backend; these types only describe the wire shapes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The twelve zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    /// Mar 21 – Apr 19
    Aries,
    /// Apr 20 – May 20
    Taurus,
    /// May 21 – Jun 20
    Gemini,
    /// Jun 21 – Jul 22
    Cancer,
    /// Jul 23 – Aug 22
    Leo,
    /// Aug 23 – Sep 22
    Virgo,
    /// Sep 23 – Oct 22
    Libra,
    /// Oct 23 – Nov 21
    Scorpio,
    /// Nov 22 – Dec 21
    Sagittarius,
    /// Dec 22 – Jan 19
    Capricorn,
    /// Jan 20 – Feb 18
    Aquarius,
    /// Feb 19 – Mar 20
    Pisces,
}

impl ZodiacSign {
    /// All signs in calendar order starting from Aries.
    pub const ALL: [Self; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// Returns the lowercase name used in API paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZodiacSign {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sign| sign.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownZodiacSign(s.to_string()))
    }
}

/// Time span a horoscope covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoroscopePeriod {
    /// Today's horoscope.
    #[default]
    Daily,
    /// This week's horoscope.
    Weekly,
    /// This month's horoscope.
    Monthly,
}

impl HoroscopePeriod {
    /// Returns the query value for this period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for HoroscopePeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(DomainError::UnknownHoroscopePeriod(s.to_string())),
        }
    }
}

/// A generated horoscope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horoscope {
    /// Sign the horoscope is for.
    pub sign: ZodiacSign,
    /// Period covered.
    pub period: HoroscopePeriod,
    /// First day covered.
    pub date: NaiveDate,
    /// Reading text.
    pub text: String,
    /// Optional lucky number.
    #[serde(default)]
    pub lucky_number: Option<u32>,
}

/// Card layouts the tarot endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TarotSpread {
    /// One card.
    #[default]
    Single,
    /// Past, present and future.
    ThreeCard,
    /// Ten-card Celtic cross.
    CelticCross,
}

/// Body of the tarot reading endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotReadingRequest {
    /// The question asked.
    pub question: String,
    /// Requested layout.
    #[serde(default)]
    pub spread: TarotSpread,
}

/// One drawn card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotCard {
    /// Card name, e.g. "The Tower".
    pub name: String,
    /// Whether the card was drawn upside down.
    #[serde(default)]
    pub reversed: bool,
    /// Position label within the spread.
    #[serde(default)]
    pub position: Option<String>,
    /// Meaning of the card in this position.
    pub meaning: String,
}

/// A completed tarot reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotReading {
    /// Reading id.
    pub id: String,
    /// Cards drawn in order.
    pub cards: Vec<TarotCard>,
    /// Overall interpretation.
    pub summary: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Body of the coffee-cup reading endpoint.
///
/// Photos travel base64-encoded inside the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeReadingRequest {
    /// Base64-encoded JPEG or PNG photos of the cup.
    pub images: Vec<String>,
    /// Optional note for the reader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A coffee-cup reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeReading {
    /// Reading id.
    pub id: String,
    /// Interpretation text.
    pub text: String,
    /// Symbols spotted in the grounds.
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zodiac_sign_parse() {
        assert_eq!("Leo".parse::<ZodiacSign>().unwrap(), ZodiacSign::Leo);
        assert_eq!(" pisces ".parse::<ZodiacSign>().unwrap(), ZodiacSign::Pisces);
        assert_eq!(
            "ophiuchus".parse::<ZodiacSign>(),
            Err(DomainError::UnknownZodiacSign("ophiuchus".to_string()))
        );
    }

    #[test]
    fn test_horoscope_wire_format() {
        let horoscope: Horoscope = serde_json::from_value(serde_json::json!({
            "sign": "virgo",
            "period": "weekly",
            "date": "2026-10-19",
            "text": "A quiet week.",
            "luckyNumber": 7
        }))
        .unwrap();
        assert_eq!(horoscope.sign, ZodiacSign::Virgo);
        assert_eq!(horoscope.period, HoroscopePeriod::Weekly);
        assert_eq!(horoscope.lucky_number, Some(7));
    }

    #[test]
    fn test_tarot_request_serializes_spread() {
        let body = serde_json::to_value(TarotReadingRequest {
            question: "Will it rain?".to_string(),
            spread: TarotSpread::ThreeCard,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"question": "Will it rain?", "spread": "three_card"})
        );
    }
}
