//! Keyword intent classification for the local rule table.
//!
//! Matching is whole-word and case-insensitive, so "hi" does not fire on
//! "this" and "rent" does not fire on "parent". Categories are checked in a
//! fixed order: greeting, buy, rent, city, price; anything else is
//! [`Intent::Unknown`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Cities
// =============================================================================

/// Cities the rule table knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Mumbai,
    Bangalore,
    Delhi,
    Gurgaon,
}

impl City {
    pub const ALL: [City; 4] = [City::Mumbai, City::Bangalore, City::Delhi, City::Gurgaon];

    /// Name as it appears in listing locations.
    pub fn name(&self) -> &'static str {
        match self {
            City::Mumbai => "Mumbai",
            City::Bangalore => "Bangalore",
            City::Delhi => "Delhi",
            City::Gurgaon => "Gurgaon",
        }
    }

    /// Neighbourhoods and alternate spellings that also name the city.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            City::Mumbai => &["bandra"],
            City::Bangalore => &["bengaluru", "koramangala", "whitefield"],
            City::Delhi => &["new delhi", "connaught place"],
            City::Gurgaon => &["gurugram"],
        }
    }

    /// Lowercase value of the `location` query parameter.
    pub fn slug(&self) -> &'static str {
        match self {
            City::Mumbai => "mumbai",
            City::Bangalore => "bangalore",
            City::Delhi => "delhi",
            City::Gurgaon => "gurgaon",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Intent
// =============================================================================

/// What a user message is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    /// Buying, optionally narrowed to a city ("buy in Mumbai").
    Buy { city: Option<City> },
    /// Renting, optionally narrowed to a city.
    Rent { city: Option<City> },
    City(City),
    PriceQuery,
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Greeting => write!(f, "greeting"),
            Intent::Buy { city: None } => write!(f, "buy"),
            Intent::Buy { city: Some(c) } => write!(f, "buy:{}", c.slug()),
            Intent::Rent { city: None } => write!(f, "rent"),
            Intent::Rent { city: Some(c) } => write!(f, "rent:{}", c.slug()),
            Intent::City(c) => write!(f, "city:{}", c.slug()),
            Intent::PriceQuery => write!(f, "price"),
            Intent::Unknown => write!(f, "unknown"),
        }
    }
}

/// Compiled keyword patterns. Build once and share.
pub struct IntentClassifier {
    greeting: Regex,
    buy: Regex,
    rent: Regex,
    price: Regex,
    cities: Vec<(City, Regex)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        let cities = City::ALL
            .iter()
            .map(|city| {
                let mut words = vec![regex::escape(&city.name().to_lowercase())];
                words.extend(city.aliases().iter().map(|a| word_pattern(a)));
                let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
                (
                    *city,
                    Regex::new(&pattern).expect("Invalid city regex"),
                )
            })
            .collect();

        Self {
            greeting: Regex::new(
                r"(?i)\b(?:hello|hi|hey|hiya|namaste|good\s+(?:morning|afternoon|evening))\b",
            )
            .expect("Invalid greeting regex"),
            buy: Regex::new(r"(?i)\b(?:buy|buying|purchase|purchasing)\b")
                .expect("Invalid buy regex"),
            rent: Regex::new(r"(?i)\b(?:rent|rental|rentals|renting|lease)\b")
                .expect("Invalid rent regex"),
            price: Regex::new(r"(?i)\b(?:price|prices|pricing|cost|costs|budget|rate|rates)\b")
                .expect("Invalid price regex"),
            cities,
        }
    }

    pub fn classify(&self, message: &str) -> Intent {
        if self.greeting.is_match(message) {
            return Intent::Greeting;
        }
        if self.buy.is_match(message) {
            return Intent::Buy {
                city: self.city(message),
            };
        }
        if self.rent.is_match(message) {
            return Intent::Rent {
                city: self.city(message),
            };
        }
        if let Some(city) = self.city(message) {
            return Intent::City(city);
        }
        if self.price.is_match(message) {
            return Intent::PriceQuery;
        }
        Intent::Unknown
    }

    /// First known city named in the message.
    pub fn city(&self, message: &str) -> Option<City> {
        self.cities
            .iter()
            .find(|(_, re)| re.is_match(message))
            .map(|(city, _)| *city)
    }
}

/// Escape a phrase and let any run of whitespace separate its words.
fn word_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

// =============================================================================
// Offer and hedge checks
// =============================================================================

static AFFIRMATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:yes|yeah|yep|yup|sure|ok|okay|please|definitely|absolutely)\b")
        .expect("Invalid affirmative regex")
});

static NEGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no|not|nope|nah|never|don't|dont)\b").expect("Invalid negation regex")
});

/// A negation as the very next word, with nothing but whitespace before it.
static NEGATION_NEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s+(?:no|not|nope|nah|never|don't|dont)\b")
        .expect("Invalid negation regex")
});

const HEDGES: [&str; 3] = ["i don't know", "not sure", "unclear"];

/// Whether a reply to an escalation offer accepts it.
///
/// Needs an affirmative word. A negation anywhere before the first one, or
/// immediately after any one ("ok not now"), cancels it. "yes please" and
/// "sure, not a problem" accept; "not sure" and "no thanks" do not.
pub fn is_affirmative(message: &str) -> bool {
    let normalized = normalize_quotes(message);
    let Some(first) = AFFIRMATIVE.find(&normalized) else {
        return false;
    };
    if NEGATION.is_match(&normalized[..first.start()]) {
        return false;
    }
    !AFFIRMATIVE
        .find_iter(&normalized)
        .any(|m| NEGATION_NEXT.is_match(&normalized[m.end()..]))
}

/// Whether a remote reply admits it cannot answer.
pub fn contains_hedge(reply: &str) -> bool {
    let lower = normalize_quotes(reply).to_lowercase();
    HEDGES.iter().any(|h| lower.contains(h))
}

fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
}
