//! The vocabulary studied during review, with etymology breakdowns.

use crate::catalog::{PartOfSpeech, Theme};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One meaningful piece of a word (prefix, root or suffix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    pub part: String,
    pub gloss: String,
}

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordData {
    pub word: String,
    pub phonetic: String,
    pub part_of_speech: PartOfSpeech,
    pub meaning: String,
    pub components: Vec<Morpheme>,
    /// The picture the roots paint.
    pub origin_image: String,
    /// How the picture turns into today's meaning.
    pub logic_chain: String,
    pub nuance: String,
    pub quote: Option<String>,
    pub themes: Vec<Theme>,
}

impl WordData {
    /// Whether this entry carries the given theme tag.
    pub fn has_theme(&self, theme: Theme) -> bool {
        self.themes.contains(&theme)
    }

    /// Number of letters in the headword.
    pub fn letter_count(&self) -> usize {
        self.word.chars().filter(|c| c.is_alphabetic()).count()
    }
}

/// The full vocabulary shared by every grimoire.
pub fn vocabulary() -> &'static [WordData] {
    &VOCABULARY
}

struct Entry {
    word: &'static str,
    phonetic: &'static str,
    pos: PartOfSpeech,
    meaning: &'static str,
    components: &'static [(&'static str, &'static str)],
    origin_image: &'static str,
    logic_chain: &'static str,
    nuance: &'static str,
    quote: Option<&'static str>,
    themes: &'static [Theme],
}

impl From<&Entry> for WordData {
    fn from(entry: &Entry) -> Self {
        Self {
            word: entry.word.to_string(),
            phonetic: entry.phonetic.to_string(),
            part_of_speech: entry.pos,
            meaning: entry.meaning.to_string(),
            components: entry
                .components
                .iter()
                .map(|(part, gloss)| Morpheme {
                    part: part.to_string(),
                    gloss: gloss.to_string(),
                })
                .collect(),
            origin_image: entry.origin_image.to_string(),
            logic_chain: entry.logic_chain.to_string(),
            nuance: entry.nuance.to_string(),
            quote: entry.quote.map(str::to_string),
            themes: entry.themes.to_vec(),
        }
    }
}

static VOCABULARY: Lazy<Vec<WordData>> = Lazy::new(|| ENTRIES.iter().map(WordData::from).collect());

use PartOfSpeech::{Adjective, Noun, Verb};
use Theme::{Heart, Light, Mind, Motion, Nature, Power, Shadow, Time};

const ENTRIES: &[Entry] = &[
    Entry {
        word: "illuminate",
        phonetic: "/ɪˈluːmɪneɪt/",
        pos: Verb,
        meaning: "to light up; to make clear",
        components: &[("il-", "into"), ("lumin", "light"), ("-ate", "to make")],
        origin_image: "A lamp carried into a dark room.",
        logic_chain: "into + light → bring light into something → make it visible or clear",
        nuance: "Works for rooms and for ideas; an explanation can illuminate a problem.",
        quote: Some("Knowledge illuminates the path it walks."),
        themes: &[Light, Mind],
    },
    Entry {
        word: "lucid",
        phonetic: "/ˈluːsɪd/",
        pos: Adjective,
        meaning: "clear and easy to understand",
        components: &[("luc", "light"), ("-id", "having the quality of")],
        origin_image: "Water so bright you can see the riverbed.",
        logic_chain: "full of light → transparent → easy to see through → easy to understand",
        nuance: "Often used for writing, speech, or a mind that is briefly clear.",
        quote: None,
        themes: &[Light, Mind],
    },
    Entry {
        word: "radiant",
        phonetic: "/ˈreɪdiənt/",
        pos: Adjective,
        meaning: "sending out light; glowing with joy",
        components: &[("radi", "ray, spoke"), ("-ant", "doing")],
        origin_image: "Spokes of light leaving the sun in every direction.",
        logic_chain: "giving off rays → shining → visibly happy",
        nuance: "Describes faces and smiles as naturally as it describes heat.",
        quote: None,
        themes: &[Light, Heart],
    },
    Entry {
        word: "translucent",
        phonetic: "/trænzˈluːsənt/",
        pos: Adjective,
        meaning: "letting light pass through, but not clearly",
        components: &[("trans-", "through"), ("luc", "light"), ("-ent", "being")],
        origin_image: "Morning sun through a paper lantern.",
        logic_chain: "light going through → glowing surface → not fully transparent",
        nuance: "Softer than transparent: you see the glow but not the shapes.",
        quote: None,
        themes: &[Light],
    },
    Entry {
        word: "eclipse",
        phonetic: "/ɪˈklɪps/",
        pos: Noun,
        meaning: "the blocking of one celestial body by another; a loss of importance",
        components: &[("ec-", "out"), ("leip", "to leave")],
        origin_image: "The sun abandoning the sky at noon.",
        logic_chain: "leaving out → light disappears → something overshadowed",
        nuance: "Figuratively, one success can eclipse another.",
        quote: None,
        themes: &[Shadow, Time],
    },
    Entry {
        word: "obscure",
        phonetic: "/əbˈskjʊə/",
        pos: Adjective,
        meaning: "not well known; hard to understand",
        components: &[("ob-", "over"), ("scur", "covered")],
        origin_image: "A cloak thrown over a lantern.",
        logic_chain: "covered over → dark → unseen → unknown or unclear",
        nuance: "An obscure poet is little known; an obscure passage is hard to read.",
        quote: None,
        themes: &[Shadow, Mind],
    },
    Entry {
        word: "nocturnal",
        phonetic: "/nɒkˈtɜːnəl/",
        pos: Adjective,
        meaning: "active at night",
        components: &[("noct", "night"), ("-urnal", "belonging to")],
        origin_image: "An owl opening its eyes as the town falls asleep.",
        logic_chain: "belonging to the night → happening or living at night",
        nuance: "Used for animals, habits, and the people who keep them.",
        quote: None,
        themes: &[Shadow, Time],
    },
    Entry {
        word: "somnambulist",
        phonetic: "/sɒmˈnæmbjʊlɪst/",
        pos: Noun,
        meaning: "a person who walks in their sleep",
        components: &[("somn", "sleep"), ("ambul", "walk"), ("-ist", "one who")],
        origin_image: "A figure crossing a moonlit hall with closed eyes.",
        logic_chain: "sleep + walk + person → someone walking while asleep",
        nuance: "Literary and a little eerie compared to 'sleepwalker'.",
        quote: None,
        themes: &[Shadow, Motion],
    },
    Entry {
        word: "benevolent",
        phonetic: "/bəˈnevələnt/",
        pos: Adjective,
        meaning: "kind and wishing good for others",
        components: &[("bene", "well"), ("vol", "wish"), ("-ent", "being")],
        origin_image: "An open hand offering bread.",
        logic_chain: "wishing well → kindly disposed → generous",
        nuance: "Often describes rulers, spirits, or institutions acting kindly.",
        quote: Some("A benevolent wind fills every sail."),
        themes: &[Heart],
    },
    Entry {
        word: "cordial",
        phonetic: "/ˈkɔːdiəl/",
        pos: Adjective,
        meaning: "warm and friendly",
        components: &[("cord", "heart"), ("-ial", "relating to")],
        origin_image: "A drink offered to warm the chest on a cold night.",
        logic_chain: "of the heart → heartfelt → politely warm",
        nuance: "Polite warmth; cordial relations are friendly but not intimate.",
        quote: None,
        themes: &[Heart],
    },
    Entry {
        word: "amiable",
        phonetic: "/ˈeɪmiəbəl/",
        pos: Adjective,
        meaning: "friendly and pleasant",
        components: &[("ami", "friend, love"), ("-able", "worthy of")],
        origin_image: "A neighbor waving over the garden wall.",
        logic_chain: "worthy of love → likable → easygoing and friendly",
        nuance: "Describes temperament rather than a single act.",
        quote: None,
        themes: &[Heart],
    },
    Entry {
        word: "sympathy",
        phonetic: "/ˈsɪmpəθi/",
        pos: Noun,
        meaning: "feeling of care for someone else's trouble",
        components: &[("sym-", "together"), ("path", "feeling"), ("-y", "state")],
        origin_image: "Two strings vibrating when only one is plucked.",
        logic_chain: "feeling together → sharing a feeling → compassion",
        nuance: "Feeling for someone; empathy is feeling with them.",
        quote: None,
        themes: &[Heart, Mind],
    },
    Entry {
        word: "ambulate",
        phonetic: "/ˈæmbjʊleɪt/",
        pos: Verb,
        meaning: "to walk or move about",
        components: &[("ambul", "walk"), ("-ate", "to do")],
        origin_image: "A patient taking the first steps down a hospital corridor.",
        logic_chain: "to walk → to move around on foot",
        nuance: "Clinical in tone; the root also gives 'ambulance'.",
        quote: None,
        themes: &[Motion],
    },
    Entry {
        word: "transmit",
        phonetic: "/trænzˈmɪt/",
        pos: Verb,
        meaning: "to send from one place or person to another",
        components: &[("trans-", "across"), ("mit", "send")],
        origin_image: "A messenger handing a sealed letter over a river.",
        logic_chain: "send across → pass along → broadcast or pass on",
        nuance: "Signals, diseases and traditions can all be transmitted.",
        quote: None,
        themes: &[Motion, Power],
    },
    Entry {
        word: "progress",
        phonetic: "/ˈprəʊɡres/",
        pos: Noun,
        meaning: "forward movement toward a goal",
        components: &[("pro-", "forward"), ("gress", "step")],
        origin_image: "Footprints climbing a mountain trail.",
        logic_chain: "stepping forward → advancing → improvement over time",
        nuance: "Stress shifts to the second syllable when used as a verb.",
        quote: None,
        themes: &[Motion, Time],
    },
    Entry {
        word: "velocity",
        phonetic: "/vəˈlɒsəti/",
        pos: Noun,
        meaning: "speed in a given direction",
        components: &[("veloc", "swift"), ("-ity", "quality")],
        origin_image: "An arrow leaving the bowstring.",
        logic_chain: "swiftness → rate of motion → speed with direction",
        nuance: "Technical; in physics it always includes direction.",
        quote: None,
        themes: &[Motion],
    },
    Entry {
        word: "invoke",
        phonetic: "/ɪnˈvəʊk/",
        pos: Verb,
        meaning: "to call upon a power, law or idea",
        components: &[("in-", "upon"), ("voc", "call")],
        origin_image: "A priestess raising her arms to call the gods.",
        logic_chain: "call upon → appeal to a higher power → cite as authority",
        nuance: "You can invoke a spirit, a rule, or a famous name.",
        quote: None,
        themes: &[Power, Mind],
    },
    Entry {
        word: "dominate",
        phonetic: "/ˈdɒmɪneɪt/",
        pos: Verb,
        meaning: "to control or have power over",
        components: &[("domin", "lord, master"), ("-ate", "to act as")],
        origin_image: "A lord looking down from the castle keep.",
        logic_chain: "act as lord → rule → be the strongest presence",
        nuance: "A building can dominate a skyline without ruling anyone.",
        quote: None,
        themes: &[Power],
    },
    Entry {
        word: "potent",
        phonetic: "/ˈpəʊtənt/",
        pos: Adjective,
        meaning: "having great power or effect",
        components: &[("pot", "able, powerful"), ("-ent", "being")],
        origin_image: "A single drop of elixir turning the water gold.",
        logic_chain: "being able → powerful → strong in effect",
        nuance: "Frequently used for medicines, drinks, and arguments.",
        quote: None,
        themes: &[Power],
    },
    Entry {
        word: "construct",
        phonetic: "/kənˈstrʌkt/",
        pos: Verb,
        meaning: "to build or put together",
        components: &[("con-", "together"), ("struct", "pile up, build")],
        origin_image: "Stones stacked one upon another into a tower.",
        logic_chain: "pile together → build → assemble an object or idea",
        nuance: "As a noun (CON-struct) it means an idea built by the mind.",
        quote: None,
        themes: &[Power, Nature],
    },
    Entry {
        word: "verdant",
        phonetic: "/ˈvɜːdənt/",
        pos: Adjective,
        meaning: "green with growing plants",
        components: &[("verd", "green"), ("-ant", "being")],
        origin_image: "A valley after spring rain.",
        logic_chain: "being green → covered in vegetation → fresh and lush",
        nuance: "Poetic; can also mean young and inexperienced.",
        quote: None,
        themes: &[Nature],
    },
    Entry {
        word: "germinate",
        phonetic: "/ˈdʒɜːmɪneɪt/",
        pos: Verb,
        meaning: "to begin to grow; to come into being",
        components: &[("germin", "sprout, bud"), ("-ate", "to do")],
        origin_image: "A seed cracking open in dark soil.",
        logic_chain: "to sprout → to start growing → an idea begins to develop",
        nuance: "Ideas and plans germinate as readily as seeds.",
        quote: None,
        themes: &[Nature, Time],
    },
    Entry {
        word: "terrestrial",
        phonetic: "/təˈrestriəl/",
        pos: Adjective,
        meaning: "of the earth or land",
        components: &[("terr", "earth"), ("-estrial", "belonging to")],
        origin_image: "Roots gripping the ground beneath an old oak.",
        logic_chain: "belonging to the earth → living on land → worldly",
        nuance: "Opposed to aquatic, celestial, or extraterrestrial.",
        quote: None,
        themes: &[Nature],
    },
    Entry {
        word: "florid",
        phonetic: "/ˈflɒrɪd/",
        pos: Adjective,
        meaning: "elaborately decorated; flushed red",
        components: &[("flor", "flower"), ("-id", "having the quality of")],
        origin_image: "A garden so full of blossoms it hides the path.",
        logic_chain: "flowery → richly ornamented → overly ornate",
        nuance: "Often critical: florid prose tries too hard.",
        quote: None,
        themes: &[Nature, Heart],
    },
    Entry {
        word: "chronicle",
        phonetic: "/ˈkrɒnɪkəl/",
        pos: Noun,
        meaning: "a record of events in time order",
        components: &[("chron", "time"), ("-icle", "small thing")],
        origin_image: "A monk adding one line to the year's ledger.",
        logic_chain: "things of time → a record kept by time → a history",
        nuance: "Also a verb: to chronicle a journey.",
        quote: None,
        themes: &[Time, Mind],
    },
    Entry {
        word: "perennial",
        phonetic: "/pəˈreniəl/",
        pos: Adjective,
        meaning: "lasting through many years; recurring",
        components: &[("per-", "through"), ("enn", "year"), ("-ial", "relating to")],
        origin_image: "A flower returning to the same spot every spring.",
        logic_chain: "through the years → lasting → constantly recurring",
        nuance: "A perennial problem keeps coming back.",
        quote: None,
        themes: &[Time, Nature],
    },
    Entry {
        word: "contemplate",
        phonetic: "/ˈkɒntəmpleɪt/",
        pos: Verb,
        meaning: "to think deeply about; to look at thoughtfully",
        components: &[("con-", "with"), ("templ", "sacred space"), ("-ate", "to do")],
        origin_image: "An augur marking out a patch of sky to read the birds.",
        logic_chain: "observe within the sacred space → watch carefully → think deeply",
        nuance: "Can mean considering a plan: to contemplate leaving.",
        quote: None,
        themes: &[Mind],
    },
    Entry {
        word: "cognition",
        phonetic: "/kɒɡˈnɪʃən/",
        pos: Noun,
        meaning: "the mental process of knowing",
        components: &[("co-", "together"), ("gnit", "know"), ("-ion", "act of")],
        origin_image: "Scattered pieces of a map joined into one picture.",
        logic_chain: "knowing together → coming to know → thinking",
        nuance: "Academic; 'cognitive' is its everyday adjective.",
        quote: None,
        themes: &[Mind],
    },
    Entry {
        word: "providence",
        phonetic: "/ˈprɒvɪdəns/",
        pos: Noun,
        meaning: "care or protection from a higher power; foresight",
        components: &[("pro-", "before"), ("vid", "see"), ("-ence", "state")],
        origin_image: "A watcher on the hill who sees the storm before the village does.",
        logic_chain: "seeing ahead → preparing in advance → guidance by fate",
        nuance: "Shares its roots with 'provide': seeing ahead lets you supply.",
        quote: Some("Providence favors the prepared mind."),
        themes: &[Time, Mind],
    },
    Entry {
        word: "auspicious",
        phonetic: "/ɔːˈspɪʃəs/",
        pos: Adjective,
        meaning: "promising success; favorable",
        components: &[("au", "bird"), ("spic", "look"), ("-ious", "full of")],
        origin_image: "Priests reading the flight of birds before a battle.",
        logic_chain: "watching birds → reading omens → a good omen → favorable",
        nuance: "Mostly for beginnings: an auspicious start.",
        quote: None,
        themes: &[Light, Time],
    },
];
