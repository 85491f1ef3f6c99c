//! Heuristic extraction of [`SearchContext`] hints from a single chat message.
//!
//! Rules are plain tables so new sectors or phrasings can be added without touching the
//! extraction loop. The first matching row of each table decides its field; keywords accumulate
//! across all matching rows.

use unicode_segmentation::UnicodeSegmentation;

use crate::{
	context::{ApplicantType, SearchContext},
	geography::REGION_MARKERS,
	text,
};
use Marker::{Sub, Word};

#[derive(Debug, Clone, Copy)]
pub enum Marker {
	/// Substring of the folded message.
	Sub(&'static str),
	/// Whole word of the folded message.
	Word(&'static str),
}
impl Marker {
	fn hits(self, folded: &str, words: &[&str]) -> bool {
		match self {
			Self::Sub(needle) => folded.contains(needle),
			Self::Word(word) => words.contains(&word),
		}
	}
}

pub struct Rule<T: 'static> {
	pub markers: &'static [Marker],
	pub value: T,
	pub keywords: &'static [&'static str],
}

pub const SECTOR_RULES: &[Rule<&str>] = &[
	Rule {
		markers: &[Sub("poľnohospodár"), Sub("agro"), Sub("farm")],
		value: "poľnohospodárstvo",
		keywords: &["poľnohospodárstvo", "agro"],
	},
	Rule {
		markers: &[
			Word("it"),
			Sub("it-bezpe"),
			Sub("kyber"),
			Sub("cyber"),
			Sub("digital"),
			Sub("technol"),
		],
		value: "IT",
		keywords: &["IT", "kybernetická bezpečnosť", "digitalizácia"],
	},
	Rule {
		markers: &[Sub("zatepl"), Sub("energetick"), Sub("tepel"), Sub("obnov")],
		value: "energetická efektívnosť",
		keywords: &["zateplenie", "úspory energie"],
	},
];

pub const APPLICANT_RULES: &[Rule<ApplicantType>] = &[
	Rule {
		markers: &[
			Sub("združenie"),
			Sub("neziskov"),
			Sub("organizacia"),
			Sub("organizáci"),
			Sub("nadácia"),
		],
		value: ApplicantType::NonProfit,
		keywords: &[],
	},
	Rule {
		markers: &[Sub("štát"), Sub("ministerstvo"), Sub("úrad"), Sub("urad")],
		value: ApplicantType::StateInstitution,
		keywords: &[],
	},
	Rule {
		markers: &[Sub("obec"), Sub("mesto"), Sub("samospráva")],
		value: ApplicantType::Municipality,
		keywords: &[],
	},
	Rule {
		markers: &[
			Sub("firm"),
			Sub("podnik"),
			Sub("spoločnosť"),
			Sub("s.r.o."),
			Word("sro"),
			Sub("business"),
		],
		value: ApplicantType::PrivateCompany,
		keywords: &[],
	},
];

pub const FOCUS_RULES: &[Rule<&str>] = &[
	Rule {
		markers: &[Sub("kyber"), Sub("bezpečnosť"), Word("it")],
		value: "kybernetická bezpečnosť",
		keywords: &["kybernetická bezpečnosť", "IT", "hardware", "software"],
	},
	Rule {
		markers: &[Sub("výskum"), Sub("vývoj"), Sub("inováci")],
		value: "výskum a vývoj",
		keywords: &["výskum", "vývoj", "inovácie"],
	},
	Rule {
		markers: &[Sub("rozšírenie výroby"), Sub("výrobu"), Sub("vyrobu")],
		value: "rozšírenie výroby",
		keywords: &["rozšírenie výroby", "technológia"],
	},
	Rule {
		markers: &[Sub("poradenstvo"), Sub("vzdelan"), Sub("vzdeláv"), Sub("školeni")],
		value: "poradenstvo/vzdelávanie",
		keywords: &["poradenstvo", "vzdelávanie"],
	},
];

/// Derives context hints from `message`. Returns an empty context when no rule fires.
pub fn extract_context(message: &str) -> SearchContext {
	let folded = text::fold(message);
	let words: Vec<&str> = folded.unicode_words().collect();
	let mut ctx = SearchContext::default();

	ctx.sector = first_match(SECTOR_RULES, &folded, &words, &mut ctx.keywords).map(str::to_string);
	ctx.applicant_type = first_match(APPLICANT_RULES, &folded, &words, &mut ctx.keywords);
	ctx.funding_focus =
		first_match(FOCUS_RULES, &folded, &words, &mut ctx.keywords).map(str::to_string);
	ctx.region = REGION_MARKERS
		.iter()
		.find(|(_, stems)| text::contains_any(&folded, stems))
		.map(|(name, _)| name.to_string());

	ctx
}

fn first_match<T: Copy>(
	rules: &[Rule<T>],
	folded: &str,
	words: &[&str],
	keywords: &mut Vec<String>,
) -> Option<T> {
	let mut value = None;

	for rule in rules {
		if !rule.markers.iter().any(|marker| marker.hits(folded, words)) {
			continue;
		}

		value = value.or(Some(rule.value));

		for keyword in rule.keywords {
			if !keywords.iter().any(|existing| existing == keyword) {
				keywords.push(keyword.to_string());
			}
		}
	}

	value
}
