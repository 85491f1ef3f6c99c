use crate::text;

/// Phrases that exclude the region mentioned next to them, e.g. "celé SR okrem Bratislavského
/// kraja". Matched as whole words, so "mimoriadna" is not an exclusion.
pub const EXCLUSION_MARKERS: &[&str] = &["okrem", "mimo", "s výnimkou", "vynímajúc", "vynimkou"];

pub const NATIONWIDE_MARKERS: &[&str] = &[
	"celé sr",
	"celá sr",
	"celej sr",
	"celé slovensko",
	"celého slovenska",
	"celoslovensk",
	"celé územie",
	"celého územia",
	"všetky kraje",
	"všetky regióny",
	"slovenská republika",
];

/// The eight self-governing regions and the stems that identify them in free text, including
/// declined forms and the seat city.
pub const REGION_MARKERS: &[(&str, &[&str])] = &[
	("Bratislavský", &["bratislav"]),
	("Trnavský", &["trnav"]),
	("Trenčiansky", &["trenčian", "trenčín"]),
	("Nitriansky", &["nitrian", "nitra", "nitre"]),
	("Žilinský", &["žilin"]),
	("Banskobystrický", &["banskobystr", "banská bystrica", "banskej bystrici"]),
	("Prešovský", &["prešov"]),
	("Košický", &["košic", "košíc", "košick"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionVerdict {
	/// No scope text.
	Unrestricted,
	Excluded,
	Nationwide,
	Included,
	/// Names only other regions.
	OtherRegion,
	/// Nothing recognizable; kept.
	Ambiguous,
}
impl RegionVerdict {
	pub fn keeps(self) -> bool {
		!matches!(self, Self::Excluded | Self::OtherRegion)
	}
}

/// Stems used to find `region` in scope text. Unknown region names fall back to their own
/// folded text.
pub fn region_stems(region: &str) -> Vec<String> {
	let folded = text::fold(region.trim());

	for (_, stems) in REGION_MARKERS {
		if stems.iter().any(|stem| folded.contains(stem)) {
			return stems.iter().map(|stem| stem.to_string()).collect();
		}
	}

	vec![folded]
}

pub fn region_verdict(geographic_scope: Option<&str>, region: &str) -> RegionVerdict {
	let Some(raw) = geographic_scope.filter(|raw| !raw.trim().is_empty()) else {
		return RegionVerdict::Unrestricted;
	};
	let scope = text::fold(raw);
	let stems = region_stems(region);
	let mentions_region = stems.iter().any(|stem| !stem.is_empty() && scope.contains(stem.as_str()));

	if mentions_region
		&& EXCLUSION_MARKERS.iter().any(|marker| text::contains_phrase(&scope, marker))
	{
		return RegionVerdict::Excluded;
	}
	if text::contains_any(&scope, NATIONWIDE_MARKERS) {
		return RegionVerdict::Nationwide;
	}
	if mentions_region {
		return RegionVerdict::Included;
	}
	if REGION_MARKERS.iter().any(|(_, other)| text::contains_any(&scope, other)) {
		return RegionVerdict::OtherRegion;
	}

	RegionVerdict::Ambiguous
}
