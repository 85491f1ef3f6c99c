use crate::{context::ApplicantType, text};

/// Slovak substrings that mark an eligible-applicants description as admitting a category.
/// Matched against the lower-cased NFC text. Order within a row does not matter.
pub const APPLICANT_MARKERS: &[(ApplicantType, &[&str])] = &[
	(
		ApplicantType::PrivateCompany,
		&[
			"podnik",
			"podnikateľ",
			"msp",
			"firma",
			"firmy",
			"spoločnos",
			"s.r.o",
			"a.s.",
			"živnostník",
			"samostatne zárobkovo",
			"obchodná spoločnosť",
		],
	),
	(
		ApplicantType::Municipality,
		&[
			"obec",
			"obce",
			"obcí",
			"mesto",
			"mestá",
			"miest a obcí",
			"mestsk",
			"samospráv",
			"samosprávny kraj",
			"vúc",
		],
	),
	(
		ApplicantType::StateInstitution,
		&[
			"štátn",
			"ministerstv",
			"ústredný orgán",
			"verejná správa",
			"verejnej správy",
			"rozpočtová organizácia",
			"príspevková organizácia",
		],
	),
	(
		ApplicantType::NonProfit,
		&[
			"neziskov",
			"mimovládn",
			"občianske združenie",
			"združeni",
			"nadáci",
			"neinvestičný fond",
			"cirkev",
		],
	),
];

pub fn markers_for(applicant: ApplicantType) -> &'static [&'static str] {
	APPLICANT_MARKERS
		.iter()
		.find(|(kind, _)| *kind == applicant)
		.map(|(_, markers)| *markers)
		.unwrap_or(&[])
}

/// Whether a call with the given eligibility text admits `applicant`.
///
/// Missing or blank text is unrestricted.
pub fn applicant_matches(eligible_applicants: Option<&str>, applicant: ApplicantType) -> bool {
	let Some(raw) = eligible_applicants.filter(|raw| !raw.trim().is_empty()) else {
		return true;
	};

	text::contains_any(&text::fold(raw), markers_for(applicant))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_category_has_markers() {
		for applicant in ApplicantType::ALL {
			assert!(!markers_for(applicant).is_empty(), "{applicant:?} has no markers");
		}
	}

	#[test]
	fn municipality_markers_do_not_match_employees() {
		assert!(!applicant_matches(Some("Zamestnanci a zamestnávatelia"), ApplicantType::Municipality));
	}
}
