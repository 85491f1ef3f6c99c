use grant_domain::{
	context::{ApplicantType, SearchContext},
	eligibility, extract,
	geography::{self, RegionVerdict},
	query::{self, GENERIC_QUERY},
	status,
};

#[test]
fn raw_message_outranks_context_hints() {
	let ctx = SearchContext {
		funding_focus: Some("výskum a vývoj".to_string()),
		sector: Some("IT".to_string()),
		..Default::default()
	};

	assert_eq!(
		query::build_search_query(&ctx, "  dotácia na nový stroj  ", 300),
		"dotácia na nový stroj"
	);
}

#[test]
fn context_hints_join_in_priority_order() {
	let ctx = SearchContext {
		sector: Some("IT".to_string()),
		region: Some("Košický".to_string()),
		funding_focus: Some("kybernetická bezpečnosť".to_string()),
		keywords: vec!["hardware".to_string(), " ".to_string(), "software".to_string()],
		..Default::default()
	};

	assert_eq!(
		query::build_search_query(&ctx, "   ", 300),
		"kybernetická bezpečnosť IT Košický hardware software"
	);
}

#[test]
fn empty_inputs_yield_generic_query() {
	assert_eq!(query::build_search_query(&SearchContext::default(), "", 300), GENERIC_QUERY);
}

#[test]
fn fallback_tokens_for_slovak_message() {
	assert_eq!(
		query::fallback_tokens("digitalizácia výroby", 2, 4),
		vec!["digitalizácia".to_string(), "výroby".to_string()]
	);
	assert!(query::fallback_tokens("IT a EU", 2, 4).is_empty());
}

#[test]
fn geography_verdicts_follow_rule_order() {
	assert_eq!(geography::region_verdict(None, "Košický"), RegionVerdict::Unrestricted);
	assert_eq!(geography::region_verdict(Some("  "), "Košický"), RegionVerdict::Unrestricted);
	assert_eq!(geography::region_verdict(Some("celé SR"), "Košický"), RegionVerdict::Nationwide);
	assert_eq!(
		geography::region_verdict(Some("Košický samosprávny kraj"), "Košický"),
		RegionVerdict::Included
	);
	assert_eq!(
		geography::region_verdict(Some("Bratislavský kraj"), "Košický"),
		RegionVerdict::OtherRegion
	);
	assert_eq!(
		geography::region_verdict(Some("menej rozvinuté regióny"), "Košický"),
		RegionVerdict::Ambiguous
	);
	assert_eq!(
		geography::region_verdict(Some("Slovensko mimo Košického kraja"), "Košický"),
		RegionVerdict::Excluded
	);
	assert!(RegionVerdict::Ambiguous.keeps());
	assert!(!RegionVerdict::OtherRegion.keeps());
}

#[test]
fn eligibility_markers_per_category() {
	let cases = [
		("Mikro, malé a stredné podniky", ApplicantType::PrivateCompany),
		("Obce a mestá do 5000 obyvateľov", ApplicantType::Municipality),
		("Ministerstvá a ostatné ústredné orgány štátnej správy", ApplicantType::StateInstitution),
		("Mimovládne neziskové organizácie, občianske združenia", ApplicantType::NonProfit),
	];

	for (text, applicant) in cases {
		assert!(eligibility::applicant_matches(Some(text), applicant), "{applicant:?}: {text}");
	}

	assert!(!eligibility::applicant_matches(
		Some("Mikro, malé a stredné podniky"),
		ApplicantType::Municipality
	));
	assert!(eligibility::applicant_matches(None, ApplicantType::NonProfit));
}

#[test]
fn open_status_set_is_case_insensitive() {
	let open = grant_open_statuses();

	assert!(status::is_open_status("Otvorená", &open));
	assert!(!status::is_open_status("uzavretá", &open));
}

#[test]
fn extraction_finds_region_and_applicant() {
	let ctx = extract::extract_context("Sme obec pri Žiline a chceme zatepliť škôlku");

	assert_eq!(ctx.region.as_deref(), Some("Žilinský"));
	assert_eq!(ctx.applicant_type, Some(ApplicantType::Municipality));
	assert_eq!(ctx.sector.as_deref(), Some("energetická efektívnosť"));
	assert!(ctx.keywords.contains(&"zateplenie".to_string()));
}

#[test]
fn extraction_of_plain_greeting_is_empty() {
	assert!(extract::extract_context("Dobrý deň").is_empty());
}

fn grant_open_statuses() -> Vec<String> {
	["open", "otvorená", "aktívna"].iter().map(|s| s.to_string()).collect()
}
