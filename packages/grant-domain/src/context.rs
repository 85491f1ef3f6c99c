use serde::{Deserialize, Serialize};

/// Who is asking for funding. Closed set; anything else is treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicantType {
	#[serde(rename = "sukromna_firma")]
	PrivateCompany,
	#[serde(rename = "obec")]
	Municipality,
	#[serde(rename = "statna_institucia")]
	StateInstitution,
	#[serde(rename = "neziskovka")]
	NonProfit,
}
impl ApplicantType {
	pub const ALL: [Self; 4] =
		[Self::PrivateCompany, Self::Municipality, Self::StateInstitution, Self::NonProfit];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::PrivateCompany => "sukromna_firma",
			Self::Municipality => "obec",
			Self::StateInstitution => "statna_institucia",
			Self::NonProfit => "neziskovka",
		}
	}
}

/// Hints accumulated about the requester. Every field is optional and absence means the
/// dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchContext {
	pub sector: Option<String>,
	pub region: Option<String>,
	pub applicant_type: Option<ApplicantType>,
	pub funding_focus: Option<String>,
	pub keywords: Vec<String>,
}
impl SearchContext {
	pub fn is_empty(&self) -> bool {
		self.sector.is_none()
			&& self.region.is_none()
			&& self.applicant_type.is_none()
			&& self.funding_focus.is_none()
			&& self.keywords.is_empty()
	}

	/// Overlays `newer` on top of `self`. Present fields win; a non-empty keyword list replaces
	/// the stored one.
	pub fn merge(self, newer: SearchContext) -> SearchContext {
		SearchContext {
			sector: newer.sector.or(self.sector),
			region: newer.region.or(self.region),
			applicant_type: newer.applicant_type.or(self.applicant_type),
			funding_focus: newer.funding_focus.or(self.funding_focus),
			keywords: if newer.keywords.is_empty() { self.keywords } else { newer.keywords },
		}
	}

	pub fn region(&self) -> Option<&str> {
		non_blank(self.region.as_deref())
	}

	pub fn funding_focus(&self) -> Option<&str> {
		non_blank(self.funding_focus.as_deref())
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
