/// Case-insensitive membership in the accepted open-status set. Anything else is closed.
pub fn is_open_status<S>(status: &str, open_statuses: &[S]) -> bool
where
	S: AsRef<str>,
{
	let status = status.trim().to_lowercase();

	!status.is_empty() && open_statuses.iter().any(|open| open.as_ref().to_lowercase() == status)
}
