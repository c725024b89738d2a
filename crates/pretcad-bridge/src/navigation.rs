//! Results page resolution.

use pretcad_common::Result;
use url::Url;

/// Resolve the results page as a sibling of the current page, the way a
/// browser resolves a relative link: the last path segment (`index.html`,
/// `index`, or nothing after a trailing slash) is replaced, and the query and
/// fragment are dropped.
pub fn results_target(current: &Url, results_page: &str) -> Result<Url> {
    Ok(current.join(results_page)?)
}
