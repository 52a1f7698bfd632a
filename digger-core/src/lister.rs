use crate::error::Result;
use crate::model::Candidate;
use digger_scanner::ContentFetcher;
use digger_scanner::patterns::extract_candidate_ids;
use tracing::info;

/// Fetch the listing page and turn each row link into a [`Candidate`].
///
/// Unlike the per-item stages, a failed listing fetch aborts the run: there
/// is nothing meaningful to feed the rest of the pipeline.
pub async fn list_candidates<F: ContentFetcher + ?Sized>(
    fetcher: &F,
    listing_url: &str,
    metadata_url: impl Fn(&str) -> String,
) -> Result<Vec<Candidate>> {
    let page = fetcher.fetch(listing_url).await?;

    let candidates: Vec<Candidate> = extract_candidate_ids(&page.body)
        .into_iter()
        .map(|id| {
            let url = metadata_url(&id);
            Candidate::new(id, url)
        })
        .collect();

    info!("Listing {} yielded {} candidates", listing_url, candidates.len());
    Ok(candidates)
}
