//! Ranking workflow: read the mission, summarize every CV concurrently,
//! then rank them all in a single call.

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::comparison::engine::MissionComparer;
use crate::errors::AppError;
use crate::extraction::DossierExtractor;
use crate::models::comparison::{ComparisonResult, CvSummary};
use crate::normalizer::normalize;
use crate::reader::{read_off_thread, RawDocument};

/// Raw-text excerpt carried by a CV whose extraction failed.
const PLACEHOLDER_PREVIEW_CHARS: usize = 200;

pub async fn rank_cvs(
    extractor: &DossierExtractor,
    comparer: &MissionComparer,
    mission: RawDocument,
    cvs: Vec<RawDocument>,
) -> Result<ComparisonResult, AppError> {
    let mission = read_off_thread(mission).await?;

    info!("Summarizing {} CVs", cvs.len());
    let summaries = join_all(cvs.into_iter().map(|doc| summarize(extractor, doc))).await;

    Ok(comparer.compare(&mission, &summaries).await?)
}

/// Never fails: an unreadable or unextractable CV still yields a placeholder
/// so the ranking accounts for it.
async fn summarize(extractor: &DossierExtractor, doc: RawDocument) -> CvSummary {
    let filename = doc.display_name().to_string();

    let text = match read_off_thread(doc).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read CV {filename}: {e}");
            return CvSummary::placeholder(filename, "");
        }
    };

    match extractor.extract(&text).await {
        Ok(dossier) => CvSummary::from_dossier(filename, &normalize(dossier)),
        Err(e) => {
            warn!("Could not extract CV {filename}: {e}");
            CvSummary::placeholder(filename, text.preview(PLACEHOLDER_PREVIEW_CHARS))
        }
    }
}
