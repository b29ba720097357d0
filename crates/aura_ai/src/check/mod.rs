use aura_core::config::ScoringConfig;
use aura_core::domain::{CandidateSource, CheckResult, Embedding, Encoded, Fragment, ValidationWarning};
use aura_core::error::{codes, AppError};
use aura_core::report::CheckRequest;
use aura_core::score::aggregate;
use aura_core::segment::segment;
use aura_core::select::select_evidence;
use tracing::{debug, info, warn};

use crate::embeddings::Embedder;
use crate::search::{normalize_candidates, SourceProvider};

/// Capabilities and settings one check runs against. Borrowed, so a shared embedder can
/// serve concurrent checks.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub embedder: &'a dyn Embedder,
    pub provider: &'a dyn SourceProvider,
    pub scoring: &'a ScoringConfig,
}

/// Leading `max_chars` characters of the trimmed input, used as the search query.
pub fn search_query(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

fn encode_all(embedder: &dyn Embedder, texts: &[&str]) -> Result<Vec<Embedding>, AppError> {
    let vectors = embedder.embed_batch(texts).map_err(|e| {
        if e.is(codes::SCORING_UNAVAILABLE) {
            e
        } else {
            AppError::scoring_unavailable("Embedding provider failed")
                .with_details(e.to_string())
                .with_retryable(e.retryable)
        }
    })?;
    if vectors.len() != texts.len() {
        return Err(AppError::scoring_unavailable("Embedding provider returned wrong batch size")
            .with_details(format!("expected={}; got={}", texts.len(), vectors.len())));
    }
    Ok(vectors)
}

fn ensure_consistent_dims(fragments: &[Embedding], snippets: &[Embedding]) -> Result<usize, AppError> {
    let dims = fragments
        .iter()
        .chain(snippets.iter())
        .map(|v| v.len())
        .next()
        .unwrap_or(0);
    if dims == 0 {
        return Err(AppError::scoring_unavailable("Embedding provider returned zero-dimensional vectors"));
    }
    if let Some(bad) = fragments.iter().chain(snippets.iter()).find(|v| v.len() != dims) {
        return Err(AppError::scoring_unavailable("Embedding dims mismatch within one check")
            .with_details(format!("expected={dims}; got={}", bad.len())));
    }
    Ok(dims)
}

/// Run one plagiarism check: segment, gather candidates, encode, select, aggregate.
///
/// Zero fragments or zero usable candidates is a valid outcome (score 0, no evidence).
/// Search failures are recovered as zero candidates. Embedding failures abort the check with
/// `SCORING_UNAVAILABLE`; no partial result is returned.
pub fn run_check(ctx: CheckContext<'_>, request: &CheckRequest) -> Result<CheckResult, AppError> {
    let fragments: Vec<Fragment> = segment(&request.text);
    if fragments.is_empty() {
        debug!("no fragments after segmentation");
        return Ok(CheckResult::empty(0));
    }

    let query = search_query(&request.text, ctx.scoring.query_max_chars);
    let limit = request.effective_top_k() as usize;
    let mut warnings: Vec<ValidationWarning> = Vec::new();

    let raw = match ctx.provider.search(&query, limit) {
        Ok(found) => found,
        Err(e) => {
            warn!(provider = ctx.provider.name(), error = %e, "candidate search failed; continuing with none");
            warnings.push(
                ValidationWarning::new(codes::SEARCH_FAILED, "Candidate search failed")
                    .with_details(e.to_string()),
            );
            Vec::new()
        }
    };

    let (candidates, skipped) = normalize_candidates(raw);
    for w in &skipped {
        warn!(code = %w.code, details = ?w.details, "skipping malformed candidate");
    }
    warnings.extend(skipped);

    let usable: Vec<CandidateSource> = candidates.into_iter().filter(|c| c.has_snippet()).collect();
    debug!(fragments = fragments.len(), candidates = usable.len(), "encoding");
    if usable.is_empty() {
        info!(fragments = fragments.len(), "no usable candidate sources; score 0");
        return Ok(CheckResult {
            warnings,
            ..CheckResult::empty(fragments.len())
        });
    }

    let fragment_texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    let snippet_texts: Vec<&str> = usable.iter().map(|c| c.snippet.as_str()).collect();
    let fragment_vectors = encode_all(ctx.embedder, &fragment_texts)?;
    let snippet_vectors = encode_all(ctx.embedder, &snippet_texts)?;
    let dims = ensure_consistent_dims(&fragment_vectors, &snippet_vectors)?;

    let fragment_count = fragments.len();
    let candidate_count = usable.len();
    let encoded_fragments: Vec<Encoded<Fragment>> = fragments
        .into_iter()
        .zip(fragment_vectors)
        .map(|(f, v)| Encoded::new(f, v))
        .collect();
    let encoded_sources: Vec<Encoded<CandidateSource>> = usable
        .into_iter()
        .zip(snippet_vectors)
        .map(|(c, v)| Encoded::new(c, v))
        .collect();

    let evidence = select_evidence(&encoded_fragments, &encoded_sources, ctx.scoring.threshold);
    let plagiarism_score = aggregate(&evidence);

    info!(
        model = ctx.embedder.model(),
        dims,
        fragments = fragment_count,
        candidates = candidate_count,
        matches = evidence.len(),
        score = plagiarism_score,
        "check finished"
    );

    Ok(CheckResult {
        plagiarism_score,
        evidence,
        fragment_count,
        candidate_count,
        warnings,
    })
}
